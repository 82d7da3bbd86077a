//! 气孔统计核心.
//!
//! 数据按切片顺序单向流动: 连通分量 -> [`update_slice_stats`] (更新气孔表,
//! 得到切片汇总) -> [`update_volume_stats`] (折叠进体统计极值).
//! [`VolumeScanner`] 把这两步连同它们的状态封装在一起.

mod key;
mod scanner;
mod slice;
mod void;
mod volume;

pub use key::VoidKey;
pub use scanner::{VolumeReport, VolumeScanner};
pub use slice::{update_slice_stats, SliceSummary};
pub use void::{VoidRecord, VoidTable};
pub use volume::{air_pocket_percentage, update_volume_stats, Extrema, VolumeStats};

use crate::consts::ROUND_DECIMALS;

/// 保留 [`ROUND_DECIMALS`] 位小数.
///
/// 按 `v` 的精确十进制值舍入, 恰好居中时取偶数 (如 `0.15625 -> 0.1562`).
#[inline]
pub(crate) fn round4(v: f64) -> f64 {
    format!("{v:.prec$}", prec = ROUND_DECIMALS).parse().unwrap_or(v)
}

#[cfg(test)]
mod tests {
    use super::round4;

    #[test]
    fn test_round4() {
        assert_eq!(round4(2.0), 2.0);
        assert_eq!(round4(63.639_610_306_789_28), 63.6396);
        assert_eq!(round4(1.0 / 3.0), 0.3333);
        assert_eq!(round4(2.0 / 3.0), 0.6667);
    }

    #[test]
    fn test_round4_ties_to_even() {
        // 宽为 32 或 160 的包围盒会产生这样的纵横比.
        assert_eq!(round4(5.0 / 32.0), 0.1562);
        assert_eq!(round4(9.0 / 32.0), 0.2812);
        assert_eq!(round4(7.0 / 32.0), 0.2188);
        // 0.01875 的二进制近似值略小于 0.01875.
        assert_eq!(round4(3.0 / 160.0), 0.0187);
        assert_eq!(round4(0.0), 0.0);
    }
}
