//! 跨切片身份: 质心量化键.

use crate::Idx2dF;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 气孔的跨切片身份, 即质心坐标向零截断后的整数对.
///
/// 相当于以切片原点为起点、边长 1 像素的固定网格. 相邻切片上的两个连通分量
/// 当且仅当质心落在同一网格内时被视为同一个气孔: 没有容差, 没有最近邻搜索,
/// 也没有运动模型. 质心横向漂移跨过网格线就会产生新的键.
///
/// 显示格式为 `"{x}-{y}"`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct VoidKey {
    x: u32,
    y: u32,
}

impl VoidKey {
    /// 直接初始化.
    #[inline]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// 由质心 `(x, y)` 截断得到键.
    ///
    /// 质心应已通过合法性检查 (有限且非负); 负数会被饱和为 0.
    #[inline]
    pub fn from_centroid((x, y): Idx2dF) -> Self {
        Self {
            x: x.trunc() as u32,
            y: y.trunc() as u32,
        }
    }

    /// 网格 x (列) 坐标.
    #[inline]
    pub fn x(&self) -> u32 {
        self.x
    }

    /// 网格 y (行) 坐标.
    #[inline]
    pub fn y(&self) -> u32 {
        self.y
    }
}

impl fmt::Display for VoidKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::VoidKey;

    #[test]
    fn test_truncation_edge() {
        let a = VoidKey::from_centroid((10.4, 10.4));
        let b = VoidKey::from_centroid((10.6, 10.6));
        let c = VoidKey::from_centroid((11.1, 10.6));
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "10-10");
        assert_ne!(b, c);
        assert_eq!(c.to_string(), "11-10");

        // 恰好落在网格线上.
        assert_eq!(VoidKey::from_centroid((10.999_999, 3.0)), VoidKey::new(10, 3));
        assert_eq!(VoidKey::from_centroid((11.0, 3.0)), VoidKey::new(11, 3));
    }

    #[test]
    fn test_display() {
        assert_eq!(VoidKey::new(5, 5).to_string(), "5-5");
        assert_eq!(VoidKey::new(0, 1023).to_string(), "0-1023");
        assert_eq!(VoidKey::from_centroid((0.2, 0.9)), VoidKey::new(0, 0));
    }
}
