//! 单遍体扫描: 依次折叠每张切片, 结束时给出最终结果.

use super::{update_slice_stats, update_volume_stats, SliceSummary, VoidTable, VolumeStats};
use crate::segment::LabelStats;
use crate::{SliceError, SliceGeometry};
use log::{debug, warn};

/// 整个切片序列的单遍扫描器. 持有气孔表和体统计量.
///
/// 切片必须按 z 向顺序依次交给 [`VolumeScanner::observe_slice`];
/// 中途停止得到的是一份不完整但自洽的结果.
#[derive(Clone, Debug, Default)]
pub struct VolumeScanner {
    voids: VoidTable,
    stats: VolumeStats,
    slices: usize,
    rejected: usize,
}

/// 扫描的最终结果.
#[derive(Clone, Debug)]
pub struct VolumeReport {
    /// 所有气孔, 按首次出现顺序排列.
    pub voids: VoidTable,

    /// 体统计量, 包括气孔深度极值.
    pub stats: VolumeStats,

    /// 被接受的切片数.
    pub slices: usize,

    /// 因输入非法而被拒绝的切片数.
    pub rejected: usize,
}

impl VolumeScanner {
    /// 初始化.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// 处理下一张切片: 先更新气孔表, 再折叠体统计量.
    ///
    /// 交给体统计的气孔个数为 `labels.label_count()` 减去因包围盒宽为 0
    /// 而被跳过的分量个数, 即包含背景、但不含被跳过分量的标号个数.
    ///
    /// # 错误
    ///
    /// 切片违反前置条件时返回 `Err`, 此时气孔表和体统计量均保持不变,
    /// 仅被拒绝切片计数加一.
    pub fn observe_slice(
        &mut self,
        geometry: SliceGeometry,
        labels: &LabelStats,
        black_pixel_count: u64,
    ) -> Result<SliceSummary, SliceError> {
        let summary = match update_slice_stats(
            &mut self.voids,
            labels.label_count(),
            labels.components(),
            geometry,
        ) {
            Ok(s) => s,
            Err(e) => {
                warn!("Rejecting slice #{}: {e}", self.slices + self.rejected);
                self.rejected += 1;
                return Err(e);
            }
        };
        let counted = labels.label_count() - summary.skipped;
        update_volume_stats(
            &mut self.stats,
            counted as u64,
            summary.min_area,
            summary.max_area,
            black_pixel_count,
            summary.total_area,
        );
        debug!(
            "Slice #{}: {} labels counted, total area {}, {} black pixels, {} voids tracked",
            self.slices + self.rejected,
            counted,
            summary.total_area,
            black_pixel_count,
            self.voids.len(),
        );
        self.slices += 1;
        Ok(summary)
    }

    /// 目前的气孔表.
    #[inline]
    pub fn voids(&self) -> &VoidTable {
        &self.voids
    }

    /// 目前的体统计量 (尚未包含气孔深度极值).
    #[inline]
    pub fn stats(&self) -> &VolumeStats {
        &self.stats
    }

    /// 被接受的切片数.
    #[inline]
    pub fn slices(&self) -> usize {
        self.slices
    }

    /// 被拒绝的切片数.
    #[inline]
    pub fn rejected(&self) -> usize {
        self.rejected
    }

    /// 结束扫描, 填充气孔深度极值并返回最终结果.
    pub fn finalize(self) -> VolumeReport {
        let Self {
            voids,
            mut stats,
            slices,
            rejected,
        } = self;
        stats.set_air_pocket_depth(voids.depth_extrema());
        VolumeReport {
            voids,
            stats,
            slices,
            rejected,
        }
    }
}
