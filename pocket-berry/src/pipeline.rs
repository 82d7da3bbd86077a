//! 整个切片序列的扫描流程.
//!
//! 分割是逐切片独立的, 可以并行; 统计必须严格按切片顺序折叠.
//! 因此按批次拉取切片: 每批先 (并行) 分割, 再按顺序交给 [`VolumeScanner`],
//! 然后才拉取下一批. 内存中同时存在的切片数不超过批大小.

use crate::segment::{LabelStats, Labeler};
use crate::stats::{VolumeReport, VolumeScanner};
use crate::{GraySlice, SliceGeometry};
use itertools::Itertools;
use log::{debug, info};
use std::num::NonZeroUsize;

/// 单张切片分割后交给统计核心的全部输入.
#[derive(Clone, Debug)]
pub struct SliceInput {
    /// 切片几何信息.
    pub geometry: SliceGeometry,

    /// 连通分量标记结果.
    pub labels: LabelStats,

    /// 二值掩码中的黑色像素个数.
    pub black_pixel_count: u64,
}

impl SliceInput {
    /// 对 `slice` 运行 `labeler`, 只保留统计所需的数据.
    pub fn from_slice<L: Labeler + ?Sized>(labeler: &L, slice: &GraySlice) -> Self {
        let segmented = labeler.segment(slice);
        Self {
            geometry: slice.geometry(),
            black_pixel_count: segmented.black_pixel_count(),
            labels: segmented.labels,
        }
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "rayon")] {
        use rayon::iter::{IntoParallelIterator, ParallelIterator};

        /// 借助 `rayon`, 并行地分割一批切片. 结果保持输入顺序.
        fn segment_batch<L: Labeler + Sync>(labeler: &L, batch: Vec<GraySlice>) -> Vec<SliceInput> {
            batch
                .into_par_iter()
                .map(|s| SliceInput::from_slice(labeler, &s))
                .collect()
        }
    } else {
        /// 顺序分割一批切片.
        fn segment_batch<L: Labeler + Sync>(labeler: &L, batch: Vec<GraySlice>) -> Vec<SliceInput> {
            batch
                .iter()
                .map(|s| SliceInput::from_slice(labeler, s))
                .collect()
        }
    }
}

/// 扫描整个切片序列.
///
/// `slices` 必须按 z 向排列. 每批最多 `chunk` 张切片. 被拒绝的切片会记录日志并跳过,
/// 其个数见 [`VolumeReport::rejected`].
pub fn scan_stack<L, I>(labeler: &L, slices: I, chunk: NonZeroUsize) -> VolumeReport
where
    L: Labeler + Sync,
    I: IntoIterator<Item = GraySlice>,
{
    let mut scanner = VolumeScanner::new();
    info!("Scanning stack in batches of {chunk} slices");

    for batch in &slices.into_iter().chunks(chunk.get()) {
        for input in segment_batch(labeler, batch.collect()) {
            if let Err(e) =
                scanner.observe_slice(input.geometry, &input.labels, input.black_pixel_count)
            {
                debug!("Continuing past rejected slice: {e}");
            }
        }
    }

    let report = scanner.finalize();
    info!(
        "Scanned {} slices ({} rejected), {} voids tracked",
        report.slices,
        report.rejected,
        report.voids.len()
    );
    report
}
