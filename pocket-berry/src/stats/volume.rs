//! 体统计: 整个切片序列上的极值.

use log::debug;
use num::Zero;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 一对累计极值.
///
/// 最小值初始为 `None`, 相当于正无穷; 最大值初始为 0, 即各统计量的自然下界.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Extrema<T> {
    min: Option<T>,
    max: T,
}

impl<T: Copy + PartialOrd + Zero> Default for Extrema<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy + PartialOrd + Zero> Extrema<T> {
    /// 初始化.
    #[inline]
    pub fn new() -> Self {
        Self {
            min: None,
            max: T::zero(),
        }
    }

    /// 同时更新最小值和最大值.
    #[inline]
    pub fn fold(&mut self, value: T) {
        self.fold_min(value);
        self.fold_max(value);
    }

    /// 仅更新最小值.
    #[inline]
    pub fn fold_min(&mut self, value: T) {
        match self.min {
            Some(m) if m <= value => {}
            _ => self.min = Some(value),
        }
    }

    /// 仅更新最大值.
    #[inline]
    pub fn fold_max(&mut self, value: T) {
        if value > self.max {
            self.max = value;
        }
    }

    /// `value` 是否落在 `[min, max]` 内. 最小值未设置时视为正无穷.
    #[inline]
    pub fn contains(&self, value: T) -> bool {
        self.min.is_some_and(|m| m <= value) && value <= self.max
    }
}

impl<T: Copy> Extrema<T> {
    /// 当前最小值. 从未更新过时为 `None`.
    #[inline]
    pub fn min(&self) -> Option<T> {
        self.min
    }

    /// 当前最大值.
    #[inline]
    pub fn max(&self) -> T {
        self.max
    }
}

/// 整个切片序列的体统计量.
///
/// 每处理一张切片更新一次; 气孔深度一项在扫描结束时由气孔表填充.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct VolumeStats {
    air_pockets: Extrema<u64>,
    air_pocket_size: Extrema<u64>,
    black_pixel_count: Extrema<u64>,
    air_pocket_percentage: Extrema<f64>,
    air_pocket_depth: Extrema<u32>,
}

impl VolumeStats {
    /// 初始化. 最小值均为正无穷, 最大值均为 0.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// 每张切片的气孔个数极值 (标号个数, 含背景).
    #[inline]
    pub fn air_pockets(&self) -> Extrema<u64> {
        self.air_pockets
    }

    /// 单个连通分量面积的极值.
    #[inline]
    pub fn air_pocket_size(&self) -> Extrema<u64> {
        self.air_pocket_size
    }

    /// 每张切片黑色像素个数的极值.
    #[inline]
    pub fn black_pixel_count(&self) -> Extrema<u64> {
        self.black_pixel_count
    }

    /// 每张切片气孔总面积占黑色像素百分比的极值.
    #[inline]
    pub fn air_pocket_percentage(&self) -> Extrema<f64> {
        self.air_pocket_percentage
    }

    /// 气孔深度极值. 扫描结束前保持初始值.
    #[inline]
    pub fn air_pocket_depth(&self) -> Extrema<u32> {
        self.air_pocket_depth
    }

    /// 设置气孔深度极值.
    #[inline]
    pub(crate) fn set_air_pocket_depth(&mut self, depth: Extrema<u32>) {
        self.air_pocket_depth = depth;
    }
}

/// 气孔总面积占黑色像素的百分比: `total_area * 100 / black_pixel_count`.
///
/// `black_pixel_count` 为 0 (如全白切片) 时返回 `None`.
#[inline]
pub fn air_pocket_percentage(total_area: u64, black_pixel_count: u64) -> Option<f64> {
    match black_pixel_count {
        0 => None,
        black => Some(total_area as f64 * 100.0 / black as f64),
    }
}

/// 将一张切片的汇总量折叠进体统计量.
///
/// - `component_count` 为该切片的气孔个数 (调用方负责保持各切片口径一致);
/// - `min_area` 为 `None` 时 (该切片没有分量) 不更新面积最小值;
/// - `black_pixel_count` 为 0 时跳过百分比一项, 其余各项照常更新.
pub fn update_volume_stats(
    stats: &mut VolumeStats,
    component_count: u64,
    min_area: Option<u64>,
    max_area: u64,
    black_pixel_count: u64,
    total_area: u64,
) {
    stats.air_pockets.fold(component_count);
    if let Some(min_area) = min_area {
        stats.air_pocket_size.fold_min(min_area);
    }
    stats.air_pocket_size.fold_max(max_area);
    stats.black_pixel_count.fold(black_pixel_count);
    match air_pocket_percentage(total_area, black_pixel_count) {
        Some(p) => stats.air_pocket_percentage.fold(p),
        None => debug!("No black pixels on this slice, percentage left unchanged"),
    }
}
