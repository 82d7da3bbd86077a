//! 默认分割: 门限二值化、开运算与连通分量标记.

use super::{Component, LabelStats, Labeler, Segmented};
use crate::consts::gray::*;
use crate::consts::{DEFAULT_MIN_REGION, DEFAULT_OPENING, DEFAULT_THRESHOLD};
use crate::{Area2d, GraySlice, Idx2d};
use ndarray::{Array2, Axis};
use std::collections::VecDeque;
use std::num::ParseIntError;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 获得 `(h, w)` 的 8-邻居索引. 不检查越界.
#[inline]
fn neighbour8((h, w): Idx2d) -> [Idx2d; 8] {
    [
        (h.wrapping_sub(1), w.wrapping_sub(1)),
        (h.wrapping_sub(1), w),
        (h.wrapping_sub(1), w.saturating_add(1)),
        (h, w.wrapping_sub(1)),
        (h, w.saturating_add(1)),
        (h.saturating_add(1), w.wrapping_sub(1)),
        (h.saturating_add(1), w),
        (h.saturating_add(1), w.saturating_add(1)),
    ]
}

/// 二值化门限的取法.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Threshold {
    /// 固定门限.
    Fixed(u8),

    /// 对每张切片用 Otsu 方法自动求门限, 见 [`otsu_level`].
    Otsu,
}

impl Default for Threshold {
    fn default() -> Self {
        Self::Fixed(DEFAULT_THRESHOLD)
    }
}

impl FromStr for Threshold {
    type Err = ParseIntError;

    /// 接受 `otsu` (不区分大小写) 或 `0..=255` 的整数.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            t if t.eq_ignore_ascii_case("otsu") => Ok(Self::Otsu),
            t => t.parse().map(Self::Fixed),
        }
    }
}

impl Threshold {
    /// 该切片实际使用的门限.
    pub fn level(&self, slice: &GraySlice) -> u8 {
        match *self {
            Self::Fixed(t) => t,
            Self::Otsu => otsu_level(&slice.histogram()),
        }
    }
}

/// Otsu 方法: 返回使类间方差最大的灰度 `t`. 灰度不超过 `t` 的像素为一类,
/// 其余为另一类; 方差相同时取最小的 `t`.
///
/// 空直方图和只有一种灰度的直方图返回 0.
pub fn otsu_level(hist: &[u64; 256]) -> u8 {
    let total = hist.iter().sum::<u64>() as f64;
    let sum = hist
        .iter()
        .enumerate()
        .map(|(i, &n)| i as f64 * n as f64)
        .sum::<f64>();

    let (mut weight_b, mut sum_b) = (0.0, 0.0);
    let (mut best, mut max_variance) = (0u8, 0.0);
    for (i, &n) in hist.iter().enumerate() {
        weight_b += n as f64;
        if weight_b == 0.0 {
            continue;
        }
        let weight_f = total - weight_b;
        if weight_f == 0.0 {
            break;
        }
        sum_b += i as f64 * n as f64;
        let (mean_b, mean_f) = (sum_b / weight_b, (sum - sum_b) / weight_f);
        let variance = weight_b * weight_f * (mean_b - mean_f).powi(2);
        if variance > max_variance {
            max_variance = variance;
            best = i as u8;
        }
    }
    best
}

/// 默认分割: 二值化 + 开运算 + 8-邻域连通分量 + 小区域过滤.
///
/// 算法流程依次为:
///
/// 1. 灰度值严格大于门限的像素为白色, 其它为黑色. 门限固定或由 Otsu 方法逐切片求得.
///   若 `invert` 为 `true`, 则先对切片反相 (适用于气孔偏暗的扫描).
/// 2. 若 `opening` 大于 1, 以 `opening x opening` 的正方形结构元素做一次开运算
///   (先腐蚀再膨胀), 去除细小的噪点和毛刺. 图像外的像素不参与计算.
/// 3. 按照 8-相邻规则, 以行优先顺序收集所有白色区域.
/// 4. 像素数少于 `min_region` 的区域被涂回黑色并丢弃.
/// 5. 对剩余区域计算包围盒、面积和质心, 编号顺序即发现顺序.
///
/// [`ThresholdLabeler::new`] 不做开运算; [`Default`] 使用固定门限
/// [`DEFAULT_THRESHOLD`], 最小区域 [`DEFAULT_MIN_REGION`] 和边长 [`DEFAULT_OPENING`]
/// 的开运算.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ThresholdLabeler {
    threshold: Threshold,
    min_region: usize,
    opening: usize,
    invert: bool,
}

impl Default for ThresholdLabeler {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD, DEFAULT_MIN_REGION).with_opening(DEFAULT_OPENING)
    }
}

impl ThresholdLabeler {
    /// 固定门限、不做开运算的分割器.
    #[inline]
    pub const fn new(threshold: u8, min_region: usize) -> Self {
        Self {
            threshold: Threshold::Fixed(threshold),
            min_region,
            opening: 0,
            invert: false,
        }
    }

    /// Otsu 门限、不做开运算的分割器.
    #[inline]
    pub const fn otsu(min_region: usize) -> Self {
        Self {
            threshold: Threshold::Otsu,
            ..Self::new(0, min_region)
        }
    }

    /// 设置门限取法.
    #[inline]
    pub const fn with_threshold(self, threshold: Threshold) -> Self {
        Self { threshold, ..self }
    }

    /// 设置最小区域像素数.
    #[inline]
    pub const fn with_min_region(self, min_region: usize) -> Self {
        Self { min_region, ..self }
    }

    /// 设置开运算结构元素的边长. 0 或 1 表示不做开运算.
    #[inline]
    pub const fn with_opening(self, opening: usize) -> Self {
        Self { opening, ..self }
    }

    /// 设置是否先反相.
    #[inline]
    pub const fn inverted(self, invert: bool) -> Self {
        Self { invert, ..self }
    }

    /// 门限取法.
    #[inline]
    pub fn threshold(&self) -> Threshold {
        self.threshold
    }

    /// 最小区域像素数.
    #[inline]
    pub fn min_region(&self) -> usize {
        self.min_region
    }

    /// 开运算结构元素的边长.
    #[inline]
    pub fn opening(&self) -> usize {
        self.opening
    }

    /// 是否先反相.
    #[inline]
    pub fn is_inverted(&self) -> bool {
        self.invert
    }

    /// 生成二值掩码并做开运算 (尚未过滤小区域).
    pub fn mask(&self, slice: &GraySlice) -> GraySlice {
        let mask = if self.invert {
            let inv = slice.invert();
            inv.binarize(self.threshold.level(&inv))
        } else {
            slice.binarize(self.threshold.level(slice))
        };
        if self.opening > 1 {
            open_square(&mask, self.opening)
        } else {
            mask
        }
    }
}

impl Labeler for ThresholdLabeler {
    fn segment(&self, slice: &GraySlice) -> Segmented {
        let mut mask = self.mask(slice);
        let (kept, dropped): (Vec<Area2d>, Vec<Area2d>) = lit_areas(&mask)
            .into_iter()
            .partition(|area| area.len() >= self.min_region);
        for area in dropped {
            mask.fill_batch(area, BLACK);
        }
        let labels = LabelStats::from_foreground(
            kept.iter().filter_map(|area| Component::from_pixels(area)),
        );
        Segmented { mask, labels }
    }
}

/// 沿一个轴做滑窗折叠. 窗口为 `[i - before, i + after]`, 截断到图像范围内.
fn sweep(data: &Array2<u8>, (before, after): (usize, usize), axis: Axis, op: fn(u8, u8) -> u8) -> Array2<u8> {
    let len = data.len_of(axis);
    Array2::from_shape_fn(data.dim(), |(h, w)| {
        let i = if axis == Axis(0) { h } else { w };
        (i.saturating_sub(before)..=(i + after).min(len - 1))
            .map(|j| if axis == Axis(0) { data[(j, w)] } else { data[(h, j)] })
            .fold(data[(h, w)], op)
    })
}

/// 以 `side x side` 正方形结构元素对二值掩码做开运算. 正方形可分解为行、列两次滑窗;
/// 膨胀使用关于锚点反射后的窗口, 因此偶数边长时结果同样不会平移.
fn open_square(mask: &GraySlice, side: usize) -> GraySlice {
    let erode = (side / 2, side - 1 - side / 2);
    let dilate = (erode.1, erode.0);
    let data = mask.array_view().to_owned();
    let eroded = sweep(&sweep(&data, erode, Axis(1), u8::min), erode, Axis(0), u8::min);
    let opened = sweep(&sweep(&eroded, dilate, Axis(1), u8::max), dilate, Axis(0), u8::max);
    GraySlice::new(opened)
}

/// 按照 8-相邻规则获取掩码上所有非黑色区域. 两个像素 `p1` 和 `p2` 属于同一个区域,
/// 当且仅当存在一条从 `p1` 到 `p2` 的 8-相邻路径, 且路径上的所有像素都非黑色.
///
/// 区域按其第一个像素的行优先顺序排列.
fn lit_areas(mask: &GraySlice) -> Vec<Area2d> {
    let mut ans = Vec::with_capacity(4);
    let mut visited = Array2::from_elem(mask.shape(), false);
    let mut bfs_q = VecDeque::with_capacity(16);

    for (pos, &pix) in mask.indexed_iter() {
        if visited[pos] || !is_lit(pix) {
            continue;
        }
        visited[pos] = true;
        bfs_q.push_back(pos);
        let mut this_area = Area2d::with_capacity(1);
        while let Some(cur) = bfs_q.pop_front() {
            this_area.push(cur);
            for neigh in neighbour8(cur) {
                if matches!(mask.get(neigh), Some(&p) if is_lit(p)) && !visited[neigh] {
                    visited[neigh] = true;
                    bfs_q.push_back(neigh);
                }
            }
        }
        ans.push(this_area);
    }
    ans
}
