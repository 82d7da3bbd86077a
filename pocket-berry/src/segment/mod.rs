//! 切片分割. 从灰度切片得到二值掩码和带统计信息的连通分量.
//!
//! 分割策略不属于统计核心, 因此以 [`Labeler`] trait 的形式可插拔.
//! 默认实现为 [`ThresholdLabeler`].

mod threshold;

pub use threshold::{otsu_level, Threshold, ThresholdLabeler};

use crate::{GraySlice, Idx2d, Idx2dF};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 单张切片上的一个连通分量.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Component {
    /// 包围盒宽.
    pub width: u32,

    /// 包围盒高.
    pub height: u32,

    /// 像素面积.
    pub area: u64,

    /// 质心 `(x, y)`, 以切片像素坐标计.
    pub centroid: Idx2dF,
}

impl Component {
    /// 直接初始化.
    #[inline]
    pub const fn new(width: u32, height: u32, area: u64, centroid: Idx2dF) -> Self {
        Self {
            width,
            height,
            area,
            centroid,
        }
    }

    /// 背景占位. 连通分量标记结果的第 0 项总是背景, 统计时会被跳过.
    #[inline]
    pub const fn background() -> Self {
        Self::new(0, 0, 0, (0.0, 0.0))
    }

    /// 从一组像素索引 `(高, 宽)` 计算包围盒、面积和质心.
    ///
    /// `pixels` 为空时返回 `None`.
    pub fn from_pixels(pixels: &[Idx2d]) -> Option<Self> {
        let (&(h0, w0), rest) = pixels.split_first()?;
        let (mut h_min, mut h_max, mut w_min, mut w_max) = (h0, h0, w0, w0);
        let (mut h_sum, mut w_sum) = (h0 as f64, w0 as f64);
        for &(h, w) in rest {
            h_min = h_min.min(h);
            h_max = h_max.max(h);
            w_min = w_min.min(w);
            w_max = w_max.max(w);
            h_sum += h as f64;
            w_sum += w as f64;
        }
        let n = pixels.len() as f64;
        Some(Self::new(
            (w_max - w_min + 1) as u32,
            (h_max - h_min + 1) as u32,
            pixels.len() as u64,
            (w_sum / n, h_sum / n),
        ))
    }
}

/// 一张切片的连通分量标记结果.
///
/// 第 0 项为背景, 之后每一项对应一个编号的前景区域. 因此
/// [`LabelStats::label_count`] 总是包含背景.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct LabelStats {
    components: Vec<Component>,
}

impl LabelStats {
    /// 从所有前景分量构建. 背景占位会被自动放在第 0 项.
    pub fn from_foreground<I: IntoIterator<Item = Component>>(it: I) -> Self {
        let mut components = vec![Component::background()];
        components.extend(it);
        Self { components }
    }

    /// 标号个数, 包含背景.
    #[inline]
    pub fn label_count(&self) -> usize {
        self.components.len()
    }

    /// 所有分量, 包含第 0 项背景.
    #[inline]
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// 仅前景分量.
    #[inline]
    pub fn foreground(&self) -> &[Component] {
        &self.components[1..]
    }
}

/// 分割结果: 二值掩码和在其上得到的连通分量.
#[derive(Clone, Debug)]
pub struct Segmented {
    /// 二值掩码. 白色为气孔, 黑色为材料.
    pub mask: GraySlice,

    /// 掩码上白色区域的连通分量.
    pub labels: LabelStats,
}

impl Segmented {
    /// 掩码中的黑色像素个数.
    #[inline]
    pub fn black_pixel_count(&self) -> u64 {
        self.mask.count_black()
    }
}

/// 可插拔的切片分割步骤.
pub trait Labeler {
    /// 对一张灰度切片进行分割.
    fn segment(&self, slice: &GraySlice) -> Segmented;
}

impl<L: Labeler + ?Sized> Labeler for &L {
    #[inline]
    fn segment(&self, slice: &GraySlice) -> Segmented {
        (**self).segment(slice)
    }
}
