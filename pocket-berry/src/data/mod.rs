//! 切片基础数据结构.

mod slice;

pub use slice::GraySlice;

use crate::{Idx2d, Idx2dF};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 切片的几何信息: 宽和高 (以像素为单位).
///
/// 离散度以切片几何中心为参考点, 质心合法性也以此为边界判断.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct SliceGeometry {
    width: usize,
    height: usize,
}

impl SliceGeometry {
    /// 直接初始化.
    #[inline]
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// 从 `(高, 宽)` 形状初始化.
    #[inline]
    pub const fn from_shape((height, width): Idx2d) -> Self {
        Self { width, height }
    }

    /// 切片宽.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// 切片高.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// 切片几何中心 `(x, y)`, 即宽和高各自整除 2.
    #[inline]
    pub fn center(&self) -> Idx2dF {
        ((self.width / 2) as f64, (self.height / 2) as f64)
    }

    /// 判断 `(x, y)` 是否位于闭区间 `[0, width] x [0, height]` 内.
    ///
    /// 非有限值一律返回 `false`.
    #[inline]
    pub fn contains(&self, (x, y): Idx2dF) -> bool {
        (0.0..=self.width as f64).contains(&x) && (0.0..=self.height as f64).contains(&y)
    }
}
