//! 二维灰度切片.

use super::SliceGeometry;
use crate::consts::gray::*;
use crate::Idx2d;
use image::GrayImage;
use ndarray::iter::Iter;
use ndarray::{Array2, ArrayView2, Ix2};
use std::ops::{Index, IndexMut};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 拥有所有权的二维 8-bit 灰度切片. 既可以是原始扫描, 也可以是二值掩码.
///
/// 索引格式为 `(高, 宽)`, 即 `(行, 列)`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct GraySlice {
    data: Array2<u8>,
}

impl Index<Idx2d> for GraySlice {
    type Output = u8;

    #[inline]
    fn index(&self, index: Idx2d) -> &Self::Output {
        &self.data[index]
    }
}

impl IndexMut<Idx2d> for GraySlice {
    #[inline]
    fn index_mut(&mut self, index: Idx2d) -> &mut Self::Output {
        &mut self.data[index]
    }
}

impl From<Array2<u8>> for GraySlice {
    #[inline]
    fn from(data: Array2<u8>) -> Self {
        Self::new(data)
    }
}

impl From<&GrayImage> for GraySlice {
    fn from(img: &GrayImage) -> Self {
        let (w, h) = img.dimensions();
        let data = Array2::from_shape_fn((h as usize, w as usize), |(row, col)| {
            img.get_pixel(col as u32, row as u32)[0]
        });
        Self { data }
    }
}

impl GraySlice {
    /// 直接初始化.
    #[inline]
    pub fn new(data: Array2<u8>) -> Self {
        Self { data }
    }

    /// 创建给定形状 `(高, 宽)`、所有像素值均为 `value` 的切片.
    #[inline]
    pub fn filled(shape: Idx2d, value: u8) -> Self {
        Self {
            data: Array2::from_elem(shape, value),
        }
    }

    /// 获得底层数据的一份不可变 shallow copy.
    #[inline]
    pub fn array_view(&self) -> ArrayView2<u8> {
        self.data.view()
    }

    /// 直接获得底层数据.
    #[inline]
    pub fn into_raw(self) -> Array2<u8> {
        self.data
    }

    /// 获取可以迭代图像像素的迭代器.
    #[inline]
    pub fn iter(&self) -> Iter<'_, u8, Ix2> {
        self.data.iter()
    }

    /// 以行优先规则, 获取能迭代图像所有 `(索引, 像素值)` 的迭代器.
    #[inline]
    pub fn indexed_iter(&self) -> impl Iterator<Item = (Idx2d, &u8)> {
        self.data.indexed_iter()
    }

    /// 获取给定位置 (高, 宽) 的像素值. 越界时返回 `None`.
    #[inline]
    pub fn get(&self, pos: Idx2d) -> Option<&u8> {
        self.data.get(pos)
    }

    /// 图像的分辨率 (高, 宽).
    #[inline]
    pub fn shape(&self) -> Idx2d {
        self.data.dim()
    }

    /// 获得图像的高.
    #[inline]
    pub fn height(&self) -> usize {
        self.shape().0
    }

    /// 获得图像的宽.
    #[inline]
    pub fn width(&self) -> usize {
        self.shape().1
    }

    /// 图像的像素个数.
    #[inline]
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// 切片几何信息.
    #[inline]
    pub fn geometry(&self) -> SliceGeometry {
        SliceGeometry::from_shape(self.shape())
    }

    /// 统计图像中值为 `value` 的像素总个数.
    #[inline]
    pub fn count(&self, value: u8) -> usize {
        self.data.iter().filter(|&p| *p == value).count()
    }

    /// 统计黑色 (值为 0) 像素个数.
    #[inline]
    pub fn count_black(&self) -> u64 {
        self.count(BLACK) as u64
    }

    /// 灰度直方图: 第 `i` 项为值等于 `i` 的像素个数.
    pub fn histogram(&self) -> [u64; 256] {
        let mut hist = [0; 256];
        self.data.iter().for_each(|&p| hist[p as usize] += 1);
        hist
    }

    /// 简单二值化. 灰度值严格大于 `threshold` 的像素变为白色, 其它变为黑色.
    pub fn binarize(&self, threshold: u8) -> GraySlice {
        Self {
            data: self.data.mapv(|p| if p > threshold { WHITE } else { BLACK }),
        }
    }

    /// 反相: 黑白互换, 其它灰度取 `255 - p`.
    pub fn invert(&self) -> GraySlice {
        Self {
            data: self.data.mapv(|p| u8::MAX - p),
        }
    }

    /// 将索引集合中的每个像素改为 `new`.
    pub fn fill_batch<I: IntoIterator<Item = Idx2d>>(&mut self, it: I, new: u8) {
        it.into_iter().for_each(|pos| self[pos] = new);
    }

    /// 转换为 `image` crate 的灰度图像, 便于保存或可视化.
    pub fn to_gray_image(&self) -> GrayImage {
        let (height, width) = self.shape();
        let mut buf = GrayImage::new(width as u32, height as u32);
        for ((h, w), &pix) in self.indexed_iter() {
            buf.put_pixel(w as u32, h as u32, image::Luma([pix]));
        }
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::GraySlice;
    use crate::consts::gray::{BLACK, WHITE};
    use ndarray::array;

    #[test]
    fn test_binarize_and_count() {
        let s = GraySlice::new(array![[0, 127, 128], [255, 3, 200]]);
        let b = s.binarize(127);
        assert_eq!(b.into_raw(), array![[BLACK, BLACK, WHITE], [WHITE, BLACK, WHITE]]);
        assert_eq!(s.binarize(127).count_black(), 3);
        assert_eq!(s.count(0), 1);
        assert_eq!(s.invert()[(0, 0)], 255);

        let hist = s.histogram();
        assert_eq!(hist.iter().sum::<u64>(), 6);
        assert_eq!((hist[0], hist[127], hist[255], hist[1]), (1, 1, 1, 0));
    }

    #[test]
    fn test_shape_and_geometry() {
        let s = GraySlice::filled((3, 5), WHITE);
        assert_eq!(s.shape(), (3, 5));
        assert_eq!(s.height(), 3);
        assert_eq!(s.width(), 5);
        assert_eq!(s.size(), 15);
        assert_eq!(s.geometry().center(), (2.0, 1.0));
        assert_eq!(s.count_black(), 0);
        assert!(s.get((3, 0)).is_none());
    }

    #[test]
    fn test_gray_image_conversion() {
        let s = GraySlice::new(array![[1, 2, 3], [4, 5, 6]]);
        let img = s.to_gray_image();
        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(img.get_pixel(2, 0)[0], 3);
        assert_eq!(GraySlice::from(&img), s);
    }
}
