//! 切片序列加载.
//!
//! 提供迭代器风格的切片获取模式. 一个目录中的所有图像文件按文件名排序,
//! 即视为按 z 向排列的切片序列.

use crate::{GraySlice, LoadError};
use image::imageops::{self, FilterType};
use image::{GrayImage, ImageBuffer, ImageFormat, Luma};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// 获取 `{用户主目录}/dataset` 目录.
pub fn home_dataset_dir() -> Option<PathBuf> {
    let mut ans = dirs::home_dir()?;
    ans.push("dataset");
    Some(ans)
}

/// 获取 `{用户主目录}/dataset` 目录下给定继续项组成的全路径.
pub fn home_dataset_dir_with<P: AsRef<Path>, I: IntoIterator<Item = P>>(it: I) -> Option<PathBuf> {
    let mut ans = home_dataset_dir()?;
    ans.extend(it);
    Some(ans)
}

/// 列出 `dir` 下所有能被识别为图像的文件, 按文件名排序.
///
/// 只看扩展名, 不检查文件内容. 子目录会被忽略.
pub fn slice_paths<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>, LoadError> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(LoadError::NotADirectory(dir.to_owned()));
    }
    let mut ans = Vec::with_capacity(64);
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && ImageFormat::from_path(&path).is_ok() {
            ans.push(path);
        }
    }
    ans.sort();
    Ok(ans)
}

/// 读取单张切片并转为 8-bit 灰度. 若给出 `target_size` 且与图像高度不同,
/// 则缩放为 `target_size x target_size` 的正方形.
///
/// 每通道超过 8 bit 的图像 (如 16-bit CT 切片) 先转为 16-bit 灰度,
/// 再按该图像自身的最大值拉伸到 `[0, 255]`, 见 [`stretch_to_u8`].
pub fn load_slice<P: AsRef<Path>>(path: P, target_size: Option<u32>) -> Result<GraySlice, LoadError> {
    let img = image::open(path.as_ref())?;
    let color = img.color();
    let mut img = if color.bytes_per_pixel() > color.channel_count() {
        debug!("Stretching {color:?} slice by its own maximum");
        stretch_to_u8(&img.into_luma16())
    } else {
        img.into_luma8()
    };
    if let Some(size) = target_size {
        if size == 0 {
            return Err(LoadError::ZeroTargetSize);
        }
        if img.height() != size {
            img = imageops::resize(&img, size, size, FilterType::Triangle);
        }
    }
    Ok(GraySlice::from(&img))
}

/// 将 16-bit 灰度图像按自身最大值线性拉伸为 8-bit: `p / max * 255`, 向零截断.
///
/// 全黑图像 (最大值为 0) 保持全黑.
pub fn stretch_to_u8(img: &ImageBuffer<Luma<u16>, Vec<u16>>) -> GrayImage {
    let max = img.pixels().map(|p| p[0]).max().unwrap_or(0);
    if max == 0 {
        return GrayImage::new(img.width(), img.height());
    }
    let max = f64::from(max);
    GrayImage::from_fn(img.width(), img.height(), |x, y| {
        let p = f64::from(img.get_pixel(x, y)[0]);
        Luma([(p / max * 255.0) as u8])
    })
}

/// 从目录创建切片加载器.
///
/// `limit` 给出时只取排序后的前 `limit` 张; `target_size` 的含义见 [`load_slice`].
pub fn slice_loader<P: AsRef<Path>>(
    dir: P,
    limit: Option<usize>,
    target_size: Option<u32>,
) -> Result<SliceLoader, LoadError> {
    if target_size == Some(0) {
        return Err(LoadError::ZeroTargetSize);
    }
    let mut paths = slice_paths(dir)?;
    if let Some(limit) = limit {
        paths.truncate(limit);
    }
    debug!("Found {} slices", paths.len());
    paths.reverse();
    Ok(SliceLoader {
        paths_rev: paths,
        target_size,
    })
}

/// 切片序列加载器, 按文件名顺序惰性解码.
#[derive(Debug)]
pub struct SliceLoader {
    paths_rev: Vec<PathBuf>,
    target_size: Option<u32>,
}

impl Iterator for SliceLoader {
    type Item = (PathBuf, Result<GraySlice, LoadError>);

    fn next(&mut self) -> Option<Self::Item> {
        let path = self.paths_rev.pop()?;
        let data = load_slice(&path, self.target_size);
        Some((path, data))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len(), Some(self.len()))
    }
}

impl ExactSizeIterator for SliceLoader {
    #[inline]
    fn len(&self) -> usize {
        self.paths_rev.len()
    }
}

#[cfg(test)]
mod tests {
    use super::{load_slice, slice_loader, slice_paths, stretch_to_u8};
    use crate::LoadError;
    use image::{GrayImage, ImageBuffer, Luma};
    use std::fs;
    use std::path::PathBuf;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("pocket-berry-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_loader_order_limit_and_resize() {
        let dir = scratch_dir("loader");
        for (name, value) in [("s002.png", 20u8), ("s000.png", 0), ("s001.png", 10)] {
            GrayImage::from_pixel(8, 8, Luma([value]))
                .save(dir.join(name))
                .unwrap();
        }
        fs::write(dir.join("notes.txt"), "not an image").unwrap();

        assert_eq!(slice_paths(&dir).unwrap().len(), 3);

        let loader = slice_loader(&dir, Some(2), Some(4)).unwrap();
        assert_eq!(loader.len(), 2);
        let slices: Vec<_> = loader.map(|(_, r)| r.unwrap()).collect();
        assert_eq!(slices[0].shape(), (4, 4));
        assert_eq!(slices[0][(0, 0)], 0);
        assert_eq!(slices[1][(3, 3)], 10);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_wide_slices_are_stretched_by_their_maximum() {
        let dir = scratch_dir("wide");
        let wide = ImageBuffer::<Luma<u16>, Vec<u16>>::from_fn(8, 8, |x, _| {
            Luma([if x < 4 { 500 } else { 4000 }])
        });
        wide.save(dir.join("s000.png")).unwrap();

        let slice = load_slice(dir.join("s000.png"), None).unwrap();
        assert_eq!(slice[(0, 7)], 255);
        // 500 / 4000 * 255 = 31.875.
        assert_eq!(slice[(0, 0)], 31);
        assert_eq!(slice.iter().filter(|&&p| p > 127).count(), 32);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_stretch_dark_image() {
        let dark = ImageBuffer::<Luma<u16>, Vec<u16>>::new(3, 2);
        let img = stretch_to_u8(&dark);
        assert_eq!(img.dimensions(), (3, 2));
        assert!(img.pixels().all(|p| p[0] == 0));
    }

    #[test]
    fn test_loader_errors() {
        let dir = scratch_dir("errors");
        assert!(matches!(
            slice_loader(dir.join("missing"), None, None),
            Err(LoadError::NotADirectory(_))
        ));
        assert!(matches!(
            slice_loader(&dir, None, Some(0)),
            Err(LoadError::ZeroTargetSize)
        ));

        fs::write(dir.join("broken.png"), b"garbage").unwrap();
        let mut loader = slice_loader(&dir, None, None).unwrap();
        assert!(matches!(loader.next(), Some((_, Err(LoadError::Image(_))))));
        assert!(loader.next().is_none());

        fs::remove_dir_all(&dir).unwrap();
    }
}
