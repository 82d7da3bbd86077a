//! 运行时错误.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// 单张切片的输入违反前置条件. 出现该错误时整张切片被拒绝,
/// 气孔表和体统计量都不会被修改.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SliceError {
    /// 声明的标号个数 (含背景) 与实际给出的连通分量个数不一致.
    #[error("label count {count} does not match the {given} supplied components")]
    CountMismatch {
        /// 声明的标号个数.
        count: usize,
        /// 实际给出的连通分量个数.
        given: usize,
    },

    /// 连通分量的质心不是有限值.
    #[error("component {index} has a non-finite centroid")]
    NonFiniteCentroid {
        /// 连通分量标号.
        index: usize,
    },

    /// 连通分量的质心位于切片范围以外.
    #[error("component {index} centroid ({x}, {y}) lies outside the {width}x{height} slice")]
    CentroidOutOfBounds {
        /// 连通分量标号.
        index: usize,
        /// 质心 x (列) 坐标.
        x: f64,
        /// 质心 y (行) 坐标.
        y: f64,
        /// 切片宽.
        width: usize,
        /// 切片高.
        height: usize,
    },
}

/// 切片序列加载错误.
#[derive(Debug, Error)]
pub enum LoadError {
    /// 文件系统错误.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// 图像解码错误.
    #[error(transparent)]
    Image(#[from] image::ImageError),

    /// 给定路径不是目录.
    #[error("`{0}` is not a directory")]
    NotADirectory(PathBuf),

    /// 目标边长为 0.
    #[error("target size must be positive")]
    ZeroTargetSize,
}
