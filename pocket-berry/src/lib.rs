#![warn(missing_docs)] // <= 合适时移除它.

//! 核心库. 对 CT 等断层扫描得到的 z 向切片序列进行材料内部气孔 (air pocket)
//! 的检测、跨切片追踪和统计.
//!
//! 该 crate 目前仅提供 `safe` 接口.
//!
//! # 注意
//!
//! 1. 气孔的跨切片身份由质心的整数截断坐标决定, 而 **不是** 三维体素连通分析.
//!   质心横向漂移超过 1 像素的气孔会被记为新的气孔; 两个不同气孔的质心截断到
//!   同一坐标时会被合并. 这是有意保留的启发式行为, 不做修正.
//! 2. 气孔表在整个扫描过程中只增不减. 对几百张切片的常规数据而言这没有问题,
//!   但在超大规模切片序列上内存占用会线性增长.
//! 3. 非法的切片输入 (质心越界、质心非有限值等) 会被整体拒绝, 不会污染统计量.
//!
//! # 开发计划
//!
//! ### 单切片统计 ✅
//!
//! 给定一张切片的连通分量信息, 累加每个气孔的面积、纵横比、离散度和深度,
//! 并得到切片级别的总面积和面积极值.
//!
//! 实现位于 `pocket-berry/src/stats/slice.rs`.
//!
//! ### 体统计 ✅
//!
//! 在整个切片序列上维护气孔个数、气孔面积、黑色像素数、气孔面积占比、
//! 气孔深度五组极值.
//!
//! 实现位于 `pocket-berry/src/stats/volume.rs`.
//!
//! ### 跨切片身份 ✅
//!
//! 以质心截断得到的 `(x, y)` 整数对作为键, 显示为 `"x-y"`.
//!
//! 实现位于 `pocket-berry/src/stats/key.rs`.
//!
//! ### 默认分割流程 ✅
//!
//! 固定门限或 Otsu 门限二值化 + 开运算去噪 + 8-邻域连通分量标记 + 小区域过滤.
//! 分割流程通过 [`segment::Labeler`] trait 可插拔.
//!
//! 实现位于 `pocket-berry/src/segment`.
//!
//! ### 切片加载与 CSV 导出 ✅
//!
//! 实现分别位于 `pocket-berry/src/dataset` 和 `pocket-berry/src/export.rs`.
//!
//! ### 小功能 ✅
//!
//! 1. 按批次并行分割, 再严格按切片顺序折叠统计. ✅
//! 2. `serde` 支持. ✅
//! 3. 16-bit 切片按自身最大值拉伸到 8-bit. ✅

/// 二维索引 (高, 宽), 同时也可一定程度上用作非负整数向量.
pub type Idx2d = (usize, usize);

/// 高精度平面坐标, 按 `(x, y)` 即 (列, 行) 排列. 主要用于质心.
pub type Idx2dF = (f64, f64);

type Area2d = Vec<Idx2d>;

pub mod consts;

mod data;

pub use data::{GraySlice, SliceGeometry};

pub mod dataset;

mod error;

pub use error::{LoadError, SliceError};

pub mod export;

pub mod pipeline;

pub mod prelude;

pub mod segment;

pub mod stats;
