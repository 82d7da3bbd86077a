//! 🫧欢迎光临🍓
//!
//! 涵盖了本 crate 一系列常用的功能.

pub use crate::{GraySlice, Idx2d, Idx2dF, LoadError, SliceError, SliceGeometry};

pub use crate::consts::gray::{BLACK, WHITE};

pub use crate::dataset::{home_dataset_dir_with, slice_loader, SliceLoader};

pub use crate::export::{export_file_name, write_void_table, write_volume_stats};

pub use crate::pipeline::{scan_stack, SliceInput};

pub use crate::segment::{Component, LabelStats, Labeler, Segmented, Threshold, ThresholdLabeler};

pub use crate::stats::{
    update_slice_stats, update_volume_stats, Extrema, SliceSummary, VoidKey, VoidRecord,
    VoidTable, VolumeReport, VolumeScanner, VolumeStats,
};
