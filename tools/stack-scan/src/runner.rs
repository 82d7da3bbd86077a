//! 程序运行函数.

use log::{error, info};
use pocket_berry::dataset;
use pocket_berry::pipeline::scan_stack;
use pocket_berry::stats::VolumeReport;
use pocket_berry::LoadError;
use std::path::PathBuf;
use utils::config::ScanConfig;

/// 实际运行. 任何一张切片加载失败都会中止扫描.
pub fn run(config: &ScanConfig) -> Result<VolumeReport, LoadError> {
    let loader = dataset::slice_loader(&config.slice_dir, config.limit, config.target_size)?;
    info!(
        "Loading {} slices from `{}`",
        loader.len(),
        config.slice_dir.display()
    );

    let mut failure: Option<(PathBuf, LoadError)> = None;
    let slices = loader.map_while(|(path, r)| match r {
        Ok(slice) => Some(slice),
        Err(e) => {
            failure = Some((path, e));
            None
        }
    });
    let report = scan_stack(&config.labeler, slices, config.chunk);

    match failure {
        Some((path, e)) => {
            error!("Failed to load `{}`: {e}", path.display());
            Err(e)
        }
        None => Ok(report),
    }
}
