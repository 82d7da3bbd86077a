//! 对一个切片目录做完整的气孔扫描, 并导出两份 CSV.
//!
//! 配置全部来自环境变量, 见 [`utils::config`].

mod result;
mod runner;

use log::info;
use result::ScanResult;
use std::error::Error;
use utils::config::ScanConfig;

fn main() -> Result<(), Box<dyn Error>> {
    simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .env()
        .init()?;

    let config = ScanConfig::from_env()?;
    info!("Scanning with {config:?}");

    let report = runner::run(&config)?;
    let result = ScanResult::new(report);
    result.analyze()?;

    let (void_path, volume_path) = result.export(&config.out_dir, &utils::timestamp())?;
    info!("Void table written to `{}`", void_path.display());
    info!("Volume statistics written to `{}`", volume_path.display());
    Ok(())
}
