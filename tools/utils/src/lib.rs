//! 扫描工具依赖的通用组件.

pub mod config;

use chrono::{DateTime, Local, TimeZone};
use std::fmt::Display;

const SEP: &str = "--------------------------------------------------------";

/// 简单分隔线.
#[inline]
pub fn sep_to<W: std::io::Write>(mut w: W) -> std::io::Result<()> {
    writeln!(&mut w, "{SEP}")
}

/// 获得可并行核心数.
pub fn cpus() -> usize {
    std::thread::available_parallelism().map_or_else(|_| num_cpus::get(), usize::from)
}

/// 导出文件名中的时间格式.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d@%H:%M:%S";

/// 当前本地时间, 格式为 `YYYY-MM-DD@HH:mm:ss`. 用于导出文件名.
pub fn timestamp() -> String {
    format_timestamp(&Local::now())
}

/// 将任意时区的时间格式化为 `YYYY-MM-DD@HH:mm:ss`.
pub fn format_timestamp<Tz: TimeZone>(t: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    t.format(TIMESTAMP_FORMAT).to_string()
}
