//! 扫描结果.

use pocket_berry::export::{export_file_name, write_void_table, write_volume_stats};
use pocket_berry::stats::{Extrema, VolumeReport};
use std::fmt::Display;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// 将 `report` 的概要写进 `w` 中.
fn describe_into<W: Write>(r: &VolumeReport, w: &mut W) -> io::Result<()> {
    const S4: &str = "    ";

    #[inline]
    fn extrema_to_display<T: Copy + Display>(e: Extrema<T>) -> String {
        match e.min() {
            Some(min) => format!("[{min}, {}]", e.max()),
            None => "/".to_string(),
        }
    }

    let s = &r.stats;
    writeln!(w, "Volume scan:")?;
    writeln!(w, "{S4}Accepted slices: {}", r.slices)?;
    writeln!(w, "{S4}Rejected slices: {}", r.rejected)?;
    writeln!(w, "{S4}Tracked voids: {}", r.voids.len())?;
    writeln!(w, "{S4}Labels per slice: {}", extrema_to_display(s.air_pockets()))?;
    writeln!(w, "{S4}Void area: {}", extrema_to_display(s.air_pocket_size()))?;
    writeln!(
        w,
        "{S4}Black pixels per slice: {}",
        extrema_to_display(s.black_pixel_count())
    )?;
    writeln!(
        w,
        "{S4}Void percentage: {}",
        extrema_to_display(s.air_pocket_percentage())
    )?;
    write!(w, "{S4}Void depth: {}", extrema_to_display(s.air_pocket_depth()))?;
    Ok(())
}

/// 扫描最终结果.
pub struct ScanResult {
    report: VolumeReport,
}

impl ScanResult {
    pub fn new(report: VolumeReport) -> Self {
        Self { report }
    }

    /// 在终端打印概要.
    pub fn analyze(&self) -> io::Result<()> {
        let mut out = io::stdout().lock();
        utils::sep_to(&mut out)?;
        describe_into(&self.report, &mut out)?;
        writeln!(out)?;
        utils::sep_to(&mut out)
    }

    /// 在 `dir` 下写出气孔表和体统计量两份 CSV, 返回两者路径.
    pub fn export(&self, dir: &Path, timestamp: &str) -> io::Result<(PathBuf, PathBuf)> {
        fs::create_dir_all(dir)?;

        let void_path = dir.join(export_file_name("void_table", timestamp));
        let mut w = BufWriter::new(File::create(&void_path)?);
        write_void_table(&mut w, &self.report.voids)?;
        w.flush()?;

        let volume_path = dir.join(export_file_name("volume_stats", timestamp));
        let mut w = BufWriter::new(File::create(&volume_path)?);
        write_volume_stats(&mut w, &self.report.stats)?;
        w.flush()?;

        Ok((void_path, volume_path))
    }
}

#[cfg(test)]
mod tests {
    use super::{describe_into, ScanResult};
    use pocket_berry::stats::VolumeScanner;

    #[test]
    fn test_describe_empty_report() {
        let report = VolumeScanner::new().finalize();
        let mut buf = Vec::new();
        describe_into(&report, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("Volume scan:"));
        assert!(text.contains("Tracked voids: 0"));
        assert!(text.contains("Void area: /"));
    }

    #[test]
    fn test_export_writes_both_files() {
        let dir = std::env::temp_dir().join(format!("stack-scan-export-{}", std::process::id()));
        let result = ScanResult::new(VolumeScanner::new().finalize());
        let (a, b) = result.export(&dir, "2024-01-31@08:01:01").unwrap();
        assert!(a.ends_with("void_table_2024-01-31@08:01:01.csv"));
        assert!(b.ends_with("volume_stats_2024-01-31@08:01:01.csv"));
        let volume = std::fs::read_to_string(&b).unwrap();
        assert_eq!(volume.lines().count(), 2);
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
