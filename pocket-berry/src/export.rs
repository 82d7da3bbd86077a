//! 统计结果的 CSV 导出.
//!
//! 气孔表每个气孔一行, 面积、纵横比、离散度均为整个生命周期上的序列,
//! 以 `[a, b, c]` 的形式写出; 体统计量只有一行, 共十列. 未被更新过的最小值写作
//! `inf`.

use crate::stats::{Extrema, VoidTable, VolumeStats};
use itertools::Itertools;
use std::fmt::Debug;
use std::io::{self, Write};

/// 气孔表表头.
pub const VOID_TABLE_HEADER: [&str; 5] = ["id", "area", "aspect_ratio", "dispersion", "depth"];

/// 体统计量表头.
pub const VOLUME_STATS_HEADER: [&str; 10] = [
    "min_air_pockets",
    "max_air_pockets",
    "min_air_pocket_size",
    "max_air_pocket_size",
    "min_black_pixel_count",
    "max_black_pixel_count",
    "min_air_pocket_percentage",
    "max_air_pocket_percentage",
    "min_air_pocket_depth",
    "max_air_pocket_depth",
];

/// 导出文件名: `{stem}_{timestamp}.csv`.
#[inline]
pub fn export_file_name(stem: &str, timestamp: &str) -> String {
    format!("{stem}_{timestamp}.csv")
}

/// CSV 字段转义: 含逗号、引号或换行时加双引号.
fn quoted(field: String) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field
    }
}

/// 序列写作 `[a, b, c]`. 浮点数保留 `2.0` 这样的小数点.
fn sequence<T: Debug>(values: &[T]) -> String {
    quoted(format!("[{}]", values.iter().map(|v| format!("{v:?}")).join(", ")))
}

/// 极值写作两列 `min,max`. 未设置的最小值写作 `inf`.
fn extrema<T: Debug + Copy>(e: Extrema<T>) -> [String; 2] {
    let min = match e.min() {
        Some(m) => format!("{m:?}"),
        None => "inf".to_string(),
    };
    [min, format!("{:?}", e.max())]
}

/// 以 CSV 格式写出气孔表, 按首次出现顺序每个气孔一行.
pub fn write_void_table<W: Write>(w: &mut W, table: &VoidTable) -> io::Result<()> {
    writeln!(w, "{}", VOID_TABLE_HEADER.join(","))?;
    for r in table {
        writeln!(
            w,
            "{},{},{},{},{}",
            r.key(),
            sequence(r.areas()),
            sequence(r.aspect_ratios()),
            sequence(r.dispersions()),
            r.depth()
        )?;
    }
    Ok(())
}

/// 以 CSV 格式写出体统计量 (表头 + 一行).
pub fn write_volume_stats<W: Write>(w: &mut W, stats: &VolumeStats) -> io::Result<()> {
    writeln!(w, "{}", VOLUME_STATS_HEADER.join(","))?;
    let row = [
        extrema(stats.air_pockets()),
        extrema(stats.air_pocket_size()),
        extrema(stats.black_pixel_count()),
        extrema(stats.air_pocket_percentage()),
        extrema(stats.air_pocket_depth()),
    ];
    writeln!(w, "{}", row.iter().flatten().join(","))
}

#[cfg(test)]
mod tests {
    use super::{export_file_name, write_void_table, write_volume_stats};
    use crate::segment::{Component, LabelStats};
    use crate::stats::VolumeScanner;
    use crate::SliceGeometry;

    fn to_string(f: impl FnOnce(&mut Vec<u8>) -> std::io::Result<()>) -> String {
        let mut buf = Vec::with_capacity(256);
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_single_slice_export() {
        let mut s = VolumeScanner::new();
        let labels = LabelStats::from_foreground([Component::new(4, 8, 32, (5.0, 5.0))]);
        s.observe_slice(SliceGeometry::new(100, 100), &labels, 800).unwrap();
        let r = s.finalize();

        let voids = to_string(|w| write_void_table(w, &r.voids));
        assert_eq!(
            voids,
            "id,area,aspect_ratio,dispersion,depth\n5-5,[32],[2.0],[63.6396],1\n"
        );

        let volume = to_string(|w| write_volume_stats(w, &r.stats));
        let mut lines = volume.lines();
        assert!(lines.next().unwrap().starts_with("min_air_pockets,max_air_pockets,"));
        assert_eq!(
            lines.next().unwrap(),
            "2,2,32,32,800,800,4.0,4.0,1,1"
        );
    }

    #[test]
    fn test_multi_value_sequences_are_quoted() {
        let mut s = VolumeScanner::new();
        let g = SliceGeometry::new(100, 100);
        for area in [32, 40] {
            let labels = LabelStats::from_foreground([Component::new(4, 8, area, (5.0, 5.0))]);
            s.observe_slice(g, &labels, 100).unwrap();
        }
        let voids = to_string(|w| write_void_table(w, s.voids()));
        assert_eq!(
            voids.lines().nth(1).unwrap(),
            "5-5,\"[32, 40]\",\"[2.0, 2.0]\",\"[63.6396, 63.6396]\",2"
        );
    }

    #[test]
    fn test_empty_volume_export() {
        let r = VolumeScanner::new().finalize();
        let volume = to_string(|w| write_volume_stats(w, &r.stats));
        assert_eq!(volume.lines().nth(1).unwrap(), "inf,0,inf,0,inf,0,inf,0.0,inf,0");
    }

    #[test]
    fn test_export_file_name() {
        assert_eq!(
            export_file_name("volume_stats", "2024-01-31@08:00:00"),
            "volume_stats_2024-01-31@08:00:00.csv"
        );
    }
}
