//! 单切片统计.

use super::{round4, VoidKey, VoidTable};
use crate::segment::Component;
use crate::{SliceError, SliceGeometry};
use log::warn;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 一张切片的面积汇总.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct SliceSummary {
    /// 所有被统计的连通分量面积之和.
    pub total_area: u64,

    /// 单个连通分量的最大面积. 无分量时为 0.
    pub max_area: u64,

    /// 单个连通分量的最小面积. 无分量时为 `None`, 相当于正无穷.
    pub min_area: Option<u64>,

    /// 因包围盒宽为 0 而被跳过的分量个数.
    pub skipped: usize,
}

/// 将一张切片的连通分量累加进气孔表, 并返回该切片的面积汇总.
///
/// `components` 为连通分量标记结果, 第 0 项为背景, 总是被跳过;
/// `component_count` 为包含背景的标号个数, 必须等于 `components.len()`.
/// 离散度以 `geometry` 的几何中心为参考点.
///
/// 对每个前景分量:
///
/// 1. 面积计入总面积和面积极值;
/// 2. 离散度为质心到切片中心的欧氏距离, 纵横比为高 / 宽, 均保留 4 位小数;
/// 3. 质心截断得到 [`VoidKey`], 不存在则新建记录, 然后追加观测值.
///
/// 包围盒宽为 0 的分量无法计算纵横比, 会被整体跳过 (不计入任何汇总),
/// 并计入 [`SliceSummary::skipped`].
///
/// # 错误
///
/// 标号个数不符、质心非有限值或越界时返回 `Err`. 检查在修改气孔表之前完成,
/// 因此被拒绝的切片不会留下任何痕迹.
pub fn update_slice_stats(
    table: &mut VoidTable,
    component_count: usize,
    components: &[Component],
    geometry: SliceGeometry,
) -> Result<SliceSummary, SliceError> {
    validate(component_count, components, geometry)?;

    let (center_x, center_y) = geometry.center();
    let mut summary = SliceSummary::default();

    for (index, c) in components.iter().enumerate().skip(1) {
        if c.width == 0 {
            warn!("Skipping component {index}: zero-width bounding box");
            summary.skipped += 1;
            continue;
        }

        summary.total_area += c.area;
        summary.max_area = summary.max_area.max(c.area);
        summary.min_area = Some(summary.min_area.map_or(c.area, |m| m.min(c.area)));

        let (cx, cy) = c.centroid;
        let dispersion = round4(((cx - center_x).powi(2) + (cy - center_y).powi(2)).sqrt());
        let aspect_ratio = round4(c.height as f64 / c.width as f64);

        table
            .entry(VoidKey::from_centroid(c.centroid))
            .push(c.area, aspect_ratio, dispersion);
    }

    Ok(summary)
}

/// 检查整张切片的前置条件.
fn validate(
    component_count: usize,
    components: &[Component],
    geometry: SliceGeometry,
) -> Result<(), SliceError> {
    if component_count != components.len() {
        return Err(SliceError::CountMismatch {
            count: component_count,
            given: components.len(),
        });
    }
    for (index, c) in components.iter().enumerate().skip(1) {
        let (x, y) = c.centroid;
        if !x.is_finite() || !y.is_finite() {
            return Err(SliceError::NonFiniteCentroid { index });
        }
        if !geometry.contains(c.centroid) {
            return Err(SliceError::CentroidOutOfBounds {
                index,
                x,
                y,
                width: geometry.width(),
                height: geometry.height(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{update_slice_stats, SliceSummary};
    use crate::segment::{Component, LabelStats};
    use crate::stats::{VoidKey, VoidTable};
    use crate::{SliceError, SliceGeometry};

    const G100: SliceGeometry = SliceGeometry::new(100, 100);

    fn run(table: &mut VoidTable, labels: &LabelStats) -> Result<SliceSummary, SliceError> {
        update_slice_stats(table, labels.label_count(), labels.components(), G100)
    }

    #[test]
    fn test_single_component_scenario() {
        let mut t = VoidTable::new();
        let labels = LabelStats::from_foreground([Component::new(4, 8, 32, (5.0, 5.0))]);
        let s = run(&mut t, &labels).unwrap();

        assert_eq!(
            s,
            SliceSummary {
                total_area: 32,
                max_area: 32,
                min_area: Some(32),
                skipped: 0,
            }
        );
        let r = t.get(&VoidKey::new(5, 5)).unwrap();
        assert_eq!(r.depth(), 1);
        assert_eq!(r.areas(), &[32]);
        assert_eq!(r.aspect_ratios(), &[2.0]);
        assert_eq!(r.dispersions(), &[63.6396]);
    }

    #[test]
    fn test_totals_and_extrema() {
        let mut t = VoidTable::new();
        let labels = LabelStats::from_foreground([
            Component::new(3, 1, 10, (1.0, 1.0)),
            Component::new(2, 2, 4, (20.0, 30.0)),
            Component::new(1, 3, 7, (60.5, 70.5)),
        ]);
        let s = run(&mut t, &labels).unwrap();
        assert_eq!(s.total_area, 21);
        assert_eq!(s.max_area, 10);
        assert_eq!(s.min_area, Some(4));
        assert_eq!(t.len(), 3);
        // 1 / 3 = 0.33333...
        assert_eq!(t.get(&VoidKey::new(1, 1)).unwrap().aspect_ratios(), &[0.3333]);
    }

    #[test]
    fn test_background_only() {
        let mut t = VoidTable::new();
        let s = run(&mut t, &LabelStats::from_foreground(Vec::new())).unwrap();
        assert_eq!(s, SliceSummary::default());
        assert_eq!(s.min_area, None);
        assert!(t.is_empty());

        // 连背景都没有的空标记结果同样合法.
        assert!(update_slice_stats(&mut t, 0, &[], G100).is_ok());
    }

    #[test]
    fn test_same_slice_twice_reuses_record() {
        let mut t = VoidTable::new();
        let labels = LabelStats::from_foreground([
            Component::new(4, 4, 16, (12.3, 40.9)),
            Component::new(2, 2, 4, (70.0, 10.0)),
        ]);
        run(&mut t, &labels).unwrap();
        run(&mut t, &labels).unwrap();

        assert_eq!(t.len(), 2);
        for r in t.iter() {
            assert_eq!(r.depth(), 2);
            assert!(r.is_consistent());
        }
    }

    #[test]
    fn test_drift_across_grid_line() {
        let mut t = VoidTable::new();
        for centroid in [(10.4, 10.4), (10.6, 10.6), (11.1, 10.6)] {
            let labels = LabelStats::from_foreground([Component::new(2, 2, 4, centroid)]);
            run(&mut t, &labels).unwrap();
        }
        assert_eq!(t.len(), 2);
        assert_eq!(t.get(&VoidKey::new(10, 10)).unwrap().depth(), 2);
        assert_eq!(t.get(&VoidKey::new(11, 10)).unwrap().depth(), 1);
    }

    #[test]
    fn test_zero_width_is_skipped() {
        let mut t = VoidTable::new();
        let labels = LabelStats::from_foreground([
            Component::new(0, 5, 5, (3.0, 3.0)),
            Component::new(1, 1, 1, (8.0, 8.0)),
        ]);
        let s = run(&mut t, &labels).unwrap();
        assert_eq!(s.skipped, 1);
        assert_eq!(s.total_area, 1);
        assert_eq!(s.min_area, Some(1));
        assert!(!t.contains(&VoidKey::new(3, 3)));
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn test_rejected_slice_leaves_no_trace() {
        let mut t = VoidTable::new();
        let labels = LabelStats::from_foreground([
            Component::new(2, 2, 4, (1.0, 1.0)),
            Component::new(2, 2, 4, (100.5, 1.0)),
        ]);
        let err = run(&mut t, &labels).unwrap_err();
        assert!(matches!(err, SliceError::CentroidOutOfBounds { index: 2, .. }));
        assert!(t.is_empty());

        let nan = LabelStats::from_foreground([Component::new(2, 2, 4, (f64::NAN, 1.0))]);
        assert_eq!(
            run(&mut t, &nan).unwrap_err(),
            SliceError::NonFiniteCentroid { index: 1 }
        );

        let labels = LabelStats::from_foreground([Component::new(2, 2, 4, (1.0, 1.0))]);
        assert_eq!(
            update_slice_stats(&mut t, 5, labels.components(), G100).unwrap_err(),
            SliceError::CountMismatch { count: 5, given: 2 }
        );
        assert!(t.is_empty());
    }
}
