//! 气孔记录与气孔表.

use super::{Extrema, VoidKey};
use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 一个被追踪的三维气孔.
///
/// 每出现在一张切片上, 就向三个序列各追加一项并使深度加一. 因此始终有
/// `depth == areas.len() == aspect_ratios.len() == dispersions.len()`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct VoidRecord {
    key: VoidKey,
    areas: Vec<u64>,
    aspect_ratios: Vec<f64>,
    dispersions: Vec<f64>,
    depth: u32,
}

impl VoidRecord {
    /// 创建空记录, 深度为 0.
    #[inline]
    pub fn new(key: VoidKey) -> Self {
        Self {
            key,
            areas: Vec::with_capacity(1),
            aspect_ratios: Vec::with_capacity(1),
            dispersions: Vec::with_capacity(1),
            depth: 0,
        }
    }

    /// 记录该气孔在一张切片上的观测值.
    pub(crate) fn push(&mut self, area: u64, aspect_ratio: f64, dispersion: f64) {
        self.areas.push(area);
        self.aspect_ratios.push(aspect_ratio);
        self.dispersions.push(dispersion);
        self.depth += 1;
        debug_assert!(self.is_consistent());
    }

    /// 气孔的键.
    #[inline]
    pub fn key(&self) -> VoidKey {
        self.key
    }

    /// 按切片顺序排列的面积序列.
    #[inline]
    pub fn areas(&self) -> &[u64] {
        &self.areas
    }

    /// 按切片顺序排列的纵横比 (高 / 宽) 序列.
    #[inline]
    pub fn aspect_ratios(&self) -> &[f64] {
        &self.aspect_ratios
    }

    /// 按切片顺序排列的离散度序列.
    #[inline]
    pub fn dispersions(&self) -> &[f64] {
        &self.dispersions
    }

    /// 该键出现过的切片数.
    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// 深度与三个序列长度是否一致.
    pub fn is_consistent(&self) -> bool {
        let d = self.depth as usize;
        d == self.areas.len() && d == self.aspect_ratios.len() && d == self.dispersions.len()
    }
}

/// 气孔表. 以 [`VoidKey`] 索引, 并保持首次出现的顺序.
///
/// 键在第一次出现时惰性创建, 之后从不合并、拆分或删除.
#[derive(Clone, Debug, Default)]
pub struct VoidTable {
    index: HashMap<VoidKey, usize>,
    records: Vec<VoidRecord>,
}

impl VoidTable {
    /// 创建空表.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// 气孔个数.
    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// 表是否为空.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 查询气孔记录.
    #[inline]
    pub fn get(&self, key: &VoidKey) -> Option<&VoidRecord> {
        self.index.get(key).map(|&i| &self.records[i])
    }

    /// 表中是否存在 `key`.
    #[inline]
    pub fn contains(&self, key: &VoidKey) -> bool {
        self.index.contains_key(key)
    }

    /// 获取 `key` 对应的记录; 不存在时插入一条深度为 0 的空记录.
    pub(crate) fn entry(&mut self, key: VoidKey) -> &mut VoidRecord {
        let records = &mut self.records;
        let i = *self.index.entry(key).or_insert_with(|| {
            records.push(VoidRecord::new(key));
            records.len() - 1
        });
        &mut self.records[i]
    }

    /// 按首次出现顺序迭代所有记录.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, VoidRecord> {
        self.records.iter()
    }

    /// 按首次出现顺序排列的所有记录.
    #[inline]
    pub fn records(&self) -> &[VoidRecord] {
        &self.records
    }

    /// 所有气孔深度的极值. 空表返回初始值.
    pub fn depth_extrema(&self) -> Extrema<u32> {
        let mut ans = Extrema::new();
        self.records.iter().for_each(|r| ans.fold(r.depth));
        ans
    }
}

impl<'a> IntoIterator for &'a VoidTable {
    type Item = &'a VoidRecord;
    type IntoIter = std::slice::Iter<'a, VoidRecord>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
