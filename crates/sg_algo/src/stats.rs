//! Statistics builder: category × group count matrix with per-group totals.
//!
//! - One row per **non-empty** group, in group order.
//! - Columns are the supplied category codes in the supplied order (callers
//!   pass the index's ascending code list), zero-filled, then `Total`.
//! - `Total` equals the group size.

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use sg_core::{CategoryCode, Group};

/// Leading column header.
pub const GROUP_COLUMN: &str = "Group";
/// Trailing column header.
pub const TOTAL_COLUMN: &str = "Total";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatsRow {
    /// 0-based index of the source group.
    pub group_index: usize,
    /// `G<n>` label.
    pub label: String,
    /// Counts aligned with `StatsTable::categories`.
    pub counts: Vec<usize>,
    pub total: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatsTable {
    pub categories: Vec<CategoryCode>,
    pub rows: Vec<StatsRow>,
}

pub fn build_stats(groups: &[Group], categories: &[CategoryCode]) -> StatsTable {
    let col: BTreeMap<&CategoryCode, usize> =
        categories.iter().enumerate().map(|(i, c)| (c, i)).collect();

    let rows = groups
        .iter()
        .filter(|g| !g.is_empty())
        .map(|g| {
            let mut counts = alloc::vec![0usize; categories.len()];
            for r in &g.members {
                if let Some(&i) = col.get(&r.category) {
                    counts[i] += 1;
                }
            }
            StatsRow { group_index: g.index, label: g.label(), counts, total: g.len() }
        })
        .collect();

    StatsTable { categories: categories.to_vec(), rows }
}

impl StatsTable {
    /// `Group, <codes…>, Total`
    pub fn header(&self) -> Vec<String> {
        let mut h = Vec::with_capacity(self.categories.len() + 2);
        h.push(GROUP_COLUMN.to_string());
        h.extend(self.categories.iter().map(|c| c.as_str().to_string()));
        h.push(TOTAL_COLUMN.to_string());
        h
    }

    /// Row cells as strings, header-aligned.
    pub fn row_cells(row: &StatsRow) -> Vec<String> {
        let mut cells = Vec::with_capacity(row.counts.len() + 2);
        cells.push(row.label.clone());
        cells.extend(row.counts.iter().map(|c| c.to_string()));
        cells.push(row.total.to_string());
        cells
    }

    /// Sum of all row totals (records actually allocated).
    pub fn grand_total(&self) -> usize {
        self.rows.iter().map(|r| r.total).sum()
    }

    #[inline]
    pub fn is_empty(&self) -> bool { self.rows.is_empty() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocation::{allocate_round_robin, allocate_size_balanced};
    use crate::index::build_category_index;
    use alloc::format;
    use alloc::vec;
    use sg_core::{GroupCount, Record, StudentId};

    fn rec(id: &str) -> Record {
        Record::new(StudentId::from(id), id, "").unwrap()
    }

    fn sample() -> Vec<Record> {
        let mut v = Vec::new();
        for i in 1..=5 { v.push(rec(&format!("1401AI{i:02}"))); }
        for i in 1..=3 { v.push(rec(&format!("1401CB{i:02}"))); }
        v
    }

    #[test]
    fn header_has_sorted_codes_and_total() {
        let idx = build_category_index(sample());
        let table = build_stats(&[], &idx.categories());
        assert_eq!(table.header(), vec!["Group", "AI", "CB", "Total"]);
        assert!(table.is_empty());
    }

    #[test]
    fn size_balanced_stats() {
        let idx = build_category_index(sample());
        let groups = allocate_size_balanced(&idx, GroupCount::new(2).unwrap());
        let table = build_stats(&groups, &idx.categories());
        assert_eq!(table.rows.len(), 2);
        assert_eq!(StatsTable::row_cells(&table.rows[0]), vec!["G1", "4", "0", "4"]);
        assert_eq!(StatsTable::row_cells(&table.rows[1]), vec!["G2", "1", "3", "4"]);
        assert_eq!(table.grand_total(), 8);
    }

    #[test]
    fn empty_groups_are_skipped() {
        let idx = build_category_index(vec![rec("1401AI01"), rec("1401CB01")]);
        let groups = allocate_round_robin(&idx, GroupCount::new(5).unwrap());
        let table = build_stats(&groups, &idx.categories());
        let labels: Vec<&str> = table.rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["G1", "G2"]);
        assert_eq!(table.rows[1].counts, vec![0, 1]);
    }

    #[test]
    fn row_counts_sum_to_total() {
        let idx = build_category_index(sample());
        let groups = allocate_round_robin(&idx, GroupCount::new(3).unwrap());
        let table = build_stats(&groups, &idx.categories());
        for row in &table.rows {
            assert_eq!(row.counts.iter().sum::<usize>(), row.total);
        }
        assert_eq!(table.grand_total(), idx.len());
    }
}
