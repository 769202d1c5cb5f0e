//! Property tests for both allocators and the statistics builder.
//!
//! Inputs are generated as (category, name) pairs; identifiers are made
//! unique by a running sequence number.

use std::collections::BTreeMap;

use proptest::prelude::*;
use sg_algo::{
    allocation::{allocate_round_robin, allocate_size_balanced, target_size},
    build_category_index, build_stats, CategoryIndex, Group, GroupCount, Record,
};
use sg_core::StudentId;

const CODES: [&str; 5] = ["AI", "CB", "CE", "EE", "ME"];

fn records_strategy() -> impl Strategy<Value = Vec<Record>> {
    prop::collection::vec((0usize..CODES.len(), "[A-E]{1,3}"), 0..60).prop_map(|pairs| {
        pairs
            .into_iter()
            .enumerate()
            .map(|(seq, (c, name))| {
                let id = format!("21{:02}{}{:03}", seq % 100, CODES[c], seq);
                Record::new(StudentId::new(id), name, format!("s{seq}@uni.test")).unwrap()
            })
            .collect()
    })
}

fn sorted_ids<'a>(it: impl Iterator<Item = &'a Record>) -> Vec<String> {
    let mut v: Vec<String> = it.map(|r| r.id.as_str().to_string()).collect();
    v.sort();
    v
}

fn all_members(groups: &[Group]) -> impl Iterator<Item = &Record> {
    groups.iter().flat_map(|g| g.members.iter())
}

fn per_category_counts(g: &Group) -> BTreeMap<String, usize> {
    let mut m = BTreeMap::new();
    for r in &g.members {
        *m.entry(r.category.as_str().to_string()).or_insert(0) += 1;
    }
    m
}

fn check_conservation(idx: &CategoryIndex, input: &[Record], groups: &[Group], n: u32) {
    assert_eq!(groups.len(), n as usize);
    assert_eq!(sorted_ids(all_members(groups)), sorted_ids(input.iter()));
    assert_eq!(all_members(groups).count(), idx.len());
}

proptest! {
    #[test]
    fn round_robin_conserves_and_spreads(input in records_strategy(), n in 2u32..9) {
        let idx = build_category_index(input.clone());
        let gc = GroupCount::new(n).unwrap();
        let groups = allocate_round_robin(&idx, gc);
        check_conservation(&idx, &input, &groups, n);

        for (code, members) in idx.iter() {
            let counts: Vec<usize> = groups
                .iter()
                .map(|g| per_category_counts(g).get(code.as_str()).copied().unwrap_or(0))
                .collect();
            let max = *counts.iter().max().unwrap();
            let min = *counts.iter().min().unwrap();
            prop_assert!(max - min <= 1, "category {} spread {:?} over {} records", code, counts, members.len());
        }
    }

    #[test]
    fn size_balanced_conserves_and_respects_target(input in records_strategy(), n in 2u32..9) {
        let idx = build_category_index(input.clone());
        let gc = GroupCount::new(n).unwrap();
        let groups = allocate_size_balanced(&idx, gc);
        check_conservation(&idx, &input, &groups, n);

        let target = target_size(idx.len(), gc);
        for g in &groups[..groups.len() - 1] {
            prop_assert!(g.len() <= target, "{} has {} > target {}", g.label(), g.len(), target);
        }
    }

    #[test]
    fn allocators_are_deterministic(input in records_strategy(), n in 2u32..9) {
        let idx = build_category_index(input);
        let gc = GroupCount::new(n).unwrap();
        prop_assert_eq!(allocate_round_robin(&idx, gc), allocate_round_robin(&idx, gc));
        prop_assert_eq!(allocate_size_balanced(&idx, gc), allocate_size_balanced(&idx, gc));
    }

    #[test]
    fn stats_are_consistent(input in records_strategy(), n in 2u32..9) {
        let idx = build_category_index(input);
        let gc = GroupCount::new(n).unwrap();
        for groups in [allocate_round_robin(&idx, gc), allocate_size_balanced(&idx, gc)] {
            let table = build_stats(&groups, &idx.categories());
            for row in &table.rows {
                prop_assert_eq!(row.counts.iter().sum::<usize>(), row.total);
                prop_assert_eq!(row.total, groups[row.group_index].len());
            }
            prop_assert_eq!(table.grand_total(), idx.len());
            prop_assert_eq!(table.rows.len(), groups.iter().filter(|g| !g.is_empty()).count());
        }
    }
}

#[test]
fn worked_example_size_balanced() {
    let mut input = Vec::new();
    for i in 1..=5 {
        input.push(Record::new(StudentId::new(format!("1401AI{i:02}")), format!("ai{i}"), "").unwrap());
    }
    for i in 1..=3 {
        input.push(Record::new(StudentId::new(format!("1401CB{i:02}")), format!("cb{i}"), "").unwrap());
    }
    let idx = build_category_index(input);
    let groups = allocate_size_balanced(&idx, GroupCount::new(2).unwrap());
    let sizes: Vec<usize> = groups.iter().map(Group::len).collect();
    assert_eq!(sizes, vec![4, 4]);
    let table = build_stats(&groups, &idx.categories());
    assert_eq!(table.rows[0].counts, vec![4, 0]);
    assert_eq!(table.rows[1].counts, vec![1, 3]);
}
