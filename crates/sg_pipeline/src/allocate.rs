//! ALLOCATE stage: one `AllocationRun` per requested strategy over a borrowed `Roster`.
//!
//! Runs are transient and pure: the same roster, strategy and group count always
//! give the same groups and statistics.

use sg_algo::{allocate, allocation::target_size, build_stats, StatsTable};
use sg_core::{Group, GroupCount, Strategy};
use tracing::debug;

use crate::load::Roster;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationRun {
    pub strategy: Strategy,
    pub group_count: GroupCount,
    /// Fill threshold; only meaningful for the size-balanced strategy.
    pub target_size: Option<usize>,
    /// Exactly `group_count` groups, possibly some empty.
    pub groups: Vec<Group>,
    pub stats: StatsTable,
}

impl AllocationRun {
    /// Sizes of all groups, including empty ones.
    pub fn group_sizes(&self) -> Vec<usize> {
        self.groups.iter().map(Group::len).collect()
    }

    pub fn non_empty(&self) -> impl Iterator<Item = &Group> {
        self.groups.iter().filter(|g| !g.is_empty())
    }
}

pub fn run_allocation(roster: &Roster, strategy: Strategy, group_count: GroupCount) -> AllocationRun {
    let index = roster.index();
    let groups = allocate(index, group_count, strategy);
    let stats = build_stats(&groups, &index.categories());
    let target_size = match strategy {
        Strategy::SizeBalanced => Some(target_size(index.len(), group_count)),
        Strategy::RoundRobin => None,
    };
    debug!(
        strategy = %strategy,
        groups = group_count.get(),
        non_empty = stats.rows.len(),
        "allocated"
    );
    AllocationRun { strategy, group_count, target_size, groups, stats }
}

/// Runs in the order given.
pub fn run_all(roster: &Roster, strategies: &[Strategy], group_count: GroupCount) -> Vec<AllocationRun> {
    strategies.iter().map(|&s| run_allocation(roster, s, group_count)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sg_core::{FieldMap, Record, StudentId};

    fn roster(counts: &[(&str, usize)]) -> Roster {
        let mut recs = Vec::new();
        for (code, n) in counts {
            for i in 1..=*n {
                let id = format!("1401{code}{i:02}");
                recs.push(Record::new(StudentId::new(id), format!("{code}{i:02}"), "").unwrap());
            }
        }
        Roster::from_records(recs, FieldMap::default())
    }

    #[test]
    fn size_balanced_records_target() {
        let r = roster(&[("AI", 5), ("CB", 3)]);
        let run = run_allocation(&r, Strategy::SizeBalanced, GroupCount::new(2).unwrap());
        assert_eq!(run.target_size, Some(4));
        assert_eq!(run.group_sizes(), vec![4, 4]);
        assert_eq!(run.stats.grand_total(), 8);
    }

    #[test]
    fn more_groups_than_records_leaves_empty_groups() {
        let r = roster(&[("AI", 2), ("CB", 1)]);
        let run = run_allocation(&r, Strategy::RoundRobin, GroupCount::new(5).unwrap());
        assert_eq!(run.target_size, None);
        assert_eq!(run.group_sizes(), vec![1, 1, 1, 0, 0]);
        assert_eq!(run.non_empty().count(), 3);
        assert_eq!(run.stats.rows.len(), 3);
    }

    #[test]
    fn runs_follow_requested_order() {
        let r = roster(&[("ME", 4)]);
        let runs = run_all(&r, &[Strategy::SizeBalanced, Strategy::RoundRobin], GroupCount::new(2).unwrap());
        assert_eq!(runs[0].strategy, Strategy::SizeBalanced);
        assert_eq!(runs[1].strategy, Strategy::RoundRobin);
        assert_eq!(runs, run_all(&r, &[Strategy::SizeBalanced, Strategy::RoundRobin], GroupCount::new(2).unwrap()));
    }

    #[test]
    fn runs_on_shared_roster_from_threads() {
        let r = std::sync::Arc::new(roster(&[("AI", 6), ("CB", 5)]));
        let handles: Vec<_> = Strategy::ALL
            .iter()
            .map(|&s| {
                let r = r.clone();
                std::thread::spawn(move || run_allocation(&r, s, GroupCount::new(3).unwrap()))
            })
            .collect();
        for (h, s) in handles.into_iter().zip(Strategy::ALL) {
            let threaded = h.join().unwrap();
            assert_eq!(threaded, run_allocation(&r, s, GroupCount::new(3).unwrap()));
        }
    }
}
