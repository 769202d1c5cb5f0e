// crates/sg_algo/src/lib.rs
#![forbid(unsafe_code)]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

// Core types re-exported for callers that only depend on the algorithm layer.
pub use sg_core::{CategoryCode, Group, GroupCount, Record, Strategy};

// ----------------------------- Category index ---------------------------------------

pub mod index;
pub use index::{build_category_index, CategoryIndex};

// ----------------------------- Allocation (public surface) ---------------------------

pub mod allocation {
    // File modules (actual implementations)
    pub mod round_robin;
    pub mod size_balanced;

    pub use round_robin::allocate_round_robin;
    pub use size_balanced::{allocate_size_balanced, target_size};

    use alloc::vec::Vec;
    use sg_core::{Group, GroupCount, Strategy};

    use crate::index::CategoryIndex;

    /// Dispatch to the allocator for `strategy`.
    pub fn allocate(index: &CategoryIndex, groups: GroupCount, strategy: Strategy) -> Vec<Group> {
        match strategy {
            Strategy::RoundRobin => allocate_round_robin(index, groups),
            Strategy::SizeBalanced => allocate_size_balanced(index, groups),
        }
    }

    /// `count` empty groups indexed `0..count`.
    pub(crate) fn empty_groups(count: GroupCount) -> Vec<Group> {
        (0..count.as_usize()).map(Group::new).collect()
    }
}

pub use allocation::allocate;

// ----------------------------- Statistics -------------------------------------------

pub mod stats;
pub use stats::{build_stats, StatsRow, StatsTable};
