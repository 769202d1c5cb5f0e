//! Round-robin (branch-wise) allocation.
//!
//! Contract:
//! - Produces exactly `groups` groups (some empty when records < groups).
//! - Categories are visited in ascending code order, records in index order.
//! - Each record goes to the group at the cursor; the cursor then advances
//!   `(cursor + 1) % groups` and is **not** reset between categories.
//!
//! Consequence: members of one category are spread so that any two groups
//! differ by at most one member of that category.

use alloc::vec::Vec;

use sg_core::{Group, GroupCount};

use super::empty_groups;
use crate::index::CategoryIndex;

pub fn allocate_round_robin(index: &CategoryIndex, groups: GroupCount) -> Vec<Group> {
    let n = groups.as_usize();
    let mut out = empty_groups(groups);

    let mut cursor = 0usize;
    for (_code, members) in index.iter() {
        for r in members {
            out[cursor].members.push(r.clone());
            cursor = (cursor + 1) % n;
        }
    }

    out
}
