//! Size-balanced (uniform) allocation.
//!
//! Contract:
//! - Produces exactly `groups` groups.
//! - Target size: `ceil(total / groups)`.
//! - Categories are processed largest first (ties: code ascending); records
//!   in index order.
//! - The cursor starts at 0 and never moves back. Before each append, if the
//!   cursor group has reached the target and is not the last group, the
//!   cursor advances by one.
//! - The last group absorbs every remaining record, even past the target.
//!
//! Determinism: depends only on category sizes, codes and index order.

use alloc::vec::Vec;

use sg_core::{Group, GroupCount};

use super::empty_groups;
use crate::index::CategoryIndex;

/// `ceil(total / groups)` in integer math.
#[inline]
pub fn target_size(total: usize, groups: GroupCount) -> usize {
    total.div_ceil(groups.as_usize())
}

pub fn allocate_size_balanced(index: &CategoryIndex, groups: GroupCount) -> Vec<Group> {
    let last = groups.as_usize() - 1;
    let target = target_size(index.len(), groups);
    let mut out = empty_groups(groups);

    let mut cursor = 0usize;
    for (_code, members) in index.by_size_desc() {
        for r in members {
            if out[cursor].len() >= target && cursor < last {
                cursor += 1;
            }
            out[cursor].members.push(r.clone());
        }
    }

    out
}
