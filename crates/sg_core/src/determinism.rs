//! Determinism utilities: stable orderings used by the index and allocators.
//!
//! This module is **I/O-free**. It provides:
//! - A stable total order for category codes
//! - Stable (input-order preserving) name sort for records
//! - The largest-first category order used by size-balanced allocation

use core::cmp::Ordering;

use crate::entities::Record;
use crate::ids::CategoryCode;

/* -------------------------------------------------------------------------- */
/*                               Stable Ordering                              */
/* -------------------------------------------------------------------------- */

/// Provide a **total**, stable order for values that must sort canonically.
pub trait StableOrd {
    fn stable_cmp(&self, other: &Self) -> Ordering;
}

impl StableOrd for CategoryCode {
    #[inline]
    fn stable_cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl StableOrd for Record {
    /// Records order by `name` only; equal names compare `Equal` so a stable
    /// sort keeps their input order.
    #[inline]
    fn stable_cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

/* -------------------------------------------------------------------------- */
/*                            Canonical sort helpers                           */
/* -------------------------------------------------------------------------- */

/// Sort records **in place** by name ascending; ties keep input order.
#[inline]
pub fn sort_records_by_name(xs: &mut [Record]) {
    // `sort_by` is stable.
    xs.sort_by(|a, b| a.stable_cmp(b));
}

/// Largest-first ordering of `(code, size)` pairs: size ↓, then code ↑.
#[inline]
pub fn cmp_size_desc_then_code(a: (&CategoryCode, usize), b: (&CategoryCode, usize)) -> Ordering {
    match b.1.cmp(&a.1) {
        Ordering::Equal => a.0.stable_cmp(b.0),
        o => o,
    }
}

/* ---------------------------------- Tests --------------------------------- */
