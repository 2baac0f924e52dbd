#![forbid(unsafe_code)]

//! Stagger delays for lists of items that animate one after another.
//!
//! # Invariants
//!
//! 1. The first item never waits.
//! 2. Delays grow by exactly `step` per index, with no float rounding.
//! 3. The delay depends on the index alone, never on the list length.

use std::time::Duration;

/// Delay before the item at `index` starts.
#[inline]
#[must_use]
pub fn stagger_delay(index: usize, step: Duration) -> Duration {
    step.saturating_mul(u32::try_from(index).unwrap_or(u32::MAX))
}
