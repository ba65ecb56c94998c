//! Fractional position keys for ordered board columns.
//!
//! A move never renumbers the other projects in a column: the moved project
//! gets a key strictly between its new neighbours (or one step past the end).

/// Spacing used when a column is re-spaced by [`respace`].
pub const REBALANCE_SPACING: f64 = 1000.0;

/// Compute the position for an item landing at `index` in a column whose
/// remaining items have the ascending positions `siblings`.
///
/// - empty column: `0`
/// - `index == 0`: one below the current head
/// - `index >= siblings.len()`: one above the current tail
/// - otherwise: the mean of the two neighbours
pub fn allocate(siblings: &[f64], index: usize) -> f64 {
    match siblings {
        [] => 0.0,
        [first, ..] if index == 0 => first - 1.0,
        [.., last] if index >= siblings.len() => last + 1.0,
        _ => midpoint(siblings[index - 1], siblings[index]),
    }
}

/// Position for a new item appended to the end of a column.
pub fn append(siblings: &[f64]) -> f64 {
    allocate(siblings, siblings.len())
}

/// Whether [`allocate`] at `index` can no longer produce a key strictly
/// between the neighbours at `f64` resolution.
pub fn gap_exhausted(siblings: &[f64], index: usize) -> bool {
    if siblings.is_empty() || index == 0 || index >= siblings.len() {
        return false;
    }
    let (lo, hi) = (siblings[index - 1], siblings[index]);
    let mid = midpoint(lo, hi);
    !(lo < mid && mid < hi)
}

/// Evenly spaced positions for a column of `count` items, in order.
pub fn respace(count: usize) -> Vec<f64> {
    (0..count).map(|i| i as f64 * REBALANCE_SPACING).collect()
}

fn midpoint(lo: f64, hi: f64) -> f64 {
    (lo + hi) / 2.0
}
