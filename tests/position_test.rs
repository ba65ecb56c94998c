//! Fractional position allocation.
//!
//! Run with: `cargo test --test position_test`
use crm_backend::board::position::{REBALANCE_SPACING, allocate, append, gap_exhausted, respace};

#[test]
fn test_empty_column_starts_at_zero() {
    assert_eq!(allocate(&[], 0), 0.0);
    assert_eq!(allocate(&[], 5), 0.0);
    assert_eq!(append(&[]), 0.0);
}

#[test]
fn test_head_goes_one_below_first() {
    assert_eq!(allocate(&[0.0, 1.0, 2.0], 0), -1.0);
    assert_eq!(allocate(&[-3.5], 0), -4.5);
}

#[test]
fn test_tail_goes_one_above_last() {
    assert_eq!(allocate(&[0.0, 1.0, 2.0], 3), 3.0);
    // Indexes past the end clamp to the tail.
    assert_eq!(allocate(&[0.0, 1.0, 2.0], 42), 3.0);
    assert_eq!(append(&[10.0, 20.0]), 21.0);
}

#[test]
fn test_middle_takes_the_mean_of_neighbours() {
    assert_eq!(allocate(&[0.0, 1.0, 2.0], 1), 0.5);
    assert_eq!(allocate(&[0.0, 1.0, 2.0], 2), 1.5);
    assert_eq!(allocate(&[-1.0, 0.0], 1), -0.5);
}

#[test]
fn test_allocated_key_sorts_into_requested_index() {
    let siblings = [-2.0, 0.0, 0.25, 7.0, 100.0];

    for index in 0..=siblings.len() {
        let key = allocate(&siblings, index);
        let mut column: Vec<f64> = siblings.to_vec();
        column.push(key);
        column.sort_by(f64::total_cmp);

        let landed = column.iter().position(|p| *p == key).unwrap();
        assert_eq!(landed, index, "key {key} landed at {landed}, wanted {index}");
    }
}

#[test]
fn test_repeated_halving_eventually_exhausts_the_gap() {
    let (lo, mut hi) = (0.0_f64, 1.0_f64);
    let mut steps = 0;

    while !gap_exhausted(&[lo, hi], 1) {
        hi = allocate(&[lo, hi], 1);
        steps += 1;
        assert!(steps < 2000, "gap never reported as exhausted");
    }

    // f64 has far fewer than 2000 halvings between 0 and 1 before subnormals run out.
    assert!(steps > 50);
}

#[test]
fn test_gap_exhausted_is_false_at_the_edges() {
    assert!(!gap_exhausted(&[], 0));
    assert!(!gap_exhausted(&[1.0, 1.0], 0));
    assert!(!gap_exhausted(&[1.0, 1.0], 2));
    assert!(gap_exhausted(&[1.0, 1.0], 1));
}

#[test]
fn test_respace_is_evenly_spaced_and_ordered() {
    assert!(respace(0).is_empty());
    assert_eq!(
        respace(4),
        vec![
            0.0,
            REBALANCE_SPACING,
            2.0 * REBALANCE_SPACING,
            3.0 * REBALANCE_SPACING
        ]
    );
}
