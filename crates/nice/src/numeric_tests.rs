// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use proptest::prelude::*;
use yare::parameterized;

fn ticks(lo: f64, hi: f64, opts: TickOptions) -> (f64, f64, Vec<f64>) {
    let t = nice_ticks(lo, hi, &opts).unwrap();
    (t.lower(), t.upper(), t.to_vec())
}

#[test]
fn covering_range() {
    assert_eq!(
        ticks(1.0, 19.0, TickOptions::default()),
        (0.0, 20.0, vec![0.0, 5.0, 10.0, 15.0, 20.0])
    );
}

#[test]
fn inside_range() {
    assert_eq!(
        ticks(1.0, 19.0, TickOptions::default().with_inside(true)),
        (5.0, 15.0, vec![5.0, 10.0, 15.0])
    );
}

#[test]
fn fractional_steps_do_not_drift() {
    let (_, _, values) = ticks(0.0, 0.9, TickOptions::default().with_n(10));
    assert_eq!(
        values,
        vec![0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9]
    );
}

#[test]
fn negative_ranges() {
    assert_eq!(
        ticks(-19.0, -1.0, TickOptions::default()),
        (-20.0, 0.0, vec![-20.0, -15.0, -10.0, -5.0, 0.0])
    );
}

#[parameterized(
    between_nice_values = { 7.0, 5.0, 10.0 },
    already_nice = { 5.0, 4.5, 5.5 },
    zero = { 0.0, -0.5, 0.5 },
)]
fn equal_bounds_are_widened(x: f64, lower: f64, upper: f64) {
    let t = nice_ticks(x, x, &TickOptions::default()).unwrap();
    assert!(t.lower() <= lower && t.upper() >= upper);
    assert!(t.len() >= 2);
}

#[test]
fn reversed_range_is_an_error() {
    assert!(matches!(
        nice_ticks(2.0, 1.0, &TickOptions::default()),
        Err(TickError::InvalidRange { .. })
    ));
}

#[test]
fn too_few_ticks_is_an_error() {
    assert_eq!(
        nice_ticks(0.0, 1.0, &TickOptions::default().with_n(1)),
        Err(TickError::TooFewTicks { n: 1 })
    );
}

#[test]
fn non_finite_bounds_are_rejected() {
    assert!(matches!(
        nice_ticks(0.0, f64::INFINITY, &TickOptions::default()),
        Err(TickError::NonFinite { .. })
    ));
}

#[test]
fn bad_tables_are_rejected() {
    let opts = TickOptions::default().with_base(1.0);
    assert!(matches!(
        nice_ticks(0.0, 1.0, &opts),
        Err(TickError::InvalidIntervals { .. })
    ));
    let opts = TickOptions::default().with_intervals(vec![]);
    assert!(matches!(
        nice_ticks(0.0, 1.0, &opts),
        Err(TickError::InvalidIntervals { .. })
    ));
}

#[test]
fn narrow_inside_range_falls_back_to_covering() {
    // the 0.01 step leaves no tick inside [1.011, 1.019]
    let opts = TickOptions::default().with_n(2).with_inside(true);
    let t = nice_ticks(1.011, 1.019, &opts).unwrap();
    assert_eq!(t.len(), 2);
    assert!(t.lower() <= 1.011 && t.upper() >= 1.019);
}

#[parameterized(
    rounds_up = { 4.5, 5.0 },
    rounds_down = { 1.088, 1.0 },
    exact = { 0.25, 0.25 },
    tie_goes_up = { 4.0, 5.0 },
    next_magnitude = { 9.0, 10.0 },
    large = { 1234.0, 1000.0 },
)]
fn rounding(x: f64, expected: f64) {
    assert_eq!(nice_round(x, DEFAULT_INTERVALS, 10.0), expected);
}

#[test]
fn rounding_with_a_sexagesimal_table() {
    let table = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 10.0, 12.0, 15.0, 20.0, 30.0];
    assert_eq!(nice_round(45.0, &table, 60.0), 60.0);
    assert_eq!(nice_round(25.0, &table, 60.0), 30.0);
}

#[parameterized(
    seven = { 7.0, 5.0, 10.0 },
    small = { 0.07, 0.05, 0.1 },
    negative = { -7.0, -10.0, -5.0 },
)]
fn floor_and_ceil(x: f64, floor: f64, ceil: f64) {
    assert_eq!(nice_floor(x, DEFAULT_INTERVALS, 10.0), floor);
    assert_eq!(nice_ceil(x, DEFAULT_INTERVALS, 10.0), ceil);
}

proptest! {
    #[test]
    fn ticks_cover_and_are_equispaced(
        lo in -1e6f64..1e6,
        width in 1e-3f64..1e6,
        n in 2usize..12,
    ) {
        let hi = lo + width;
        let t = nice_ticks(lo, hi, &TickOptions::default().with_n(n)).unwrap();
        let slack = lo.abs().max(hi.abs()) * 1e-12;
        prop_assert!(t.lower() <= lo + slack);
        prop_assert!(t.upper() >= hi - slack);

        let values = t.to_vec();
        prop_assert_eq!(values.first().copied(), Some(t.lower()));
        prop_assert_eq!(values.last().copied(), Some(t.upper()));
        for pair in values.windows(2) {
            prop_assert!(pair[1] > pair[0]);
            prop_assert!(((pair[1] - pair[0]) - t.step()).abs() <= t.step() * 1e-6 + slack);
        }
    }

    #[test]
    fn inside_ticks_stay_within_bounds(
        lo in -1e6f64..1e6,
        width in 1e-3f64..1e6,
        n in 2usize..12,
    ) {
        let hi = lo + width;
        let opts = TickOptions::default().with_n(n).with_inside(true);
        let t = nice_ticks(lo, hi, &opts).unwrap();
        let slack = lo.abs().max(hi.abs()) * 1e-12;
        if t.lower() >= lo - slack {
            prop_assert!(t.upper() <= hi + slack);
        }
    }
}
