//! Numeric nice-tick specs

use crate::prelude::*;
use nsk_nice::{nice_ticks, TickOptions};
use similar_asserts::assert_eq;

#[test]
fn one_to_nineteen_covers_with_fives() {
    let ticks = nice_ticks(1.0, 19.0, &TickOptions::default()).unwrap();
    assert_eq!(
        (ticks.lower(), ticks.upper(), ticks.to_vec()),
        (0.0, 20.0, vec![0.0, 5.0, 10.0, 15.0, 20.0])
    );
}

#[test]
fn inside_keeps_ticks_within_the_range() {
    let ticks = nice_ticks(1.0, 19.0, &TickOptions::default().with_inside(true)).unwrap();
    assert_eq!(
        (ticks.lower(), ticks.upper(), ticks.to_vec()),
        (5.0, 15.0, vec![5.0, 10.0, 15.0])
    );
}

#[test]
fn covering_ticks_contain_the_range_and_are_equispaced() {
    for (lo, hi, n) in [(0.3, 7.2, 5), (-13.0, 2.5, 7), (1e-3, 4.2e-3, 4), (120.0, 120.5, 3)] {
        let opts = TickOptions::default().with_n(n);
        let ticks = nice_ticks(lo, hi, &opts).unwrap();
        let values = ticks.to_vec();
        assert!(ticks.lower() <= lo && hi <= ticks.upper(), "{lo}..{hi}");
        assert!(values[0] >= ticks.lower());
        assert!(values[values.len() - 1] <= ticks.upper());
        let step = ticks.step();
        for pair in values.windows(2) {
            assert!(((pair[1] - pair[0]) - step).abs() <= step * 1e-9, "{values:?}");
        }
    }
}
