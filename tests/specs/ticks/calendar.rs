//! Calendar nice-tick specs

use crate::prelude::*;
use nsk_nice::{nice_time_ticks, TickOptions, TimeLevel};
use similar_asserts::assert_eq;

#[test]
fn a_year_in_months() {
    let ticks = nice_time_ticks(
        instant("2011-01-01"),
        instant("2011-12-31"),
        &TickOptions::default().with_n(12),
    )
    .unwrap();

    let expected: Vec<_> = (1..=12)
        .map(|m| instant(&format!("2011-{m:02}-01")))
        .chain([instant("2012-01-01")])
        .collect();
    assert_eq!(ticks.level(), TimeLevel::Month);
    assert_eq!(ticks.lower(), Some(instant("2011-01-01")));
    assert_eq!(ticks.upper(), Some(instant("2012-01-01")));
    assert_eq!(ticks.ticks(), expected.as_slice());
}
