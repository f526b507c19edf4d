// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn t(s: &str) -> Instant {
    crate::parse_instant(s).unwrap()
}

#[test]
fn sunday_bins_start_on_the_week_epoch() {
    let bins = WeekdayBins::sundays();
    assert_eq!(bins.zero(), t("1970-01-04"));
    assert_eq!(
        bins.bins(t("2011-03-04T12:00:00")).unwrap(),
        (t("2011-02-27"), t("2011-03-06"))
    );
}

#[test]
fn other_weekdays_shift_the_zero() {
    let mondays = WeekdayBins::new(Weekday::Mon);
    assert_eq!(mondays.zero(), t("1970-01-05"));
    assert_eq!(mondays.bin(t("2011-03-06T23:59:59")).unwrap(), t("2011-02-28"));
    assert_eq!(mondays.bin(t("2011-03-07")).unwrap(), t("2011-03-07"));
}

#[test]
fn align_forward_fills_sparse_measurements() {
    let bins = WeekdayBins::sundays();
    let known = vec![t("2011-01-02"), t("2011-01-09"), t("2011-01-16")];
    let measured = vec![t("2011-01-03")];
    let pairs: Vec<_> = bins
        .align(known, measured)
        .collect::<Result<_, _>>()
        .unwrap();
    // the Jan 3 measurement lands in the Jan 2 week and carries forward
    assert_eq!(
        pairs,
        vec![
            (t("2011-01-02"), t("2011-01-03")),
            (t("2011-01-09"), t("2011-01-03")),
            (t("2011-01-16"), t("2011-01-03")),
        ]
    );
}

#[test]
fn align_drops_leading_and_dense_measurements() {
    let bins = WeekdayBins::sundays();
    let known = vec![t("2011-01-09"), t("2011-01-16")];
    let measured = vec![
        t("2010-12-20"),
        t("2011-01-01"),
        t("2011-01-10"),
        t("2011-01-12"),
        t("2011-01-17"),
    ];
    let pairs: Vec<_> = bins
        .align(known, measured)
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(
        pairs,
        vec![
            (t("2011-01-09"), t("2011-01-12")),
            (t("2011-01-16"), t("2011-01-17")),
        ]
    );
}

#[test]
fn align_skips_bins_before_the_first_measurement() {
    let bins = WeekdayBins::sundays();
    let known = vec![t("2011-01-02"), t("2011-01-09")];
    let measured = vec![t("2011-01-11")];
    let pairs: Vec<_> = bins.align(known, measured).collect();
    assert_eq!(pairs, vec![Ok((t("2011-01-09"), t("2011-01-11")))]);
}

#[test]
fn misaligned_known_date_stops_iteration() {
    let bins = WeekdayBins::sundays();
    let known = vec![t("2011-01-02"), t("2011-01-05"), t("2011-01-09")];
    let measured = vec![t("2011-01-02")];
    let items: Vec<_> = bins.align(known, measured).collect();
    assert_eq!(items.len(), 2);
    assert!(items[0].is_ok());
    assert!(matches!(items[1], Err(TimeError::Misaligned { .. })));
}
