//! Timestamp parsing and binning specs

use crate::prelude::*;
use nsk_time::{bin_instant, parse_instant, BinSize, Duration, Instant, Precision};
use similar_asserts::assert_eq;

#[test]
fn offset_timestamp_normalizes_to_utc() {
    let parsed = instant("2010-02-03T04:05:06.007008+09:10");
    let expected = Instant::from_ymd_hms_micro(2010, 2, 2, 18, 55, 6, 7008).unwrap();
    assert_eq!(parsed, expected);
    assert_eq!(parsed.utc(), expected.utc());
}

#[test]
fn every_accepted_form_names_the_same_instant() {
    let expected = Instant::from_ymd_hms_micro(2010, 2, 3, 4, 5, 6, 0).unwrap();
    for text in [
        "2010-02-03T04:05:06",
        "2010-02-03 04:05:06Z",
        "20100203T040506",
        "2010/02/03T04:05:06",
        "2010/02/03:04:05:06",
        "02/03/2010:04:05:06",
    ] {
        assert_eq!(instant(text), expected, "{text}");
    }
    assert_eq!(parse_instant(1_265_169_906).unwrap(), expected);
    assert_eq!(parse_instant(1_265_169_906.0).unwrap(), expected);
}

#[test]
fn silk_format_round_trips_at_millisecond_precision() {
    let t = instant("2010-02-03T04:05:06.007");
    let text = t.format_silk(Precision::Msec);
    assert_eq!(text, "2010/02/03T04:05:06.007");
    assert_eq!(instant(&text), t);
}

#[test]
fn binning_is_idempotent() {
    let t = instant("2011-07-19T13:47:12.5");
    for size in [
        BinSize::fixed(Duration::minutes(5)).unwrap(),
        BinSize::fixed(Duration::hours(1)).unwrap(),
        BinSize::parse("month").unwrap(),
        BinSize::parse("year").unwrap(),
    ] {
        let once = bin_instant(size, t).unwrap();
        assert_eq!(bin_instant(size, once).unwrap(), once, "{size:?}");
        assert!(once <= t);
    }
}
