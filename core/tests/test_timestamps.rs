// core/tests/test_timestamps.rs
use geneactiv_core::timestamp::{block_epoch, fill_block_timestamps, parse_clock_stamp};

#[test]
fn test_clock_stamp_fields_are_fixed_width_substrings() {
    let stamp = parse_clock_stamp("Page Time:2016-03-01 13:05:30:250").unwrap();
    assert_eq!(
        (stamp.year, stamp.month, stamp.day, stamp.hour, stamp.minute, stamp.second, stamp.millis),
        (2016, 3, 1, 13, 5, 30, 250)
    );
}

#[test]
fn test_block_epoch_is_utc_with_millis_fraction() {
    let stamp = parse_clock_stamp("Page Time:2016-03-01 13:05:30:250").unwrap();
    // 2016-03-01 13:05:30 UTC = 1456837530; ingen tidssone/DST-justering
    assert_eq!(block_epoch(&stamp), Some(1_456_837_530.25));
}

#[test]
fn test_impossible_calendar_date_is_rejected() {
    let stamp = parse_clock_stamp("Page Time:2015-02-29 00:00:00:000").unwrap();
    assert_eq!(block_epoch(&stamp), None);
    let stamp = parse_clock_stamp("Page Time:2016-13-01 00:00:00:000").unwrap();
    assert_eq!(block_epoch(&stamp), None);
}

#[test]
fn test_fill_gives_constant_spacing_from_block_start() {
    let mut ts = vec![0.0; 300];
    fill_block_timestamps(&mut ts, 1_456_837_530.25, 85.7);

    assert_eq!(ts[0], 1_456_837_530.25);
    for (j, pair) in ts.windows(2).enumerate() {
        let spacing = pair[1] - pair[0];
        assert!(pair[1] > pair[0], "sample {j}: skal være strengt stigende");
        assert!((spacing - 1.0 / 85.7).abs() < 1e-6, "sample {j}: spacing {spacing}");
    }
}
