#![no_main]

use epochal_engine::parse_datetime_local;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|text: &str| {
    // Must never panic; accepted fields stay in calendar range.
    if let Ok(fields) = parse_datetime_local(text) {
        assert!((1..=12).contains(&fields.month));
        assert!((1..=31).contains(&fields.day));
        assert!(fields.hour <= 23);
        assert!(fields.minute <= 59);
        assert!(fields.second <= 59);
        assert_eq!(fields.millisecond, 0);
    }
});
