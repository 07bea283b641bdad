#![no_main]

use arbitrary::Arbitrary;
use epochal_core::{Precision, NANOS_PER_MILLI};
use epochal_engine::{parse_numeric, render_numeric};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
    text: String,
    precision: u8,
}

fuzz_target!(|input: Input| {
    let precision = match input.precision % 3 {
        0 => Precision::Seconds,
        1 => Precision::Milliseconds,
        _ => Precision::Nanoseconds,
    };
    let trimmed = input.text.trim();
    if trimmed.is_empty() {
        return;
    }
    // Must never panic; accepted values keep the remainder invariant and
    // survive a render/parse round trip.
    if let Ok(instant) = parse_numeric(trimmed, precision) {
        assert!(instant.remainder() < NANOS_PER_MILLI);
        let rendered = render_numeric(instant, precision);
        let reparsed = parse_numeric(&rendered, precision).expect("render must reparse");
        assert_eq!(reparsed, instant);
    }
});
