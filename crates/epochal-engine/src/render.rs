//! Pure render/parse helpers for the editable and derived fields
//!
//! All arithmetic is exact integer arithmetic: `i64` for seconds and
//! milliseconds, arbitrary precision (then `i128`) for nanoseconds. Floats
//! are never involved.

use std::num::IntErrorKind;

use chrono::{Datelike, NaiveDateTime, Timelike};
use epochal_core::{
    parse_big_decimal, ConvertError, ConvertResult, Instant, LocalFields, Precision,
    MILLIS_PER_SEC,
};

/// Strftime pattern of the editable datetime field, second resolution.
pub const DATETIME_LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Render the numeric field in the given precision.
///
/// Seconds floor toward negative infinity for sub-second millisecond
/// values; nanoseconds include any carried remainder.
pub fn render_numeric(instant: Instant, precision: Precision) -> String {
    match precision {
        Precision::Seconds => instant.floor_secs().to_string(),
        Precision::Milliseconds => instant.millis().to_string(),
        Precision::Nanoseconds => instant.total_nanos().to_string(),
    }
}

/// Parse the numeric field in the given precision. The caller has already
/// trimmed the text and ruled out the empty case.
pub fn parse_numeric(text: &str, precision: Precision) -> ConvertResult<Instant> {
    match precision {
        Precision::Nanoseconds => {
            // May exceed any fixed-width integer; split in arbitrary
            // precision with a floor-division (non-negative) remainder.
            let nanos = parse_big_decimal(text)?;
            Instant::from_total_nanos(&nanos)
        }
        Precision::Milliseconds => parse_fixed(text).map(Instant::from_millis),
        Precision::Seconds => {
            let secs = parse_fixed(text)?;
            let millis = secs
                .checked_mul(MILLIS_PER_SEC)
                .ok_or(ConvertError::TimestampOutOfRange)?;
            Ok(Instant::from_millis(millis))
        }
    }
}

fn parse_fixed(text: &str) -> ConvertResult<i64> {
    text.parse::<i64>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => ConvertError::TimestampOutOfRange,
        _ => ConvertError::InvalidTimestamp,
    })
}

/// Render calendar fields as the editable `YYYY-MM-DDTHH:mm:ss` value.
pub fn render_datetime_local(fields: &LocalFields) -> String {
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
        fields.year, fields.month, fields.day, fields.hour, fields.minute, fields.second
    )
}

/// Parse the editable datetime field. Strict: second resolution, no
/// sub-second part, nonexistent calendar values rejected.
pub fn parse_datetime_local(text: &str) -> ConvertResult<LocalFields> {
    let naive = NaiveDateTime::parse_from_str(text, DATETIME_LOCAL_FORMAT)
        .map_err(|_| ConvertError::InvalidDateTime)?;
    Ok(LocalFields::at_second(
        naive.year(),
        naive.month(),
        naive.day(),
        naive.hour(),
        naive.minute(),
        naive.second(),
    ))
}

/// Fractional-second suffix of the copy field, exact for the precision:
/// empty at seconds, 3 digits at milliseconds, 9 digits at nanoseconds.
pub fn fraction_suffix(instant: Instant, precision: Precision) -> String {
    match precision {
        Precision::Seconds => String::new(),
        Precision::Milliseconds => format!(".{:03}", instant.subsec_millis()),
        Precision::Nanoseconds => format!(".{:09}", instant.fraction_nanos()),
    }
}

/// Full-precision copy rendering: readable base plus precision fraction.
pub fn render_copy(readable: &str, instant: Instant, precision: Precision) -> String {
    let mut copy = String::with_capacity(readable.len() + 10);
    copy.push_str(readable);
    copy.push_str(&fraction_suffix(instant, precision));
    copy
}
