//! Calendar and readable-formatter collaborators
//!
//! The engine never talks to chrono directly; it goes through these seams so
//! tests can substitute a fixed-offset zone for the ambient local one.

use chrono::{
    DateTime, Datelike, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, Offset,
    TimeZone, Timelike, Utc,
};
use epochal_core::LocalFields;

/// Strftime pattern for the readable projection: one fixed long
/// date + time style, e.g. `Tuesday, November 14, 2023 22:13:20`.
pub const READABLE_FORMAT: &str = "%A, %B %d, %Y %H:%M:%S";

/// Local-calendar decomposition of epoch milliseconds, and its inverse.
pub trait Calendar {
    /// Decompose an instant into local calendar fields.
    /// `None` when the platform rejects the millisecond value.
    fn to_local_fields(&self, millis: i64) -> Option<LocalFields>;

    /// Interpret calendar fields as local time.
    /// `None` for nonexistent values (bad dates, DST gaps).
    fn from_local_fields(&self, fields: &LocalFields) -> Option<i64>;
}

/// Long-form localized rendering of an instant (display only).
pub trait ReadableFormatter {
    fn format(&self, millis: i64) -> Option<String>;
}

fn fields_of<Tz: TimeZone>(dt: &DateTime<Tz>) -> LocalFields {
    LocalFields {
        year: dt.year(),
        month: dt.month(),
        day: dt.day(),
        hour: dt.hour(),
        minute: dt.minute(),
        second: dt.second(),
        millisecond: dt.timestamp_subsec_millis(),
    }
}

fn naive_of(fields: &LocalFields) -> Option<NaiveDateTime> {
    let date = NaiveDate::from_ymd_opt(fields.year, fields.month, fields.day)?;
    let time =
        NaiveTime::from_hms_milli_opt(fields.hour, fields.minute, fields.second, fields.millisecond)?;
    Some(NaiveDateTime::new(date, time))
}

/// System local zone, via chrono's `Local`.
///
/// Ambiguous local datetimes (fall-back DST transitions) resolve to the
/// earlier instant; spring-forward gaps are invalid.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalCalendar;

impl Calendar for LocalCalendar {
    fn to_local_fields(&self, millis: i64) -> Option<LocalFields> {
        let utc = DateTime::<Utc>::from_timestamp_millis(millis)?;
        Some(fields_of(&utc.with_timezone(&Local)))
    }

    fn from_local_fields(&self, fields: &LocalFields) -> Option<i64> {
        let naive = naive_of(fields)?;
        Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.timestamp_millis())
    }
}

/// Fixed-offset zone for deterministic tests and simulations.
#[derive(Clone, Copy, Debug)]
pub struct OffsetCalendar(FixedOffset);

impl OffsetCalendar {
    pub fn new(offset: FixedOffset) -> Self {
        OffsetCalendar(offset)
    }

    /// UTC (offset zero).
    pub fn utc() -> Self {
        OffsetCalendar(Utc.fix())
    }
}

impl Calendar for OffsetCalendar {
    fn to_local_fields(&self, millis: i64) -> Option<LocalFields> {
        let utc = DateTime::<Utc>::from_timestamp_millis(millis)?;
        Some(fields_of(&utc.with_timezone(&self.0)))
    }

    fn from_local_fields(&self, fields: &LocalFields) -> Option<i64> {
        let naive = naive_of(fields)?;
        self.0
            .from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.timestamp_millis())
    }
}

/// Readable projection in the system local zone.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalFormatter;

impl ReadableFormatter for LocalFormatter {
    fn format(&self, millis: i64) -> Option<String> {
        let utc = DateTime::<Utc>::from_timestamp_millis(millis)?;
        Some(
            utc.with_timezone(&Local)
                .format(READABLE_FORMAT)
                .to_string(),
        )
    }
}

/// Readable projection at a fixed offset, for deterministic tests.
#[derive(Clone, Copy, Debug)]
pub struct OffsetFormatter(pub FixedOffset);

impl ReadableFormatter for OffsetFormatter {
    fn format(&self, millis: i64) -> Option<String> {
        let utc = DateTime::<Utc>::from_timestamp_millis(millis)?;
        Some(utc.with_timezone(&self.0).format(READABLE_FORMAT).to_string())
    }
}
