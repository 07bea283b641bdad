//! Local calendar decomposition exchanged with the calendar collaborator

/// Calendar components of an instant in the local time zone.
///
/// Field ranges follow the usual calendar conventions: `month` 1-12,
/// `day` 1-31, `hour` 0-23, `minute`/`second` 0-59, `millisecond` 0-999.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalFields {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub millisecond: u32,
}

impl LocalFields {
    /// Components at second resolution (millisecond = 0), as produced by
    /// the editable datetime field.
    pub fn at_second(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> Self {
        LocalFields {
            year,
            month,
            day,
            hour,
            minute,
            second,
            millisecond: 0,
        }
    }
}
