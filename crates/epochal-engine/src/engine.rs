//! Conversion engine - owns the canonical instant and its projections
//!
//! The engine is a synchronous event reducer. Each handler replaces the
//! state record wholesale and returns effects (clipboard writes, advisory
//! auto-clear timers) as data for the surrounding shell to execute. The
//! only asynchronous collaborator is the clipboard, whose completion
//! re-enters the engine as `ClipboardFinished` and can only touch the
//! transient advisory, never conversion state.

use std::time::Duration;

use epochal_core::{ConvertError, ConvertResult, Instant, Precision};

use crate::calendar::{Calendar, LocalCalendar, LocalFormatter, ReadableFormatter};
use crate::clock::{SystemClock, WallClock};
use crate::render::{
    parse_datetime_local, parse_numeric, render_copy, render_datetime_local, render_numeric,
};

/// Engine configuration
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// How long transient copy advisories stay visible before the shell's
    /// timer fires `AdvisoryExpired`.
    pub advisory_visible: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            advisory_visible: Duration::from_millis(1800),
        }
    }
}

/// Textual projections derived from the canonical instant. Never stored
/// independently once an instant is set; blank (except the field being
/// typed) when there is none.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Projections {
    /// Numeric timestamp in the active precision.
    pub numeric: String,
    /// Editable local datetime, `YYYY-MM-DDTHH:mm:ss`.
    pub datetime_local: String,
    /// Long-form readable rendering, display only.
    pub readable: String,
    /// Full-precision copy rendering.
    pub copy: String,
}

/// Non-fatal, transient user-facing message. Never an error state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Advisory {
    /// Nanosecond input carried a sub-millisecond remainder: readable
    /// projections truncate to millisecond resolution, the copy field
    /// keeps full precision.
    PrecisionLoss { remainder_nanos: u32 },
    /// Clipboard write succeeded; auto-clears.
    Copied,
    /// Clipboard write failed; advisory only, auto-clears.
    CopyFailed(ConvertError),
}

impl std::fmt::Display for Advisory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Advisory::PrecisionLoss { remainder_nanos } => write!(
                f,
                "Display is limited to millisecond resolution; the {remainder_nanos} ns remainder shows only in the numeric and copy values"
            ),
            Advisory::Copied => write!(f, "Copied to clipboard"),
            Advisory::CopyFailed(err) => write!(f, "Copy failed: {err}"),
        }
    }
}

/// Widget state, replaced wholesale by each handler.
#[derive(Clone, Debug, Default)]
pub struct EngineState {
    pub instant: Option<Instant>,
    pub precision: Precision,
    pub projections: Projections,
    pub error: Option<ConvertError>,
    pub advisory: Option<Advisory>,
}

/// Which field a copy action targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CopyTarget {
    /// The numeric timestamp field.
    Numeric,
    /// The full-precision copy rendering.
    Formatted,
}

/// Discrete user or shell input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// "Use current time" pressed.
    Now,
    /// Precision toggle pressed.
    PrecisionSelected(Precision),
    /// Numeric field edited (raw text).
    NumericEdited(String),
    /// Datetime field edited (raw text).
    DatetimeEdited(String),
    /// Copy button pressed.
    CopyRequested(CopyTarget),
    /// The shell finished the asynchronous clipboard write.
    ClipboardFinished(ConvertResult<()>),
    /// The shell's advisory timer fired.
    AdvisoryExpired,
}

/// Side effect for the shell to execute.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Write text to the clipboard, fire-and-forget; report back with
    /// `Event::ClipboardFinished`.
    WriteClipboard(String),
    /// Schedule an `Event::AdvisoryExpired` after the duration.
    ClearAdvisoryAfter(Duration),
}

/// Conversion engine - keeps the numeric, datetime, readable, and copy
/// projections of one canonical instant mutually consistent.
pub struct Engine {
    state: EngineState,
    clock: Box<dyn WallClock>,
    calendar: Box<dyn Calendar>,
    formatter: Box<dyn ReadableFormatter>,
    config: EngineConfig,
}

impl Engine {
    /// Engine over the system clock and local zone.
    pub fn new() -> Self {
        Self::with_collaborators(
            Box::new(SystemClock),
            Box::new(LocalCalendar),
            Box::new(LocalFormatter),
        )
    }

    /// Engine over the system clock and local zone with custom configuration.
    pub fn with_config(config: EngineConfig) -> Self {
        let mut engine = Self::new();
        engine.config = config;
        engine
    }

    /// Engine over explicit collaborators (frozen clocks, fixed offsets).
    pub fn with_collaborators(
        clock: Box<dyn WallClock>,
        calendar: Box<dyn Calendar>,
        formatter: Box<dyn ReadableFormatter>,
    ) -> Self {
        Engine {
            state: EngineState::default(),
            clock,
            calendar,
            formatter,
            config: EngineConfig::default(),
        }
    }

    /// Current state record.
    pub fn state(&self) -> &EngineState {
        &self.state
    }

    #[inline]
    pub fn precision(&self) -> Precision {
        self.state.precision
    }

    #[inline]
    pub fn instant(&self) -> Option<Instant> {
        self.state.instant
    }

    /// Dispatch one input event, returning effects for the shell.
    pub fn handle(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::Now => {
                self.from_now();
                Vec::new()
            }
            Event::PrecisionSelected(precision) => {
                self.set_precision(precision);
                Vec::new()
            }
            Event::NumericEdited(text) => {
                self.parse_numeric_field(&text);
                Vec::new()
            }
            Event::DatetimeEdited(text) => {
                self.parse_datetime_field(&text);
                Vec::new()
            }
            Event::CopyRequested(target) => self.copy_field(target),
            Event::ClipboardFinished(result) => self.finish_copy(result),
            Event::AdvisoryExpired => {
                self.expire_advisory();
                Vec::new()
            }
        }
    }

    /// Replace the canonical instant with the current wall-clock reading.
    /// Always succeeds; remainder 0.
    pub fn from_now(&mut self) {
        let millis = self.clock.now_millis();
        tracing::debug!(millis, "wall clock read");
        self.accept(Instant::from_millis(millis), None, Field::Numeric, "");
    }

    /// Re-project the stored instant in a new precision. Pure: the instant
    /// itself is unchanged, except that leaving nanoseconds truncates the
    /// carried remainder. Never fails.
    pub fn set_precision(&mut self, precision: Precision) {
        if precision == self.state.precision {
            return;
        }
        let leaving_nanos = self.state.precision == Precision::Nanoseconds
            && precision != Precision::Nanoseconds;
        tracing::debug!(%precision, "precision selected");

        let Some(prior) = self.state.instant else {
            self.state.precision = precision;
            return;
        };
        let instant = if leaving_nanos {
            prior.truncate_remainder()
        } else {
            prior
        };
        self.accept_at(instant, precision, None, Field::Numeric, "");
    }

    /// Parse the numeric field in the active precision.
    pub fn parse_numeric_field(&mut self, text: &str) {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            self.clear(Field::Numeric, text, None);
            return;
        }
        match parse_numeric(trimmed, self.state.precision) {
            Ok(instant) => {
                let advisory = if instant.has_remainder() {
                    Some(Advisory::PrecisionLoss {
                        remainder_nanos: instant.remainder(),
                    })
                } else {
                    None
                };
                self.accept(instant, advisory, Field::Numeric, text);
            }
            Err(err) => {
                tracing::warn!(%err, "numeric field rejected");
                self.clear(Field::Numeric, text, Some(err));
            }
        }
    }

    /// Parse the local datetime field (`YYYY-MM-DDTHH:mm:ss`).
    pub fn parse_datetime_field(&mut self, text: &str) {
        if text.trim().is_empty() {
            self.clear(Field::Datetime, text, None);
            return;
        }
        let millis = parse_datetime_local(text.trim()).and_then(|fields| {
            self.calendar
                .from_local_fields(&fields)
                .ok_or(ConvertError::InvalidDateTime)
        });
        match millis {
            Ok(millis) => self.accept(Instant::from_millis(millis), None, Field::Datetime, text),
            Err(err) => {
                tracing::warn!(%err, "datetime field rejected");
                self.clear(Field::Datetime, text, Some(err));
            }
        }
    }

    /// Request a copy of the numeric or formatted field. No-op when the
    /// field is empty.
    pub fn copy_field(&mut self, target: CopyTarget) -> Vec<Effect> {
        let text = match target {
            CopyTarget::Numeric => &self.state.projections.numeric,
            CopyTarget::Formatted => &self.state.projections.copy,
        };
        if text.is_empty() {
            return Vec::new();
        }
        vec![Effect::WriteClipboard(text.clone())]
    }

    fn finish_copy(&mut self, result: ConvertResult<()>) -> Vec<Effect> {
        match result {
            Ok(()) => {
                self.state.advisory = Some(Advisory::Copied);
                vec![Effect::ClearAdvisoryAfter(self.config.advisory_visible)]
            }
            Err(err) => {
                tracing::warn!(%err, "clipboard write failed");
                self.state.advisory = Some(Advisory::CopyFailed(err));
                vec![Effect::ClearAdvisoryAfter(self.config.advisory_visible)]
            }
        }
    }

    /// Clear transient copy advisories. A stale timer never clears a
    /// newer precision-loss notice.
    fn expire_advisory(&mut self) {
        if matches!(
            self.state.advisory,
            Some(Advisory::Copied) | Some(Advisory::CopyFailed(_))
        ) {
            self.state.advisory = None;
        }
    }

    fn accept(&mut self, instant: Instant, advisory: Option<Advisory>, field: Field, text: &str) {
        self.accept_at(instant, self.state.precision, advisory, field, text);
    }

    /// Install a new canonical instant: recompute every projection and
    /// replace the state record wholesale. Falls back to a cleared error
    /// state when the calendar collaborator rejects the millisecond value.
    fn accept_at(
        &mut self,
        instant: Instant,
        precision: Precision,
        advisory: Option<Advisory>,
        field: Field,
        text: &str,
    ) {
        let projected = self.calendar.to_local_fields(instant.millis()).map(|fields| {
            let readable = self
                .formatter
                .format(instant.millis())
                .unwrap_or_default();
            Projections {
                numeric: render_numeric(instant, precision),
                datetime_local: render_datetime_local(&fields),
                copy: render_copy(&readable, instant, precision),
                readable,
            }
        });
        match projected {
            Some(projections) => {
                tracing::debug!(millis = instant.millis(), %precision, "instant accepted");
                self.state = EngineState {
                    instant: Some(instant),
                    precision,
                    projections,
                    error: None,
                    advisory,
                };
            }
            None => {
                let err = match field {
                    Field::Numeric => ConvertError::InvalidTimestamp,
                    Field::Datetime => ConvertError::InvalidDateTime,
                };
                tracing::warn!(millis = instant.millis(), "calendar rejected instant");
                self.clear(field, text, Some(err));
            }
        }
    }

    /// Discard the instant: every projection goes blank except the field
    /// currently being typed, which echoes the raw text.
    fn clear(&mut self, field: Field, text: &str, error: Option<ConvertError>) {
        let mut projections = Projections::default();
        match field {
            Field::Numeric => projections.numeric = text.to_string(),
            Field::Datetime => projections.datetime_local = text.to_string(),
        }
        self.state = EngineState {
            instant: None,
            precision: self.state.precision,
            projections,
            error,
            advisory: None,
        };
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

/// Which editable field an edit came from (for text echo on failure).
#[derive(Clone, Copy, Debug)]
enum Field {
    Numeric,
    Datetime,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{OffsetCalendar, OffsetFormatter};
    use crate::clock::FixedClock;
    use chrono::{FixedOffset, Offset, Utc};

    const FROZEN_MS: i64 = 1_700_000_000_000;

    fn engine() -> Engine {
        engine_at(FROZEN_MS)
    }

    fn engine_at(millis: i64) -> Engine {
        Engine::with_collaborators(
            Box::new(FixedClock(millis)),
            Box::new(OffsetCalendar::utc()),
            Box::new(OffsetFormatter(Utc.fix())),
        )
    }

    #[test]
    fn test_from_now_frozen_clock() {
        let mut e = engine();
        assert!(e.handle(Event::Now).is_empty());

        let s = e.state();
        assert_eq!(s.instant, Some(Instant::from_millis(FROZEN_MS)));
        assert_eq!(s.projections.numeric, "1700000000000");
        assert_eq!(s.projections.datetime_local, "2023-11-14T22:13:20");
        assert_eq!(s.projections.readable, "Tuesday, November 14, 2023 22:13:20");
        assert_eq!(s.projections.copy, "Tuesday, November 14, 2023 22:13:20.000");
        assert_eq!(s.error, None);
        assert_eq!(s.advisory, None);
    }

    #[test]
    fn test_seconds_rendering_floors() {
        let mut e = engine_at(1_700_000_000_500);
        e.handle(Event::PrecisionSelected(Precision::Seconds));
        e.handle(Event::Now);
        assert_eq!(e.state().projections.numeric, "1700000000");
        // no fractional suffix at seconds precision
        assert_eq!(e.state().projections.copy, e.state().projections.readable);

        let mut neg = engine_at(-1500);
        neg.handle(Event::PrecisionSelected(Precision::Seconds));
        neg.handle(Event::Now);
        assert_eq!(neg.state().projections.numeric, "-2");
    }

    #[test]
    fn test_numeric_edit_roundtrip_ms() {
        let mut e = engine();
        e.handle(Event::NumericEdited("1700000000000".into()));
        assert_eq!(e.state().instant, Some(Instant::from_millis(FROZEN_MS)));
        assert_eq!(e.state().projections.datetime_local, "2023-11-14T22:13:20");
    }

    #[test]
    fn test_nanosecond_aligned_no_advisory() {
        let mut e = engine();
        e.handle(Event::PrecisionSelected(Precision::Nanoseconds));
        e.handle(Event::NumericEdited("1700000000000000000".into()));

        let s = e.state();
        assert_eq!(s.instant, Some(Instant::from_millis(FROZEN_MS)));
        assert_eq!(s.advisory, None);
        assert!(s.projections.copy.ends_with(".000000000"));
        assert_eq!(s.projections.numeric, "1700000000000000000");
    }

    #[test]
    fn test_negative_nanosecond_floor() {
        let mut e = engine();
        e.handle(Event::PrecisionSelected(Precision::Nanoseconds));
        e.handle(Event::NumericEdited("-1".into()));

        let s = e.state();
        assert_eq!(s.instant, Some(Instant::from_parts(-1, 999_999)));
        assert_eq!(s.projections.numeric, "-1");
        assert_eq!(
            s.advisory,
            Some(Advisory::PrecisionLoss {
                remainder_nanos: 999_999
            })
        );
        assert!(s.projections.copy.ends_with(".999999999"));
        assert_eq!(s.error, None);
    }

    #[test]
    fn test_empty_input_clears_without_error() {
        let mut e = engine();
        e.handle(Event::Now);

        e.handle(Event::NumericEdited("   ".into()));
        assert_eq!(e.state().instant, None);
        assert_eq!(e.state().error, None);
        assert_eq!(e.state().projections.numeric, "   ");
        assert_eq!(e.state().projections.datetime_local, "");
        assert_eq!(e.state().projections.copy, "");

        e.handle(Event::Now);
        e.handle(Event::DatetimeEdited("".into()));
        assert_eq!(e.state().instant, None);
        assert_eq!(e.state().error, None);
        assert_eq!(e.state().projections.numeric, "");
    }

    #[test]
    fn test_invalid_numeric_discards_instant() {
        let mut e = engine();
        e.handle(Event::Now);
        e.handle(Event::NumericEdited("12abc".into()));

        let s = e.state();
        assert_eq!(s.instant, None);
        assert_eq!(s.error, Some(ConvertError::InvalidTimestamp));
        assert_eq!(s.projections.numeric, "12abc");
        assert_eq!(s.projections.datetime_local, "");
        assert_eq!(s.projections.readable, "");
    }

    #[test]
    fn test_numeric_out_of_range() {
        let mut e = engine();
        e.handle(Event::PrecisionSelected(Precision::Nanoseconds));
        e.handle(Event::NumericEdited("9".repeat(30)));
        assert_eq!(e.state().error, Some(ConvertError::TimestampOutOfRange));
        assert_eq!(e.state().instant, None);
    }

    #[test]
    fn test_numeric_beyond_calendar_range() {
        // Fits i64 milliseconds but the calendar collaborator rejects it.
        let mut e = engine();
        e.handle(Event::NumericEdited(i64::MAX.to_string()));
        assert_eq!(e.state().error, Some(ConvertError::InvalidTimestamp));
        assert_eq!(e.state().instant, None);
    }

    #[test]
    fn test_nonexistent_date_rejected() {
        let mut e = engine();
        e.handle(Event::Now);
        e.handle(Event::DatetimeEdited("2024-02-30T00:00:00".into()));

        let s = e.state();
        assert_eq!(s.instant, None);
        assert_eq!(s.error, Some(ConvertError::InvalidDateTime));
        assert_eq!(s.projections.datetime_local, "2024-02-30T00:00:00");
        assert_eq!(s.projections.numeric, "");
    }

    #[test]
    fn test_datetime_edit_sets_instant() {
        let mut e = engine();
        e.handle(Event::DatetimeEdited("2023-11-14T22:13:20".into()));
        assert_eq!(e.state().instant, Some(Instant::from_millis(FROZEN_MS)));
        assert_eq!(e.state().projections.numeric, "1700000000000");
    }

    #[test]
    fn test_precision_switch_without_instant() {
        let mut e = engine();
        e.handle(Event::PrecisionSelected(Precision::Seconds));
        assert_eq!(e.precision(), Precision::Seconds);
        assert_eq!(e.state().instant, None);
        assert_eq!(e.state().projections, Projections::default());
    }

    #[test]
    fn test_precision_switch_coarse_to_fine_pads_zeros() {
        let mut e = engine();
        e.handle(Event::NumericEdited("1500".into()));
        e.handle(Event::PrecisionSelected(Precision::Nanoseconds));
        assert_eq!(e.state().projections.numeric, "1500000000");
        e.handle(Event::PrecisionSelected(Precision::Seconds));
        assert_eq!(e.state().projections.numeric, "1");
    }

    #[test]
    fn test_leaving_nanoseconds_truncates_remainder() {
        let mut e = engine();
        e.handle(Event::PrecisionSelected(Precision::Nanoseconds));
        e.handle(Event::NumericEdited("5000001".into()));
        assert_eq!(e.state().instant, Some(Instant::from_parts(5, 1)));

        e.handle(Event::PrecisionSelected(Precision::Milliseconds));
        assert_eq!(e.state().instant, Some(Instant::from_millis(5)));
        assert_eq!(e.state().projections.numeric, "5");

        // switching back renders padded zeros, the remainder is gone
        e.handle(Event::PrecisionSelected(Precision::Nanoseconds));
        assert_eq!(e.state().projections.numeric, "5000000");
    }

    #[test]
    fn test_remainder_survives_while_nanoseconds_active() {
        let mut e = engine();
        e.handle(Event::PrecisionSelected(Precision::Nanoseconds));
        e.handle(Event::NumericEdited("1700000000000000042".into()));

        let s = e.state();
        // readable and datetime truncate, numeric and copy keep full precision
        assert_eq!(s.projections.datetime_local, "2023-11-14T22:13:20");
        assert_eq!(s.projections.numeric, "1700000000000000042");
        assert!(s.projections.copy.ends_with(".000000042"));
    }

    #[test]
    fn test_copy_flow() {
        let mut e = engine();
        e.handle(Event::Now);

        let effects = e.handle(Event::CopyRequested(CopyTarget::Numeric));
        assert_eq!(
            effects,
            vec![Effect::WriteClipboard("1700000000000".into())]
        );

        let effects = e.handle(Event::ClipboardFinished(Ok(())));
        assert_eq!(e.state().advisory, Some(Advisory::Copied));
        assert_eq!(
            effects,
            vec![Effect::ClearAdvisoryAfter(Duration::from_millis(1800))]
        );

        e.handle(Event::AdvisoryExpired);
        assert_eq!(e.state().advisory, None);
    }

    #[test]
    fn test_copy_formatted_target() {
        let mut e = engine();
        e.handle(Event::Now);
        let effects = e.handle(Event::CopyRequested(CopyTarget::Formatted));
        assert_eq!(
            effects,
            vec![Effect::WriteClipboard(
                "Tuesday, November 14, 2023 22:13:20.000".into()
            )]
        );
    }

    #[test]
    fn test_copy_empty_field_is_noop() {
        let mut e = engine();
        assert!(e.handle(Event::CopyRequested(CopyTarget::Numeric)).is_empty());
        assert!(e.handle(Event::CopyRequested(CopyTarget::Formatted)).is_empty());
    }

    #[test]
    fn test_clipboard_failure_is_advisory_only() {
        let mut e = engine();
        e.handle(Event::Now);
        let before = e.state().projections.clone();

        e.handle(Event::CopyRequested(CopyTarget::Numeric));
        let effects = e.handle(Event::ClipboardFinished(Err(
            ConvertError::ClipboardUnavailable,
        )));
        assert_eq!(
            e.state().advisory,
            Some(Advisory::CopyFailed(ConvertError::ClipboardUnavailable))
        );
        // failure advisories are transient too
        assert_eq!(
            effects,
            vec![Effect::ClearAdvisoryAfter(Duration::from_millis(1800))]
        );
        // conversion state untouched
        assert_eq!(e.state().error, None);
        assert_eq!(e.state().projections, before);
        assert_eq!(e.state().instant, Some(Instant::from_millis(FROZEN_MS)));

        e.handle(Event::AdvisoryExpired);
        assert_eq!(e.state().advisory, None);
    }

    #[test]
    fn test_stale_timer_keeps_precision_loss_notice() {
        let mut e = engine();
        e.handle(Event::PrecisionSelected(Precision::Nanoseconds));
        e.handle(Event::NumericEdited("7".into()));
        assert!(matches!(
            e.state().advisory,
            Some(Advisory::PrecisionLoss { .. })
        ));

        // a timer scheduled for an earlier copy fires late
        e.handle(Event::AdvisoryExpired);
        assert!(matches!(
            e.state().advisory,
            Some(Advisory::PrecisionLoss { .. })
        ));
    }

    #[test]
    fn test_error_recovery() {
        let mut e = engine();
        e.handle(Event::NumericEdited("garbage".into()));
        assert_eq!(e.state().error, Some(ConvertError::InvalidTimestamp));

        e.handle(Event::NumericEdited("0".into()));
        assert_eq!(e.state().error, None);
        assert_eq!(e.state().instant, Some(Instant::EPOCH));
        assert_eq!(e.state().projections.datetime_local, "1970-01-01T00:00:00");
    }

    #[test]
    fn test_nonzero_offset_calendar() {
        let offset = FixedOffset::east_opt(3600).expect("one hour");
        let mut e = Engine::with_collaborators(
            Box::new(FixedClock(FROZEN_MS)),
            Box::new(OffsetCalendar::new(offset)),
            Box::new(OffsetFormatter(offset)),
        );
        e.handle(Event::Now);
        assert_eq!(e.state().projections.datetime_local, "2023-11-14T23:13:20");

        // and back through the datetime field
        e.handle(Event::DatetimeEdited("2023-11-14T23:13:20".into()));
        assert_eq!(e.state().instant, Some(Instant::from_millis(FROZEN_MS)));
    }
}
