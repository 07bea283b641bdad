//! Canonical instant and rendering precision
//!
//! The engine stores one canonical value per widget: a signed count of
//! milliseconds since the Unix epoch, plus a sub-millisecond nanosecond
//! remainder. The remainder is carried only for nanosecond-precision input
//! that was not millisecond-aligned, and is always non-negative
//! (floor-division semantics), regardless of the sign of the input.

use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive};

use crate::{ConvertError, ConvertResult};

/// Nanoseconds per millisecond; the remainder is always below this.
pub const NANOS_PER_MILLI: u32 = 1_000_000;

/// Milliseconds per second, used for the seconds projection.
pub const MILLIS_PER_SEC: i64 = 1000;

/// Canonical point in time: epoch milliseconds plus a nanosecond remainder.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Instant {
    millis: i64,
    remainder: u32,
}

impl Instant {
    pub const EPOCH: Instant = Instant {
        millis: 0,
        remainder: 0,
    };

    /// Millisecond-aligned instant (remainder 0).
    #[inline]
    pub fn from_millis(millis: i64) -> Self {
        Instant {
            millis,
            remainder: 0,
        }
    }

    /// Instant with an explicit sub-millisecond remainder.
    #[inline]
    pub fn from_parts(millis: i64, remainder: u32) -> Self {
        debug_assert!(remainder < NANOS_PER_MILLI);
        Instant { millis, remainder }
    }

    /// Split a total nanosecond count into (milliseconds, remainder) using
    /// floor division, so the remainder stays in `[0, 1_000_000)` even for
    /// negative inputs: -1 ns is (-1 ms, 999_999 ns), never (0 ms, -1 ns).
    ///
    /// A millisecond quotient that does not fit `i64` is out of range.
    pub fn from_total_nanos(nanos: &BigInt) -> ConvertResult<Self> {
        let divisor = BigInt::from(NANOS_PER_MILLI);
        let mut quotient = nanos / &divisor;
        let mut remainder = nanos % &divisor;
        if remainder.is_negative() {
            quotient = quotient - 1;
            remainder = remainder + &divisor;
        }
        debug_assert!(!remainder.is_negative() && remainder < divisor);

        let millis = quotient
            .to_i64()
            .ok_or(ConvertError::TimestampOutOfRange)?;
        // Remainder is in [0, 1_000_000) by construction.
        let remainder = remainder.to_u32().unwrap_or(0);
        Ok(Instant { millis, remainder })
    }

    #[inline]
    pub fn millis(self) -> i64 {
        self.millis
    }

    #[inline]
    pub fn remainder(self) -> u32 {
        self.remainder
    }

    /// Total nanoseconds since the epoch. Exact: `i64::MAX` milliseconds
    /// times one million still fits comfortably in `i128`.
    #[inline]
    pub fn total_nanos(self) -> i128 {
        self.millis as i128 * NANOS_PER_MILLI as i128 + self.remainder as i128
    }

    /// Whole seconds since the epoch, floored toward negative infinity.
    #[inline]
    pub fn floor_secs(self) -> i64 {
        self.millis.div_euclid(MILLIS_PER_SEC)
    }

    /// Sub-second milliseconds, always in `[0, 1000)`.
    #[inline]
    pub fn subsec_millis(self) -> u32 {
        self.millis.rem_euclid(MILLIS_PER_SEC) as u32
    }

    /// Sub-second nanoseconds (`subsec_millis * 1_000_000 + remainder`),
    /// the 9-digit fraction used by the copy field. At most 999_999_999.
    #[inline]
    pub fn fraction_nanos(self) -> u32 {
        self.subsec_millis() * NANOS_PER_MILLI + self.remainder
    }

    /// Drop the carried remainder, e.g. when the active precision leaves
    /// nanoseconds.
    #[inline]
    pub fn truncate_remainder(self) -> Self {
        Instant {
            millis: self.millis,
            remainder: 0,
        }
    }

    #[inline]
    pub fn has_remainder(self) -> bool {
        self.remainder != 0
    }
}

impl std::fmt::Debug for Instant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.remainder == 0 {
            write!(f, "Instant({}ms)", self.millis)
        } else {
            write!(f, "Instant({}ms +{}ns)", self.millis, self.remainder)
        }
    }
}

/// Rendering/parsing unit for the numeric field.
///
/// Selecting a precision changes only the textual projection of the stored
/// instant, except that leaving `Nanoseconds` truncates the carried
/// remainder for subsequent renders.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Precision {
    Seconds,
    #[default]
    Milliseconds,
    Nanoseconds,
}

impl Precision {
    pub fn all() -> &'static [Precision] {
        &[
            Precision::Seconds,
            Precision::Milliseconds,
            Precision::Nanoseconds,
        ]
    }

    pub fn label(self) -> &'static str {
        match self {
            Precision::Seconds => "seconds",
            Precision::Milliseconds => "milliseconds",
            Precision::Nanoseconds => "nanoseconds",
        }
    }
}

impl std::fmt::Display for Precision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Parse arbitrary-length decimal text (optional sign) into a BigInt.
///
/// Nanosecond input may exceed any fixed-width integer, so the split into
/// milliseconds and remainder must happen in arbitrary precision; floats
/// are never involved.
pub fn parse_big_decimal(text: &str) -> ConvertResult<BigInt> {
    // BigInt's FromStr already rejects empty, fractional, and non-digit text.
    text.parse().map_err(|_| ConvertError::InvalidTimestamp)
}
