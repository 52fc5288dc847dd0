//! Venue wall-clock handling.
//!
//! Clients send naive local times (`YYYY-MM-DDTHH:MM`, the shape of an HTML
//! `datetime-local` input). [`VenueClock`] resolves them in the configured
//! venue timezone and renders stored instants back with an explicit offset.
//! Neither UTC nor the server's local zone is ever assumed.

use chrono::{DateTime, LocalResult, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::BookingError;

/// Accepted input pattern, in `chrono` syntax.
pub const LOCAL_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

const LOCAL_TIME_LEN: usize = 16;

/// Process-wide venue timezone, passed explicitly to whoever needs it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VenueClock {
    tz: Tz,
}

impl VenueClock {
    /// Creates a clock for the given timezone.
    #[must_use]
    pub const fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// The venue timezone.
    #[must_use]
    pub const fn timezone(&self) -> Tz {
        self.tz
    }

    /// Resolves a naive `YYYY-MM-DDTHH:MM` string in the venue timezone.
    ///
    /// A local time repeated by a DST fall-back resolves to its earlier
    /// occurrence.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::InvalidTimeFormat`] if `raw` does not match
    /// the pattern exactly, names an impossible date, or falls in a DST gap.
    pub fn normalize(&self, raw: &str) -> Result<DateTime<Utc>, BookingError> {
        let naive = parse_local(raw)?;
        match self.tz.from_local_datetime(&naive) {
            LocalResult::Single(local) => Ok(local.with_timezone(&Utc)),
            LocalResult::Ambiguous(earliest, _) => Ok(earliest.with_timezone(&Utc)),
            LocalResult::None => Err(BookingError::InvalidTimeFormat(format!(
                "{raw} does not exist in {}",
                self.tz.name()
            ))),
        }
    }

    /// Renders an instant as RFC 3339 with the venue offset in effect at
    /// that instant, e.g. `2025-11-26T20:00:00-03:00`.
    #[must_use]
    pub fn render(&self, instant: DateTime<Utc>) -> String {
        instant
            .with_timezone(&self.tz)
            .to_rfc3339_opts(SecondsFormat::Secs, false)
    }

    /// Renders an instant back into the naive input pattern.
    #[must_use]
    pub fn wall_clock(&self, instant: DateTime<Utc>) -> String {
        instant
            .with_timezone(&self.tz)
            .format(LOCAL_TIME_FORMAT)
            .to_string()
    }
}

/// Parses the strict input pattern. `chrono` alone tolerates unpadded
/// numbers, so the shape is checked byte by byte first.
fn parse_local(raw: &str) -> Result<NaiveDateTime, BookingError> {
    let well_formed = raw.len() == LOCAL_TIME_LEN
        && raw.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            10 => b == b'T',
            13 => b == b':',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return Err(BookingError::InvalidTimeFormat(format!(
            "expected YYYY-MM-DDTHH:MM, got {raw:?}"
        )));
    }
    NaiveDateTime::parse_from_str(raw, LOCAL_TIME_FORMAT)
        .map_err(|e| BookingError::InvalidTimeFormat(format!("{raw}: {e}")))
}
