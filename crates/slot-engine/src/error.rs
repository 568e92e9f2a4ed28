use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use thiserror::Error;

use crate::model::EventStamp;

/// Unified error type for slot computation.
#[derive(Debug, Error)]
pub enum SlotError {
    /// End date precedes start date; surfaced before any fetch.
    #[error("end date {end} precedes start date {start}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    /// Event mixes a timed boundary with an all-day one, or lacks a
    /// boundary entirely.
    #[error("malformed event: start {start:?} and end {end:?} do not agree")]
    MalformedEvent { start: EventStamp, end: EventStamp },

    /// The backend contract requires events ordered by start time.
    #[error("busy events out of order: {previous} followed by {current}")]
    UnsortedEvents {
        previous: DateTime<Utc>,
        current: DateTime<Utc>,
    },

    /// Working-hour bounds do not describe a window.
    #[error("invalid working hours: start {hour_start} must come before end {hour_end}")]
    InvalidHours { hour_start: u32, hour_end: u32 },

    /// Buffers only widen events; a negative margin is a config mistake.
    #[error("buffer of {0} minutes is negative")]
    NegativeBuffer(i64),

    /// A window bound falls on a time the timezone skips or repeats.
    #[error("window bound {local} is ambiguous or invalid in timezone {timezone}")]
    UnrepresentableWindow { local: NaiveDateTime, timezone: Tz },

    /// Calendar backend failure; propagated unmodified, no retry.
    #[error("{0}")]
    Source(#[from] anyhow::Error),
}
