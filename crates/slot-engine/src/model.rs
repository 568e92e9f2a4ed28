use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;

/// A half-open span of time in UTC. Invariant: `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeInterval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        debug_assert!(start <= end, "interval start must not exceed end");
        Self { start, end }
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// True when the two intervals share any time, boundaries excluded.
    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// One boundary of a calendar event as reported on the wire: a concrete
/// instant (`dateTime`) or a date-only marker (`date`, all-day events).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventStamp {
    Timed(DateTime<Utc>),
    AllDay(NaiveDate),
}

impl EventStamp {
    pub fn as_timed(&self) -> Option<DateTime<Utc>> {
        match self {
            EventStamp::Timed(instant) => Some(*instant),
            EventStamp::AllDay(_) => None,
        }
    }
}

/// Raw busy entry from a calendar backend, before buffering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusyEvent {
    pub start: EventStamp,
    pub end: EventStamp,
}

impl BusyEvent {
    pub fn timed(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start: EventStamp::Timed(start),
            end: EventStamp::Timed(end),
        }
    }

    pub fn all_day(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: EventStamp::AllDay(start),
            end: EventStamp::AllDay(end),
        }
    }

    /// Date-only on both sides; such events never block availability.
    pub fn is_all_day(&self) -> bool {
        matches!(
            (self.start, self.end),
            (EventStamp::AllDay(_), EventStamp::AllDay(_))
        )
    }
}

/// A maximal gap inside the working window, clear of all buffered events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FreeSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// What a working day looks like once busy events are accounted for.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "slots", rename_all = "snake_case")]
pub enum Availability {
    /// The backend reported no events at all for the day.
    AllDay,
    /// Gaps between buffered events; empty means fully booked.
    Slots(Vec<FreeSlot>),
}

/// Per-day result emitted by the computer, in chronological order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayAvailability {
    pub day: NaiveDate,
    /// Human-readable day header, e.g. `Monday, May 06`.
    pub day_label: String,
    pub window: TimeInterval,
    pub availability: Availability,
}
