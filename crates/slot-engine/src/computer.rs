use anyhow::Result;
use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, Weekday};

use crate::config::SlotConfig;
use crate::error::SlotError;
use crate::model::{Availability, BusyEvent, DayAvailability, EventStamp, FreeSlot, TimeInterval};

/// Day-fetch capability a calendar backend must provide.
///
/// Implementations return the events overlapping `window`, ordered by
/// start time, with recurring events already expanded into instances.
/// Failures propagate to the caller unmodified; the computer neither
/// retries nor produces partial results.
#[async_trait]
pub trait EventSource {
    async fn busy_events(&self, window: &TimeInterval) -> Result<Vec<BusyEvent>>;
}

/// Monday through Friday, inclusive.
pub fn is_working_day(day: NaiveDate) -> bool {
    !matches!(day.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Derives free slots from busy intervals, one working day at a time.
#[derive(Debug, Clone)]
pub struct FreeSlotComputer {
    config: SlotConfig,
}

impl FreeSlotComputer {
    /// Validates the config up front; invalid bounds never reach a scan.
    pub fn new(config: SlotConfig) -> Result<Self, SlotError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Walk the inclusive date range, fetching each working day's events
    /// and scanning them for gaps. Days come back in chronological order.
    pub async fn compute(
        &self,
        source: &dyn EventSource,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<DayAvailability>, SlotError> {
        if end_date < start_date {
            return Err(SlotError::InvalidRange {
                start: start_date,
                end: end_date,
            });
        }

        let mut reports = Vec::new();
        let mut day = start_date;
        loop {
            if is_working_day(day) {
                let window = self.config.window_for(day)?;
                tracing::debug!("requesting events from {} to {}", window.start, window.end);
                let events = source.busy_events(&window).await?;
                reports.push(self.scan_day(day, window, &events)?);
            }
            if day == end_date {
                break;
            }
            match day.succ_opt() {
                Some(next) => day = next,
                None => break,
            }
        }

        Ok(reports)
    }

    /// Slot derivation for a single day against pre-fetched events.
    pub fn day_availability(
        &self,
        day: NaiveDate,
        events: &[BusyEvent],
    ) -> Result<DayAvailability, SlotError> {
        let window = self.config.window_for(day)?;
        self.scan_day(day, window, events)
    }

    fn scan_day(
        &self,
        day: NaiveDate,
        window: TimeInterval,
        events: &[BusyEvent],
    ) -> Result<DayAvailability, SlotError> {
        let day_label = day.format("%A, %B %d").to_string();

        // An empty fetch means the whole window is open; no buffer
        // arithmetic applies.
        if events.is_empty() {
            return Ok(DayAvailability {
                day,
                day_label,
                window,
                availability: Availability::AllDay,
            });
        }

        let buffer = self.config.buffer();
        let mut slots = Vec::new();
        let mut cursor = window.start;
        let mut previous_start = None;

        for event in events {
            let (start, end) = match (event.start, event.end) {
                // All-day on both sides never blocks availability.
                (EventStamp::AllDay(_), EventStamp::AllDay(_)) => continue,
                (EventStamp::Timed(start), EventStamp::Timed(end)) => (start, end),
                (start, end) => return Err(SlotError::MalformedEvent { start, end }),
            };

            // The backend contract is startTime order; enforce it rather
            // than scan garbage.
            if let Some(previous) = previous_start {
                if start < previous {
                    return Err(SlotError::UnsortedEvents {
                        previous,
                        current: start,
                    });
                }
            }
            previous_start = Some(start);

            let adjusted_start = start - buffer;
            let adjusted_end = end + buffer;

            if cursor < adjusted_start {
                slots.push(FreeSlot {
                    start: cursor,
                    end: adjusted_start,
                });
            }
            // The cursor only moves forward, which absorbs overlapping
            // and nested events.
            cursor = cursor.max(adjusted_end);
        }

        if cursor < window.end {
            slots.push(FreeSlot {
                start: cursor,
                end: window.end,
            });
        }

        Ok(DayAvailability {
            day,
            day_label,
            window,
            availability: Availability::Slots(slots),
        })
    }
}
