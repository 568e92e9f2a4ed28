use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::SlotError;
use crate::model::TimeInterval;

/// Tunables for slot computation, passed to the computer at construction.
///
/// Replaces what the tool historically kept as module-level constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotConfig {
    /// Margin subtracted from each event start and added to each event
    /// end before it blocks availability. Default: 30.
    pub buffer_minutes: i64,

    /// First hour of the working window. Default: 9.
    pub hour_start: u32,

    /// Hour the working window closes. `24` selects the full-day variant
    /// and maps to 23:59:59. Default: 18.
    pub hour_end: u32,

    /// Timezone the window bounds are computed in before normalizing to
    /// UTC. Default: UTC.
    pub timezone: Tz,
}

impl Default for SlotConfig {
    fn default() -> Self {
        Self {
            buffer_minutes: 30,
            hour_start: 9,
            hour_end: 18,
            timezone: Tz::UTC,
        }
    }
}

impl SlotConfig {
    pub fn validate(&self) -> Result<(), SlotError> {
        if self.buffer_minutes < 0 {
            return Err(SlotError::NegativeBuffer(self.buffer_minutes));
        }
        if self.hour_start > 23 || self.hour_end > 24 || self.hour_start >= self.hour_end {
            return Err(SlotError::InvalidHours {
                hour_start: self.hour_start,
                hour_end: self.hour_end,
            });
        }
        Ok(())
    }

    pub fn buffer(&self) -> Duration {
        Duration::minutes(self.buffer_minutes)
    }

    /// Working window for one calendar day, localized then normalized.
    pub fn window_for(&self, day: NaiveDate) -> Result<TimeInterval, SlotError> {
        let bad_hours = || SlotError::InvalidHours {
            hour_start: self.hour_start,
            hour_end: self.hour_end,
        };
        let open = NaiveTime::from_hms_opt(self.hour_start, 0, 0).ok_or_else(bad_hours)?;
        let close = if self.hour_end == 24 {
            NaiveTime::from_hms_opt(23, 59, 59)
        } else {
            NaiveTime::from_hms_opt(self.hour_end, 0, 0)
        }
        .ok_or_else(bad_hours)?;

        let start = self.localize(day, open)?;
        let end = self.localize(day, close)?;
        Ok(TimeInterval::new(start, end))
    }

    fn localize(&self, day: NaiveDate, time: NaiveTime) -> Result<DateTime<Utc>, SlotError> {
        let local = day.and_time(time);
        self.timezone
            .from_local_datetime(&local)
            .single()
            .map(|bound| bound.with_timezone(&Utc))
            .ok_or(SlotError::UnrepresentableWindow {
                local,
                timezone: self.timezone,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn defaults_match_documented_values() {
        let config = SlotConfig::default();
        assert_eq!(config.buffer_minutes, 30);
        assert_eq!(config.hour_start, 9);
        assert_eq!(config.hour_end, 18);
        assert_eq!(config.timezone, Tz::UTC);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn inverted_hours_are_rejected() {
        let config = SlotConfig {
            hour_start: 18,
            hour_end: 9,
            ..SlotConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SlotError::InvalidHours {
                hour_start: 18,
                hour_end: 9
            })
        ));
    }

    #[test]
    fn negative_buffer_is_rejected() {
        let config = SlotConfig {
            buffer_minutes: -5,
            ..SlotConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SlotError::NegativeBuffer(-5))
        ));
    }

    #[test]
    fn window_uses_utc_by_default() {
        let day = NaiveDate::from_ymd_opt(2024, 5, 6).unwrap();
        let window = SlotConfig::default().window_for(day).unwrap();
        assert_eq!(window.start, Utc.with_ymd_and_hms(2024, 5, 6, 9, 0, 0).unwrap());
        assert_eq!(window.end, Utc.with_ymd_and_hms(2024, 5, 6, 18, 0, 0).unwrap());
    }

    #[test]
    fn window_localizes_before_normalizing() {
        // New York is UTC-4 in May.
        let config = SlotConfig {
            timezone: chrono_tz::America::New_York,
            ..SlotConfig::default()
        };
        let day = NaiveDate::from_ymd_opt(2024, 5, 6).unwrap();
        let window = config.window_for(day).unwrap();
        assert_eq!(window.start, Utc.with_ymd_and_hms(2024, 5, 6, 13, 0, 0).unwrap());
        assert_eq!(window.end, Utc.with_ymd_and_hms(2024, 5, 6, 22, 0, 0).unwrap());
    }

    #[test]
    fn hour_end_24_covers_the_full_day() {
        let config = SlotConfig {
            hour_start: 0,
            hour_end: 24,
            ..SlotConfig::default()
        };
        let day = NaiveDate::from_ymd_opt(2024, 5, 6).unwrap();
        let window = config.window_for(day).unwrap();
        assert_eq!(window.start, Utc.with_ymd_and_hms(2024, 5, 6, 0, 0, 0).unwrap());
        assert_eq!(window.end, Utc.with_ymd_and_hms(2024, 5, 6, 23, 59, 59).unwrap());
    }
}
