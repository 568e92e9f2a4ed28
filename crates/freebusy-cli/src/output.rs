use anyhow::Result;
use chrono_tz::Tz;
use clap::ValueEnum;
use slot_engine::{Availability, DayAvailability};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputType {
    /// Human-readable availability lines
    Default,
    /// Pretty-printed JSON
    Json,
}

pub fn render(reports: &[DayAvailability], output: OutputType, timezone: Tz) -> Result<String> {
    match output {
        OutputType::Default => Ok(render_text(reports, timezone)),
        OutputType::Json => Ok(serde_json::to_string_pretty(reports)?),
    }
}

fn render_text(reports: &[DayAvailability], timezone: Tz) -> String {
    let mut out = String::new();
    for report in reports {
        out.push_str(&format!("Availability for {}:\n", report.day_label));
        match &report.availability {
            Availability::AllDay => out.push_str(" - All day available\n"),
            // Distinct from the all-day sentinel: events filled the window.
            Availability::Slots(slots) if slots.is_empty() => {
                out.push_str(" - No availability\n")
            }
            Availability::Slots(slots) => {
                for slot in slots {
                    out.push_str(&format!(
                        " - Available: {} to {}\n",
                        slot.start.with_timezone(&timezone).format("%H:%M"),
                        slot.end.with_timezone(&timezone).format("%H:%M"),
                    ));
                }
            }
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use slot_engine::{FreeSlot, TimeInterval};

    fn monday_report(availability: Availability) -> DayAvailability {
        DayAvailability {
            day: NaiveDate::from_ymd_opt(2024, 5, 6).unwrap(),
            day_label: "Monday, May 06".to_string(),
            window: TimeInterval::new(
                Utc.with_ymd_and_hms(2024, 5, 6, 9, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2024, 5, 6, 18, 0, 0).unwrap(),
            ),
            availability,
        }
    }

    #[test]
    fn text_lists_each_slot() {
        let report = monday_report(Availability::Slots(vec![
            FreeSlot {
                start: Utc.with_ymd_and_hms(2024, 5, 6, 9, 0, 0).unwrap(),
                end: Utc.with_ymd_and_hms(2024, 5, 6, 10, 0, 0).unwrap(),
            },
            FreeSlot {
                start: Utc.with_ymd_and_hms(2024, 5, 6, 12, 0, 0).unwrap(),
                end: Utc.with_ymd_and_hms(2024, 5, 6, 13, 30, 0).unwrap(),
            },
        ]));
        let text = render_text(&[report], Tz::UTC);
        assert_eq!(
            text,
            "Availability for Monday, May 06:\n - Available: 09:00 to 10:00\n - Available: 12:00 to 13:30\n\n"
        );
    }

    #[test]
    fn text_marks_the_all_day_sentinel() {
        let text = render_text(&[monday_report(Availability::AllDay)], Tz::UTC);
        assert!(text.contains(" - All day available\n"));
    }

    #[test]
    fn text_marks_a_fully_booked_day() {
        let text = render_text(&[monday_report(Availability::Slots(vec![]))], Tz::UTC);
        assert!(text.contains(" - No availability\n"));
    }

    #[test]
    fn text_renders_times_in_the_requested_timezone() {
        let report = monday_report(Availability::Slots(vec![FreeSlot {
            start: Utc.with_ymd_and_hms(2024, 5, 6, 13, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2024, 5, 6, 14, 0, 0).unwrap(),
        }]));
        // New York is UTC-4 in May.
        let text = render_text(&[report], chrono_tz::America::New_York);
        assert!(text.contains(" - Available: 09:00 to 10:00\n"));
    }

    #[test]
    fn json_carries_the_sentinel_kind_and_slots() {
        let reports = vec![
            monday_report(Availability::AllDay),
            monday_report(Availability::Slots(vec![FreeSlot {
                start: Utc.with_ymd_and_hms(2024, 5, 6, 9, 0, 0).unwrap(),
                end: Utc.with_ymd_and_hms(2024, 5, 6, 10, 0, 0).unwrap(),
            }])),
        ];
        let json = render(&reports, OutputType::Json, Tz::UTC).unwrap();
        assert!(json.contains("\"kind\": \"all_day\""));
        assert!(json.contains("\"kind\": \"slots\""));
        assert!(json.contains("\"day_label\": \"Monday, May 06\""));
        assert!(json.contains("2024-05-06T09:00:00Z"));
    }
}
