//! Free-slot derivation for calendar availability.
//!
//! Given a date range and a per-day feed of busy events, compute the gaps
//! left inside each working day's window once every event is padded by a
//! buffer margin. Calendar backends plug in through [`EventSource`]; no
//! vendor types appear in this crate.

mod computer;
mod config;
mod error;
mod model;

pub use computer::{is_working_day, EventSource, FreeSlotComputer};
pub use config::SlotConfig;
pub use error::SlotError;
pub use model::{Availability, BusyEvent, DayAvailability, EventStamp, FreeSlot, TimeInterval};
