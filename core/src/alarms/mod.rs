//! Software alarms and timers
//!
//! This module provides:
//! - **Table**: a fixed number of alarm slots with allocate/free semantics
//! - **Trigger calculation**: next due time per alarm class
//! - **Scheduler**: servicing passes driven from the main loop
//! - **Blocking waits**: delays that keep servicing while they spin
//!
//! # Alarm Classes
//!
//! - Explicit: once, at an absolute time
//! - Daily: at a time of day, once or every day
//! - Weekly: at a day of week and time, once or every week
//! - Interval: after a number of seconds, once or repeatedly

mod create;
mod error;
mod scheduler;
mod slot;
mod table;
mod trigger;
mod wait;

#[cfg(test)]
mod wait_tests;

pub use create::hms;
pub use error::AlarmError;
pub use slot::{AlarmId, AlarmInfo, Callback};
pub use table::TimeAlarms;
pub use trigger::TriggerCalculator;
