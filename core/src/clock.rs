//! Time sources for the alarm table
//!
//! The alarm engine never reads the host clock directly. Everything goes
//! through a [`Clock`], which supplies:
//! - the current epoch time in whole seconds
//! - a free-running millisecond counter for the busy-polling waits
//! - the calendar decomposition used by daily and weekly alarms
//!
//! Two implementations are provided:
//! - [`SystemClock`]: host wall time (UTC)
//! - [`SimulatedClock`]: virtual time that only moves when told to, or by a
//!   fixed quantum each time a blocking wait polls it

use std::cell::Cell;
use std::time::Instant;

use chrono::{DateTime, Utc, Weekday};

/// Seconds since the clock's epoch
pub type Timestamp = i64;

pub const SECS_PER_MIN: Timestamp = 60;
pub const SECS_PER_HOUR: Timestamp = 3_600;
pub const SECS_PER_DAY: Timestamp = 86_400;
pub const DAYS_PER_WEEK: Timestamp = 7;
pub const SECS_PER_WEEK: Timestamp = SECS_PER_DAY * DAYS_PER_WEEK;

/// Real-time clock collaborator.
///
/// Only `now` and `millis` are required. The calendar methods default to
/// UTC arithmetic on the epoch value with days numbered 1 (Sunday) through
/// 7 (Saturday). A clock with a different convention overrides
/// `weekday_number` and `day_number` together; `start_of_week` follows
/// from `weekday_number`, and weekly alarms take the convention as given.
pub trait Clock {
    /// Current epoch time in seconds
    fn now(&self) -> Timestamp;

    /// Free-running millisecond counter. Only differences are meaningful.
    fn millis(&self) -> u64;

    /// Called once per iteration of a busy-polling wait.
    fn relax(&self) {
        std::hint::spin_loop();
    }

    fn second(&self, t: Timestamp) -> u8 {
        t.rem_euclid(SECS_PER_MIN) as u8
    }

    fn minute(&self, t: Timestamp) -> u8 {
        (t.rem_euclid(SECS_PER_HOUR) / SECS_PER_MIN) as u8
    }

    fn hour(&self, t: Timestamp) -> u8 {
        (t.rem_euclid(SECS_PER_DAY) / SECS_PER_HOUR) as u8
    }

    /// Day of week of `t` (1 = Sunday). The epoch fell on a Thursday.
    fn weekday_number(&self, t: Timestamp) -> u8 {
        ((t.div_euclid(SECS_PER_DAY) + 4).rem_euclid(DAYS_PER_WEEK) + 1) as u8
    }

    /// Number this clock gives to `day`, matching `weekday_number`.
    fn day_number(&self, day: Weekday) -> u8 {
        day.number_from_sunday() as u8
    }

    /// Midnight at or before `t`
    fn start_of_day(&self, t: Timestamp) -> Timestamp {
        t - t.rem_euclid(SECS_PER_DAY)
    }

    /// Midnight starting day 1 of the week containing `t`
    fn start_of_week(&self, t: Timestamp) -> Timestamp {
        let days_in = Timestamp::from(self.weekday_number(t)) - 1;
        self.start_of_day(t) - days_in * SECS_PER_DAY
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// System Clock
// ═══════════════════════════════════════════════════════════════════════════

/// Host wall time in UTC
#[derive(Debug, Clone)]
pub struct SystemClock {
    started: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now().timestamp()
    }

    fn millis(&self) -> u64 {
        u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Simulated Clock
// ═══════════════════════════════════════════════════════════════════════════

/// Virtual clock for tests and replay.
///
/// Time is kept as milliseconds since `origin`. It moves forward by
/// `quantum_ms` every time a blocking wait polls it, so a `delay` on a
/// simulated clock returns immediately in real time while still visiting
/// every intermediate instant.
#[derive(Debug)]
pub struct SimulatedClock {
    /// Epoch second at millisecond zero
    origin: Timestamp,

    /// Elapsed virtual time
    elapsed_ms: Cell<u64>,

    /// Virtual time per poll
    quantum_ms: u64,
}

impl SimulatedClock {
    /// Create a clock reading `start`, advancing 1 ms per poll
    pub fn new(start: Timestamp) -> Self {
        Self::with_quantum(start, 1)
    }

    /// Create a clock reading `start`, advancing `quantum_ms` per poll
    pub fn with_quantum(start: Timestamp, quantum_ms: u64) -> Self {
        Self {
            origin: start,
            elapsed_ms: Cell::new(0),
            quantum_ms: quantum_ms.max(1),
        }
    }

    /// Create a clock reading the given calendar time
    pub fn starting_at(start: DateTime<Utc>) -> Self {
        Self::new(start.timestamp())
    }

    /// Move time forward by `ms` milliseconds
    pub fn advance_millis(&self, ms: u64) {
        self.elapsed_ms.set(self.elapsed_ms.get().saturating_add(ms));
    }

    /// Move time forward by `secs` seconds
    pub fn advance_secs(&self, secs: u64) {
        self.advance_millis(secs.saturating_mul(1000));
    }

    /// Jump to an absolute epoch second. Never moves backwards.
    pub fn set(&self, t: Timestamp) {
        let target = (t.saturating_sub(self.origin).max(0) as u64).saturating_mul(1000);
        if target > self.elapsed_ms.get() {
            self.elapsed_ms.set(target);
        }
    }

    pub fn quantum_ms(&self) -> u64 {
        self.quantum_ms
    }
}

impl Clock for SimulatedClock {
    fn now(&self) -> Timestamp {
        self.origin + (self.elapsed_ms.get() / 1000) as Timestamp
    }

    fn millis(&self) -> u64 {
        self.elapsed_ms.get()
    }

    fn relax(&self) {
        self.advance_millis(self.quantum_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn epoch(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> Timestamp {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(hour, min, sec)
            .unwrap()
            .and_utc()
            .timestamp()
    }

    #[test]
    fn test_calendar_fields() {
        let clock = SimulatedClock::new(0);
        let t = epoch(2025, 1, 1, 13, 45, 30);

        assert_eq!(clock.hour(t), 13);
        assert_eq!(clock.minute(t), 45);
        assert_eq!(clock.second(t), 30);
        assert_eq!(clock.start_of_day(t), epoch(2025, 1, 1, 0, 0, 0));
    }

    #[test]
    fn test_weekday_numbering_starts_on_sunday() {
        let clock = SimulatedClock::new(0);

        // Thursday
        assert_eq!(clock.weekday_number(0), 5);
        // 2025-01-01 was a Wednesday, 2025-01-05 a Sunday
        assert_eq!(clock.weekday_number(epoch(2025, 1, 1, 12, 0, 0)), 4);
        assert_eq!(clock.weekday_number(epoch(2025, 1, 5, 0, 0, 0)), 1);
        assert_eq!(clock.weekday_number(epoch(2025, 1, 4, 23, 59, 59)), 7);

        assert_eq!(clock.day_number(Weekday::Sun), 1);
        assert_eq!(clock.day_number(Weekday::Wed), 4);
        assert_eq!(clock.day_number(Weekday::Sat), 7);
    }

    #[test]
    fn test_start_of_week() {
        let clock = SimulatedClock::new(0);

        let wednesday = epoch(2025, 1, 1, 9, 30, 0);
        assert_eq!(clock.start_of_week(wednesday), epoch(2024, 12, 29, 0, 0, 0));

        let sunday = epoch(2025, 1, 5, 0, 0, 0);
        assert_eq!(clock.start_of_week(sunday), sunday);
    }

    #[test]
    fn test_simulated_clock_advances_per_poll() {
        let clock = SimulatedClock::with_quantum(1_000, 250);
        assert_eq!(clock.now(), 1_000);

        clock.relax();
        clock.relax();
        clock.relax();
        assert_eq!(clock.millis(), 750);
        assert_eq!(clock.now(), 1_000);

        clock.relax();
        assert_eq!(clock.now(), 1_001);
    }

    #[test]
    fn test_simulated_clock_set_never_goes_backwards() {
        let clock = SimulatedClock::new(100);

        clock.set(160);
        assert_eq!(clock.now(), 160);

        clock.set(120);
        assert_eq!(clock.now(), 160);

        clock.advance_secs(5);
        assert_eq!(clock.now(), 165);
    }

    #[test]
    fn test_simulated_clock_set_far_future_saturates() {
        let clock = SimulatedClock::new(0);

        clock.set(Timestamp::MAX);
        assert_eq!(clock.millis(), u64::MAX);

        clock.advance_secs(1);
        assert_eq!(clock.millis(), u64::MAX);
    }

    #[test]
    fn test_system_clock_counter_is_monotonic() {
        let clock = SystemClock::new();
        let first = clock.millis();
        assert!(clock.millis() >= first);
    }
}
