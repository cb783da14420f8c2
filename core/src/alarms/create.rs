//! Creation entry points
//!
//! Every alarm and timer variety, each taking a [`Callback`] so the plain
//! and byte-parameter handler shapes share one code path. The `_hms` forms
//! compose hours, minutes and seconds into the seconds-based forms.
//!
//! | call                  | class    | fires                          |
//! |-----------------------|----------|--------------------------------|
//! | `trigger_once`        | explicit | once, at an epoch time         |
//! | `alarm_once`          | daily    | once, at the next time of day  |
//! | `alarm_once_weekly`   | weekly   | once, at the next day + time   |
//! | `alarm_repeat`        | daily    | every day at a time of day     |
//! | `alarm_repeat_weekly` | weekly   | every week at a day + time     |
//! | `timer_once`          | interval | once, after a number of secs   |
//! | `timer_repeat`        | interval | every number of secs           |

use chrono::Weekday;

use crate::clock::{Clock, SECS_PER_DAY, SECS_PER_HOUR, SECS_PER_MIN, Timestamp};
use tocsin_types::AlarmKind;

use super::{AlarmError, AlarmId, Callback, TimeAlarms};

/// Seconds for a time of day or a duration given as hours, minutes, seconds
pub fn hms(hours: i32, minutes: i32, seconds: i32) -> Timestamp {
    Timestamp::from(hours) * SECS_PER_HOUR
        + Timestamp::from(minutes) * SECS_PER_MIN
        + Timestamp::from(seconds)
}

impl<C: Clock> TimeAlarms<C> {
    // ─── Explicit ───────────────────────────────────────────────────────────

    /// Fire once at the absolute epoch time `at`
    pub fn trigger_once(&mut self, at: Timestamp, callback: Callback<C>) -> Result<AlarmId, AlarmError> {
        self.allocate(AlarmKind::Explicit, at, callback, true)
    }

    // ─── Daily ──────────────────────────────────────────────────────────────

    /// Fire once, the next time the day reaches `time_of_day` seconds
    pub fn alarm_once(&mut self, time_of_day: Timestamp, callback: Callback<C>) -> Result<AlarmId, AlarmError> {
        self.allocate(AlarmKind::Daily, time_of_day, callback, true)
    }

    pub fn alarm_once_hms(
        &mut self,
        hours: i32,
        minutes: i32,
        seconds: i32,
        callback: Callback<C>,
    ) -> Result<AlarmId, AlarmError> {
        self.alarm_once(hms(hours, minutes, seconds), callback)
    }

    /// Fire every day at `time_of_day` seconds after midnight
    pub fn alarm_repeat(&mut self, time_of_day: Timestamp, callback: Callback<C>) -> Result<AlarmId, AlarmError> {
        self.allocate(AlarmKind::Daily, time_of_day, callback, false)
    }

    pub fn alarm_repeat_hms(
        &mut self,
        hours: i32,
        minutes: i32,
        seconds: i32,
        callback: Callback<C>,
    ) -> Result<AlarmId, AlarmError> {
        self.alarm_repeat(hms(hours, minutes, seconds), callback)
    }

    // ─── Weekly ─────────────────────────────────────────────────────────────

    /// Fire once, the next time it is `day` at the given time
    pub fn alarm_once_weekly(
        &mut self,
        day: Weekday,
        hours: i32,
        minutes: i32,
        seconds: i32,
        callback: Callback<C>,
    ) -> Result<AlarmId, AlarmError> {
        let value = self.week_offset(day, hms(hours, minutes, seconds))?;
        self.allocate(AlarmKind::Weekly, value, callback, true)
    }

    /// Fire every week on `day` at the given time
    pub fn alarm_repeat_weekly(
        &mut self,
        day: Weekday,
        hours: i32,
        minutes: i32,
        seconds: i32,
        callback: Callback<C>,
    ) -> Result<AlarmId, AlarmError> {
        let value = self.week_offset(day, hms(hours, minutes, seconds))?;
        self.allocate(AlarmKind::Weekly, value, callback, false)
    }

    /// Seconds from the start of the clock's week to `day` at `time_of_day`
    fn week_offset(&self, day: Weekday, time_of_day: Timestamp) -> Result<Timestamp, AlarmError> {
        let day_number = Timestamp::from(self.clock.day_number(day));
        let value = (day_number - 1) * SECS_PER_DAY + time_of_day;
        if !(0..=SECS_PER_DAY).contains(&time_of_day) {
            return Err(AlarmError::InvalidRange {
                kind: AlarmKind::Weekly,
                value,
            });
        }
        Ok(value)
    }

    // ─── Intervals ──────────────────────────────────────────────────────────

    /// Fire once, `seconds` from now
    pub fn timer_once(&mut self, seconds: Timestamp, callback: Callback<C>) -> Result<AlarmId, AlarmError> {
        self.allocate(AlarmKind::Interval, seconds, callback, true)
    }

    pub fn timer_once_hms(
        &mut self,
        hours: i32,
        minutes: i32,
        seconds: i32,
        callback: Callback<C>,
    ) -> Result<AlarmId, AlarmError> {
        self.timer_once(hms(hours, minutes, seconds), callback)
    }

    /// Fire every `seconds`, starting `seconds` from now
    pub fn timer_repeat(&mut self, seconds: Timestamp, callback: Callback<C>) -> Result<AlarmId, AlarmError> {
        self.allocate(AlarmKind::Interval, seconds, callback, false)
    }

    pub fn timer_repeat_hms(
        &mut self,
        hours: i32,
        minutes: i32,
        seconds: i32,
        callback: Callback<C>,
    ) -> Result<AlarmId, AlarmError> {
        self.timer_repeat(hms(hours, minutes, seconds), callback)
    }
}
