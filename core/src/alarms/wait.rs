//! Blocking waits that keep alarms running
//!
//! None of these suspend the caller. They spin on the clock, running a
//! servicing pass on every iteration, so any alarm that comes due while
//! waiting fires before the wait returns.

use std::time::Duration;

use chrono::Weekday;
use tracing::warn;

use crate::clock::Clock;
use tocsin_types::TimeUnit;

use super::TimeAlarms;

impl<C: Clock> TimeAlarms<C> {
    /// Busy-wait for `duration`, servicing alarms throughout.
    ///
    /// A final pass runs once the full duration has elapsed, so every
    /// trigger in `[now, now + duration]` has fired on return.
    pub fn delay(&mut self, duration: Duration) {
        let window = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        let start = self.clock.millis();
        loop {
            let elapsed = self.clock.millis().saturating_sub(start);
            self.service();
            if elapsed >= window {
                break;
            }
            self.clock.relax();
        }
    }

    /// Current value of a calendar field.
    ///
    /// `Day` is the clock's day-of-week number. `Millisecond` is taken from
    /// the clock's millisecond counter.
    pub fn digits_now(&self, unit: TimeUnit) -> u16 {
        let now = self.clock.now();
        match unit {
            TimeUnit::Millisecond => (self.clock.millis() % 1000) as u16,
            TimeUnit::Second => u16::from(self.clock.second(now)),
            TimeUnit::Minute => u16::from(self.clock.minute(now)),
            TimeUnit::Hour => u16::from(self.clock.hour(now)),
            TimeUnit::Day => u16::from(self.clock.weekday_number(now)),
        }
    }

    /// Busy-wait until the field `unit` reads `target`, then run one more
    /// pass so alarms due at that instant have fired.
    ///
    /// Targets the field can never hold return immediately.
    pub fn wait_for_digits(&mut self, target: u16, unit: TimeUnit) {
        if !self.digit_reachable(target, unit) {
            warn!(target, ?unit, "wait target out of range");
            return;
        }
        while self.digits_now(unit) != target {
            self.service();
            self.clock.relax();
        }
        self.service();
    }

    /// Whether the field `unit` can ever read `target` on this clock.
    ///
    /// Days are checked against the clock's own weekday numbering.
    fn digit_reachable(&self, target: u16, unit: TimeUnit) -> bool {
        match unit {
            TimeUnit::Day => std::iter::successors(Some(Weekday::Sun), |d| Some(d.succ()))
                .take(7)
                .any(|d| u16::from(self.clock.day_number(d)) == target),
            _ => target <= unit.max_digit(),
        }
    }

    /// Busy-wait until the field `unit` next changes value, e.g. `Minute`
    /// returns at the top of the next minute.
    pub fn wait_for_rollover(&mut self, unit: TimeUnit) {
        let start = self.digits_now(unit);
        while self.digits_now(unit) == start {
            self.service();
            self.clock.relax();
        }
        self.service();
    }

    pub fn wait_until_this_second(&mut self, second: u16) {
        self.wait_for_digits(second, TimeUnit::Second);
    }

    pub fn wait_until_this_minute(&mut self, minute: u16) {
        self.wait_for_digits(minute, TimeUnit::Minute);
    }

    pub fn wait_until_this_hour(&mut self, hour: u16) {
        self.wait_for_digits(hour, TimeUnit::Hour);
    }

    pub fn wait_until_this_day(&mut self, day: u16) {
        self.wait_for_digits(day, TimeUnit::Day);
    }

    pub fn wait_minute_rollover(&mut self) {
        self.wait_for_rollover(TimeUnit::Minute);
    }

    pub fn wait_hour_rollover(&mut self) {
        self.wait_for_rollover(TimeUnit::Hour);
    }

    pub fn wait_day_rollover(&mut self) {
        self.wait_for_rollover(TimeUnit::Day);
    }
}
