//! Trigger time computation
//!
//! Maps (alarm class, stored value, reference time) to the next absolute
//! epoch time the alarm is due. Calendar classes defer to the [`Clock`]
//! for where a day or week starts.

use crate::clock::{Clock, SECS_PER_DAY, SECS_PER_WEEK, Timestamp};
use tocsin_types::AlarmKind;

pub struct TriggerCalculator<'a, C: Clock> {
    clock: &'a C,
}

impl<'a, C: Clock> TriggerCalculator<'a, C> {
    pub fn new(clock: &'a C) -> Self {
        Self { clock }
    }

    /// Trigger for a slot that was just allocated or rewritten at `now`.
    ///
    /// Returns `None` for unallocated slots and for intervals that would
    /// land past the end of representable time.
    pub fn initial(&self, kind: AlarmKind, value: Timestamp, now: Timestamp) -> Option<Timestamp> {
        match kind {
            AlarmKind::Unallocated => None,
            AlarmKind::Interval => now.checked_add(value),
            AlarmKind::Explicit => Some(value),
            AlarmKind::Daily => Some(self.daily(value, now)),
            AlarmKind::Weekly => Some(self.weekly(value, now)),
        }
    }

    /// Trigger for a repeating slot that fired while scheduled at `previous`.
    ///
    /// Intervals advance from the scheduled time, not from `now`, so late
    /// polling never accumulates drift. Explicit alarms, and intervals that
    /// would overflow, have no next occurrence and return `None`.
    pub fn after_firing(
        &self,
        kind: AlarmKind,
        value: Timestamp,
        previous: Timestamp,
        now: Timestamp,
    ) -> Option<Timestamp> {
        match kind {
            AlarmKind::Unallocated | AlarmKind::Explicit => None,
            AlarmKind::Interval => previous.checked_add(value),
            AlarmKind::Daily => Some(self.daily(value, now)),
            AlarmKind::Weekly => Some(self.weekly(value, now)),
        }
    }

    /// `value` seconds after midnight, today if still ahead of `now`, else tomorrow
    pub fn daily(&self, value: Timestamp, now: Timestamp) -> Timestamp {
        let today = self.clock.start_of_day(now);
        if today + value <= now {
            today + SECS_PER_DAY + value
        } else {
            today + value
        }
    }

    /// `value` seconds after the start of this week if still ahead, else next week
    pub fn weekly(&self, value: Timestamp, now: Timestamp) -> Timestamp {
        let this_week = self.clock.start_of_week(now);
        if this_week + value <= now {
            this_week + SECS_PER_WEEK + value
        } else {
            this_week + value
        }
    }
}
