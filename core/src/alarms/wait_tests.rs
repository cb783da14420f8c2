//! Tests for the busy-polling waits, driven by a simulated clock

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::clock::{Clock, SimulatedClock, Timestamp};
use tocsin_types::TimeUnit;

use super::{Callback, TimeAlarms, hms};

// 2025-01-01 00:00:00 UTC, a Wednesday
const NEW_YEAR: Timestamp = 1_735_689_600;

fn table(start: Timestamp, quantum_ms: u64) -> TimeAlarms<SimulatedClock> {
    TimeAlarms::new(SimulatedClock::with_quantum(start, quantum_ms))
}

/// Handler that records the clock time it fired at
fn stamp(times: &Rc<RefCell<Vec<Timestamp>>>) -> Callback<SimulatedClock> {
    let times = Rc::clone(times);
    Callback::plain(move |alarms: &mut TimeAlarms<SimulatedClock>| {
        times.borrow_mut().push(alarms.clock().now())
    })
}

#[test]
fn test_delay_fires_every_period_in_window() {
    let mut alarms = table(NEW_YEAR, 1);
    let times = Rc::new(RefCell::new(Vec::new()));
    alarms.timer_repeat(5, stamp(&times)).unwrap();

    alarms.delay(Duration::from_secs(20));

    assert_eq!(
        *times.borrow(),
        vec![NEW_YEAR + 5, NEW_YEAR + 10, NEW_YEAR + 15, NEW_YEAR + 20]
    );
    assert_eq!(alarms.clock().now(), NEW_YEAR + 20);
}

#[test]
fn test_delay_window_end_is_inclusive() {
    let mut alarms = table(NEW_YEAR, 1_000);
    let times = Rc::new(RefCell::new(Vec::new()));
    alarms.timer_once(3, stamp(&times)).unwrap();

    alarms.delay(Duration::from_secs(3));

    assert_eq!(*times.borrow(), vec![NEW_YEAR + 3]);
    assert_eq!(alarms.count(), 0);
}

#[test]
fn test_zero_delay_still_services_once() {
    let mut alarms = table(NEW_YEAR, 1);
    let times = Rc::new(RefCell::new(Vec::new()));
    alarms.trigger_once(NEW_YEAR - 1, stamp(&times)).unwrap();

    alarms.delay(Duration::ZERO);

    assert_eq!(times.borrow().len(), 1);
    assert_eq!(alarms.clock().millis(), 0);
}

#[test]
fn test_digits_now() {
    let start = NEW_YEAR + hms(13, 45, 30);
    let alarms = table(start, 1);
    alarms.clock().advance_millis(250);

    assert_eq!(alarms.digits_now(TimeUnit::Millisecond), 250);
    assert_eq!(alarms.digits_now(TimeUnit::Second), 30);
    assert_eq!(alarms.digits_now(TimeUnit::Minute), 45);
    assert_eq!(alarms.digits_now(TimeUnit::Hour), 13);
    // Wednesday
    assert_eq!(alarms.digits_now(TimeUnit::Day), 4);
}

#[test]
fn test_wait_for_digits_services_while_waiting() {
    let mut alarms = table(NEW_YEAR + hms(9, 59, 50), 100);
    let times = Rc::new(RefCell::new(Vec::new()));
    alarms.timer_repeat(4, stamp(&times)).unwrap();

    alarms.wait_until_this_hour(10);

    assert_eq!(alarms.clock().now(), NEW_YEAR + hms(10, 0, 0));
    assert_eq!(
        *times.borrow(),
        vec![NEW_YEAR + hms(9, 59, 54), NEW_YEAR + hms(9, 59, 58)]
    );
}

#[test]
fn test_wait_for_digits_out_of_range_returns() {
    let mut alarms = table(NEW_YEAR, 1);

    alarms.wait_for_digits(60, TimeUnit::Second);
    alarms.wait_until_this_hour(24);
    // Days are numbered 1 through 7
    alarms.wait_until_this_day(0);
    alarms.wait_until_this_day(8);

    assert_eq!(alarms.clock().millis(), 0);
}

#[test]
fn test_wait_until_this_day_reaches_sunday() {
    let mut alarms = table(NEW_YEAR, 3_600_000);

    alarms.wait_until_this_day(1);

    // Wednesday to the following Sunday
    assert_eq!(alarms.clock().now(), NEW_YEAR + hms(96, 0, 0));
    assert_eq!(alarms.digits_now(TimeUnit::Day), 1);
}

#[test]
fn test_minute_rollover() {
    let mut alarms = table(NEW_YEAR + hms(8, 30, 0), 1_000);

    // Already on the boundary: waits for the next one
    alarms.wait_minute_rollover();
    assert_eq!(alarms.clock().now(), NEW_YEAR + hms(8, 31, 0));

    alarms.clock().advance_secs(17);
    alarms.wait_minute_rollover();
    assert_eq!(alarms.clock().now(), NEW_YEAR + hms(8, 32, 0));
}

#[test]
fn test_day_rollover_fires_midnight_alarm() {
    let mut alarms = table(NEW_YEAR + hms(23, 59, 0), 1_000);
    let times = Rc::new(RefCell::new(Vec::new()));
    alarms.alarm_repeat_hms(24, 0, 0, stamp(&times)).unwrap();

    alarms.wait_day_rollover();

    let thursday = NEW_YEAR + hms(24, 0, 0);
    assert_eq!(alarms.clock().now(), thursday);
    assert_eq!(alarms.digits_now(TimeUnit::Day), 5);
    assert_eq!(*times.borrow(), vec![thursday]);
}

#[test]
fn test_delay_inside_handler_does_not_recurse() {
    let mut alarms = table(NEW_YEAR, 1_000);
    let count = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&count);
    alarms
        .timer_repeat(
            1,
            Callback::plain(move |alarms| {
                *counter.borrow_mut() += 1;
                alarms.delay(Duration::from_secs(3));
            }),
        )
        .unwrap();

    alarms.service_alarms(NEW_YEAR + 1);

    // The inner delay spun the clock but could not start another pass
    assert_eq!(*count.borrow(), 1);
    assert_eq!(alarms.clock().now(), NEW_YEAR + 3);
}
