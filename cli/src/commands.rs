use std::cell::Cell;
use std::io::Write;
use std::rc::Rc;
use std::time::Duration;

use chrono::Weekday;
use tocsin_core::{
    AlarmError, AlarmId, Callback, Clock, SimulatedClock, TimeAlarms, TimeUnit, Timestamp,
};

use crate::context::CliContext;
use crate::parse::format_epoch;

/// Which creation call a command maps to
pub enum Schedule {
    TriggerOnce { at: Timestamp },
    AlarmOnce { hms: (i32, i32, i32) },
    AlarmRepeat { hms: (i32, i32, i32) },
    WeeklyOnce { day: Weekday, hms: (i32, i32, i32) },
    WeeklyRepeat { day: Weekday, hms: (i32, i32, i32) },
    TimerOnce { secs: Timestamp },
    TimerRepeat { secs: Timestamp },
}

pub fn create(
    ctx: &mut CliContext,
    schedule: Schedule,
    label: Option<String>,
    param: Option<u8>,
) -> Result<(), String> {
    let label = label.unwrap_or_else(|| "alarm".to_string());
    let callback = announcer(label.clone(), param, Rc::clone(&ctx.fired));
    let alarms = &mut ctx.alarms;

    let result = match schedule {
        Schedule::TriggerOnce { at } => alarms.trigger_once(at, callback),
        Schedule::AlarmOnce { hms: (h, m, s) } => alarms.alarm_once_hms(h, m, s, callback),
        Schedule::AlarmRepeat { hms: (h, m, s) } => alarms.alarm_repeat_hms(h, m, s, callback),
        Schedule::WeeklyOnce { day, hms: (h, m, s) } => {
            alarms.alarm_once_weekly(day, h, m, s, callback)
        }
        Schedule::WeeklyRepeat { day, hms: (h, m, s) } => {
            alarms.alarm_repeat_weekly(day, h, m, s, callback)
        }
        Schedule::TimerOnce { secs } => alarms.timer_once(secs, callback),
        Schedule::TimerRepeat { secs } => alarms.timer_repeat(secs, callback),
    };

    let id = result.map_err(|e: AlarmError| e.to_string())?;
    let next = alarms.next_trigger_of(id).map(format_epoch).unwrap_or_default();
    println!("created alarm {id} '{label}', next at {next}");
    Ok(())
}

/// Handler that prints a line when the alarm fires
fn announcer(label: String, param: Option<u8>, fired: Rc<Cell<u64>>) -> Callback<SimulatedClock> {
    match param {
        None => Callback::plain(move |alarms| announce(alarms, &label, None, &fired)),
        Some(param) => Callback::with_param(
            move |alarms, param| announce(alarms, &label, Some(param), &fired),
            param,
        ),
    }
}

fn announce(alarms: &TimeAlarms<SimulatedClock>, label: &str, param: Option<u8>, fired: &Cell<u64>) {
    fired.set(fired.get() + 1);
    let id = alarms.triggered_alarm_id().unwrap_or(AlarmId::INVALID);
    let when = format_epoch(alarms.clock().now());
    match param {
        Some(param) => println!("[{when}] alarm {id} '{label}' fired (param {param})"),
        None => println!("[{when}] alarm {id} '{label}' fired"),
    }
    tracing::info!(%id, label, ?param, "alarm fired");
}

pub fn list(ctx: &CliContext) {
    let alarms = &ctx.alarms;
    if alarms.count() == 0 {
        println!("No alarms allocated");
        return;
    }

    println!(
        "{:<4} {:<9} {:<8} {:<9} {:>8} {:<28} Param",
        "Id", "Kind", "Enabled", "Mode", "Value", "Next"
    );
    println!("{}", "-".repeat(80));

    for info in alarms.alarms() {
        let mode = if info.one_shot { "once" } else { "repeat" };
        let param = info.param.map(|p| p.to_string()).unwrap_or_default();
        println!(
            "{:<4} {:<9} {:<8} {:<9} {:>8} {:<28} {}",
            info.id.to_string(),
            info.kind.label(),
            info.enabled,
            mode,
            info.value,
            format_epoch(info.next_trigger),
            param
        );
    }

    println!("\nTotal: {} of {} slots", alarms.count(), alarms.capacity());
}

pub fn free(ctx: &mut CliContext, id: u8) {
    let id = AlarmId::from(id);
    if !ctx.alarms.is_allocated(id) {
        println!("Alarm {id} is not allocated");
        return;
    }
    ctx.alarms.free(id);
    println!("Freed alarm {id}");
}

pub fn set_enabled(ctx: &mut CliContext, id: u8, enabled: bool) {
    let id = AlarmId::from(id);
    if enabled {
        ctx.alarms.enable(id);
    } else {
        ctx.alarms.disable(id);
    }
    println!("Alarm {id} enabled: {}", ctx.alarms.is_enabled(id));
}

pub fn write(ctx: &mut CliContext, id: u8, value: Timestamp) {
    let id = AlarmId::from(id);
    ctx.alarms.write(id, value);
    match ctx.alarms.next_trigger_of(id) {
        Some(next) => println!("Alarm {id} rewritten, next at {}", format_epoch(next)),
        None => println!("Alarm {id} is not allocated"),
    }
}

pub fn show_now(ctx: &CliContext) {
    let now = ctx.alarms.clock().now();
    println!("{} ({now})", format_epoch(now));
}

pub fn show_next(ctx: &CliContext) {
    match ctx.alarms.next_trigger() {
        Some(next) => println!("Next alarm at {}", format_epoch(next)),
        None => println!("No pending alarms"),
    }
}

pub fn show_stats(ctx: &CliContext) {
    println!("Slots:     {} of {}", ctx.alarms.count(), ctx.alarms.capacity());
    println!("Fired:     {}", ctx.fired.get());
    println!("Quantum:   {} ms", ctx.config.poll_quantum_ms);
}

/// Move simulated time forward, firing alarms along the way
pub fn advance(ctx: &mut CliContext, secs: u64) {
    let before = ctx.fired.get();
    ctx.alarms.delay(Duration::from_secs(secs));
    println!(
        "Advanced {secs}s to {}, {} alarm(s) fired",
        format_epoch(ctx.alarms.clock().now()),
        ctx.fired.get() - before
    );
}

pub fn wait_for(ctx: &mut CliContext, unit: TimeUnit, digits: u16) {
    ctx.alarms.wait_for_digits(digits, unit);
    show_now(ctx);
}

pub fn rollover(ctx: &mut CliContext, unit: TimeUnit) {
    ctx.alarms.wait_for_rollover(unit);
    show_now(ctx);
}

pub fn exit() -> Result<(), String> {
    write!(std::io::stdout(), "quitting...").map_err(|e| e.to_string())?;
    std::io::stdout().flush().map_err(|e| e.to_string())
}
