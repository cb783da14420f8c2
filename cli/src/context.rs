use std::cell::Cell;
use std::rc::Rc;

use chrono::Utc;
use tocsin_core::{AlarmsConfig, SimulatedClock, TimeAlarms};

/// Holds all state for the CLI session.
///
/// The alarm table runs on a simulated clock so a session can move through
/// days of alarms in a few seconds.
pub struct CliContext {
    pub config: AlarmsConfig,
    pub alarms: TimeAlarms<SimulatedClock>,
    /// Total handler invocations this session
    pub fired: Rc<Cell<u64>>,
}

impl CliContext {
    pub fn new(config: AlarmsConfig) -> Self {
        let start = config.start_epoch.unwrap_or_else(|| Utc::now().timestamp());
        let clock = SimulatedClock::with_quantum(start, config.poll_quantum_ms);
        let alarms = TimeAlarms::from_config(clock, &config);

        tracing::info!(
            capacity = alarms.capacity(),
            start,
            quantum_ms = config.poll_quantum_ms,
            "alarm table ready"
        );

        Self {
            config,
            alarms,
            fired: Rc::new(Cell::new(0)),
        }
    }
}
