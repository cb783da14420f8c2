pub mod alarms;
pub mod clock;
pub mod config;

// Re-exports for convenience
pub use alarms::{AlarmError, AlarmId, AlarmInfo, Callback, TimeAlarms, TriggerCalculator, hms};
pub use clock::{
    Clock, SECS_PER_DAY, SECS_PER_HOUR, SECS_PER_MIN, SECS_PER_WEEK, SimulatedClock, SystemClock,
    Timestamp,
};
pub use config::{AlarmsConfigExt, ConfigError};
pub use tocsin_types::{AlarmKind, AlarmsConfig, TimeUnit};
