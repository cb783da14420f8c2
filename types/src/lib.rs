//! Shared types for tocsin
//!
//! This crate contains the serializable types shared between the alarm
//! engine (tocsin-core) and its front ends (tocsin-cli).

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Alarm Classes
// ─────────────────────────────────────────────────────────────────────────────

/// Class of an alarm slot.
///
/// New calendar classes (biweekly, monthly, annual) would be added after
/// `Weekly`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlarmKind {
    /// Free slot, invisible to everything except allocation
    #[default]
    Unallocated,
    /// Fires after a fixed number of seconds, optionally repeating
    Interval,
    /// Fires once at an absolute epoch time
    Explicit,
    /// Fires at a fixed time of day
    Daily,
    /// Fires at a fixed day of week and time of day
    Weekly,
}

impl AlarmKind {
    /// True for the time-based classes (explicit, daily, weekly).
    pub fn is_alarm(&self) -> bool {
        matches!(self, AlarmKind::Explicit | AlarmKind::Daily | AlarmKind::Weekly)
    }

    /// True when the stored value is used as-is rather than as a calendar offset.
    pub fn uses_absolute_value(&self) -> bool {
        matches!(self, AlarmKind::Interval | AlarmKind::Explicit)
    }

    pub fn is_allocated(&self) -> bool {
        *self != AlarmKind::Unallocated
    }

    /// Short label for listings and log fields
    pub fn label(&self) -> &'static str {
        match self {
            AlarmKind::Unallocated => "free",
            AlarmKind::Interval => "timer",
            AlarmKind::Explicit => "explicit",
            AlarmKind::Daily => "daily",
            AlarmKind::Weekly => "weekly",
        }
    }
}

impl std::fmt::Display for AlarmKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Calendar Units
// ─────────────────────────────────────────────────────────────────────────────

/// Calendar field used by the blocking wait helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeUnit {
    Millisecond,
    Second,
    Minute,
    Hour,
    /// Day of week, numbered by the clock
    Day,
}

impl TimeUnit {
    /// Largest value the field can take.
    pub fn max_digit(&self) -> u16 {
        match self {
            TimeUnit::Millisecond => 999,
            TimeUnit::Second | TimeUnit::Minute => 59,
            TimeUnit::Hour => 23,
            TimeUnit::Day => 7,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Slot count used when nothing else is configured
pub const DEFAULT_CAPACITY: usize = 12;

/// Upper bound on slots. Ids are a byte and `u8::MAX` is the invalid id.
pub const MAX_CAPACITY: usize = 255;

/// Alarm table settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlarmsConfig {
    /// Number of alarm slots, fixed for the lifetime of a table
    pub capacity: usize,

    /// Simulated time that passes per busy-poll iteration (milliseconds)
    pub poll_quantum_ms: u64,

    /// Epoch second a simulated clock starts at (None = host time)
    pub start_epoch: Option<i64>,
}

impl Default for AlarmsConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            poll_quantum_ms: 1,
            start_epoch: None,
        }
    }
}
