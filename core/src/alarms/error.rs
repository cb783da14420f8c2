//! Error types for alarm creation

use thiserror::Error;

use crate::clock::Timestamp;
use tocsin_types::AlarmKind;

/// Reasons a creation call declined to allocate a slot.
///
/// The table is left untouched in both cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AlarmError {
    #[error("all {capacity} alarm slots are in use")]
    Exhausted { capacity: usize },

    #[error("value {value} is out of range for a {kind} alarm")]
    InvalidRange { kind: AlarmKind, value: Timestamp },
}
