//! Alarm slots (one entry of the fixed-capacity table)
//!
//! A slot is either free (`AlarmKind::Unallocated`) or holds one scheduled
//! alarm or timer. Slots are addressed by their index, wrapped in an
//! [`AlarmId`] that stays valid until the slot is explicitly freed.

use std::fmt;

use crate::clock::{Clock, Timestamp};
use tocsin_types::AlarmKind;

use super::TimeAlarms;

/// Handle to an alarm slot (its index in the table)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AlarmId(u8);

impl AlarmId {
    /// Reserved handle that never names a slot
    pub const INVALID: AlarmId = AlarmId(u8::MAX);

    pub const fn new(raw: u8) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u8 {
        self.0
    }

    pub fn index(self) -> usize {
        usize::from(self.0)
    }

    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

impl From<u8> for AlarmId {
    fn from(raw: u8) -> Self {
        Self(raw)
    }
}

impl fmt::Display for AlarmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "{}", self.0)
        } else {
            f.write_str("invalid")
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Callbacks
// ═══════════════════════════════════════════════════════════════════════════

type PlainHandler<C> = Box<dyn FnMut(&mut TimeAlarms<C>)>;
type ParamHandler<C> = Box<dyn FnMut(&mut TimeAlarms<C>, u8)>;

/// Code run when an alarm fires.
///
/// Handlers receive the table itself so they can free, rewrite or create
/// alarms (including their own) while the servicing pass is running.
pub enum Callback<C: Clock> {
    /// Handler without a payload
    Plain(PlainHandler<C>),

    /// Handler called with the byte stored alongside it
    WithParam { handler: ParamHandler<C>, param: u8 },
}

impl<C: Clock> Callback<C> {
    pub fn plain(handler: impl FnMut(&mut TimeAlarms<C>) + 'static) -> Self {
        Callback::Plain(Box::new(handler))
    }

    pub fn with_param(handler: impl FnMut(&mut TimeAlarms<C>, u8) + 'static, param: u8) -> Self {
        Callback::WithParam {
            handler: Box::new(handler),
            param,
        }
    }

    /// Stored payload, if this is a byte-parameter handler
    pub fn param(&self) -> Option<u8> {
        match self {
            Callback::Plain(_) => None,
            Callback::WithParam { param, .. } => Some(*param),
        }
    }

    pub(super) fn invoke(&mut self, alarms: &mut TimeAlarms<C>) {
        match self {
            Callback::Plain(handler) => handler(alarms),
            Callback::WithParam { handler, param } => handler(alarms, *param),
        }
    }
}

impl<C: Clock> fmt::Debug for Callback<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callback::Plain(_) => f.write_str("Callback::Plain"),
            Callback::WithParam { param, .. } => write!(f, "Callback::WithParam({param})"),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Slot
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug)]
pub(super) struct AlarmSlot<C: Clock> {
    pub kind: AlarmKind,

    /// Disabled slots are skipped by the scheduler, not even recomputed
    pub enabled: bool,

    /// Freed automatically after firing
    pub one_shot: bool,

    /// Seconds value as supplied: absolute target, interval length,
    /// seconds since midnight or seconds since start of week
    pub value: Timestamp,

    pub next_trigger: Timestamp,

    /// `None` only while the handler is running
    pub callback: Option<Callback<C>>,

    // ─── Reentrancy bookkeeping ─────────────────────────────────────────────
    /// Bumped on every allocation of this slot
    pub generation: u32,

    /// Bumped on every rewrite of the value
    pub revision: u32,
}

impl<C: Clock> AlarmSlot<C> {
    pub fn free() -> Self {
        Self {
            kind: AlarmKind::Unallocated,
            enabled: false,
            one_shot: false,
            value: 0,
            next_trigger: 0,
            callback: None,
            generation: 0,
            revision: 0,
        }
    }

    pub fn is_allocated(&self) -> bool {
        self.kind.is_allocated()
    }

    pub fn is_due(&self, now: Timestamp) -> bool {
        self.is_allocated() && self.enabled && self.next_trigger <= now
    }

    /// Return to the unallocated state, keeping the generation counter.
    pub fn release(&mut self) {
        self.kind = AlarmKind::Unallocated;
        self.enabled = false;
        self.one_shot = false;
        self.value = 0;
        self.next_trigger = 0;
        self.callback = None;
    }
}

/// Read-only snapshot of an allocated slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlarmInfo {
    pub id: AlarmId,
    pub kind: AlarmKind,
    pub enabled: bool,
    pub one_shot: bool,
    pub value: Timestamp,
    pub next_trigger: Timestamp,
    pub param: Option<u8>,
}
