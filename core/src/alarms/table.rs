//! Fixed-capacity alarm table
//!
//! Owns the slots and every operation that allocates, frees or edits them.
//! All per-id operations accept any [`AlarmId`]; ids that do not name an
//! allocated slot (stale ids, `AlarmId::INVALID`) are ignored or answered
//! with `None`.

use tracing::{debug, warn};

use crate::clock::{Clock, SECS_PER_DAY, SECS_PER_WEEK, Timestamp};
use tocsin_types::{AlarmKind, AlarmsConfig, DEFAULT_CAPACITY, MAX_CAPACITY};

use super::slot::AlarmSlot;
use super::{AlarmError, AlarmId, AlarmInfo, Callback, TriggerCalculator};

/// Table of software alarms serviced from the application's main loop.
///
/// The table is owned by the control loop and passed to every callback,
/// so a firing alarm can reshape the table it lives in.
pub struct TimeAlarms<C: Clock> {
    pub(super) clock: C,
    pub(super) slots: Vec<AlarmSlot<C>>,

    /// True for the whole duration of a servicing pass
    pub(super) in_pass: bool,

    /// Slot whose handler is currently running
    pub(super) servicing: Option<AlarmId>,
}

impl<C: Clock> TimeAlarms<C> {
    /// Create a table with the default number of slots
    pub fn new(clock: C) -> Self {
        Self::with_capacity(clock, DEFAULT_CAPACITY)
    }

    /// Create a table with `capacity` slots (at most 255).
    pub fn with_capacity(clock: C, capacity: usize) -> Self {
        let capacity = capacity.min(MAX_CAPACITY);
        Self {
            clock,
            slots: (0..capacity).map(|_| AlarmSlot::free()).collect(),
            in_pass: false,
            servicing: None,
        }
    }

    pub fn from_config(clock: C, config: &AlarmsConfig) -> Self {
        Self::with_capacity(clock, config.capacity)
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    // ─── Allocation ─────────────────────────────────────────────────────────

    /// Install an alarm in the first free slot.
    ///
    /// The value is checked against the class before any slot is touched.
    /// The new slot is enabled with its first trigger computed from the
    /// clock's current time.
    pub fn allocate(
        &mut self,
        kind: AlarmKind,
        value: Timestamp,
        callback: Callback<C>,
        one_shot: bool,
    ) -> Result<AlarmId, AlarmError> {
        if !value_in_range(kind, value) {
            warn!(%kind, value, "rejected alarm value");
            return Err(AlarmError::InvalidRange { kind, value });
        }

        let Some(index) = self.slots.iter().position(|s| !s.is_allocated()) else {
            warn!(capacity = self.capacity(), "alarm table full");
            return Err(AlarmError::Exhausted {
                capacity: self.capacity(),
            });
        };

        let now = self.clock.now();
        let calc = TriggerCalculator::new(&self.clock);
        let Some(next_trigger) = calc.initial(kind, value, now) else {
            return Err(AlarmError::InvalidRange { kind, value });
        };

        let slot = &mut self.slots[index];
        slot.kind = kind;
        slot.enabled = true;
        slot.one_shot = one_shot;
        slot.value = value;
        slot.next_trigger = next_trigger;
        slot.callback = Some(callback);
        slot.generation = slot.generation.wrapping_add(1);
        slot.revision = 0;

        let id = AlarmId::new(index as u8);
        debug!(%id, %kind, value, one_shot, next_trigger, "alarm allocated");
        Ok(id)
    }

    /// Release a slot for reuse. Legal from inside the slot's own handler.
    pub fn free(&mut self, id: AlarmId) {
        if let Some(slot) = self.slot_mut(id) {
            slot.release();
            debug!(%id, "alarm freed");
        }
    }

    // ─── Editing ────────────────────────────────────────────────────────────

    /// Let the alarm fire again. The trigger time is left as it is.
    ///
    /// Interval and explicit slots holding a zero value cannot be enabled.
    pub fn enable(&mut self, id: AlarmId) {
        if let Some(slot) = self.slot_mut(id) {
            slot.enabled = !(slot.kind.uses_absolute_value() && slot.value == 0);
        }
    }

    /// Stop the alarm from firing without freeing it
    pub fn disable(&mut self, id: AlarmId) {
        if let Some(slot) = self.slot_mut(id) {
            slot.enabled = false;
        }
    }

    /// Replace the stored value, recompute the trigger from now and enable.
    ///
    /// The value is not range checked. A value with no reachable trigger
    /// leaves the slot disabled.
    pub fn write(&mut self, id: AlarmId, value: Timestamp) {
        let now = self.clock.now();
        let Some(slot) = self.slots.get_mut(id.index()).filter(|s| s.is_allocated()) else {
            return;
        };

        let calc = TriggerCalculator::new(&self.clock);
        slot.value = value;
        slot.revision = slot.revision.wrapping_add(1);
        match calc.initial(slot.kind, value, now) {
            Some(next) => {
                slot.next_trigger = next;
                slot.enabled = !(slot.kind.uses_absolute_value() && value == 0);
            }
            None => slot.enabled = false,
        }

        debug!(%id, value, next_trigger = slot.next_trigger, enabled = slot.enabled, "alarm rewritten");
    }

    // ─── Queries ────────────────────────────────────────────────────────────

    /// Stored value of an allocated slot
    pub fn read(&self, id: AlarmId) -> Option<Timestamp> {
        self.slot(id).map(|s| s.value)
    }

    /// Class of the slot (`Unallocated` for free or unknown ids)
    pub fn read_type(&self, id: AlarmId) -> AlarmKind {
        self.slot(id).map_or(AlarmKind::Unallocated, |s| s.kind)
    }

    pub fn is_allocated(&self, id: AlarmId) -> bool {
        self.slot(id).is_some()
    }

    /// True for allocated explicit, daily and weekly alarms
    pub fn is_alarm(&self, id: AlarmId) -> bool {
        self.read_type(id).is_alarm()
    }

    pub fn is_enabled(&self, id: AlarmId) -> bool {
        self.slot(id).is_some_and(|s| s.enabled)
    }

    /// Number of allocated slots
    pub fn count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_allocated()).count()
    }

    pub fn info(&self, id: AlarmId) -> Option<AlarmInfo> {
        self.slot(id).map(|s| snapshot(id, s))
    }

    /// Snapshots of every allocated slot in index order
    pub fn alarms(&self) -> impl Iterator<Item = AlarmInfo> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_allocated())
            .map(|(index, s)| snapshot(AlarmId::new(index as u8), s))
    }

    fn slot(&self, id: AlarmId) -> Option<&AlarmSlot<C>> {
        self.slots.get(id.index()).filter(|s| s.is_allocated())
    }

    fn slot_mut(&mut self, id: AlarmId) -> Option<&mut AlarmSlot<C>> {
        self.slots.get_mut(id.index()).filter(|s| s.is_allocated())
    }
}

/// Bounds a creation value must satisfy for its class
fn value_in_range(kind: AlarmKind, value: Timestamp) -> bool {
    match kind {
        AlarmKind::Unallocated => false,
        AlarmKind::Interval | AlarmKind::Explicit => value > 0,
        AlarmKind::Daily => value > 0 && value <= SECS_PER_DAY,
        AlarmKind::Weekly => value > 0 && value <= SECS_PER_WEEK,
    }
}

fn snapshot<C: Clock>(id: AlarmId, slot: &AlarmSlot<C>) -> AlarmInfo {
    AlarmInfo {
        id,
        kind: slot.kind,
        enabled: slot.enabled,
        one_shot: slot.one_shot,
        value: slot.value,
        next_trigger: slot.next_trigger,
        param: slot.callback.as_ref().and_then(|c| c.param()),
    }
}
