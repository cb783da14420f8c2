//! Servicing passes
//!
//! One pass walks the slots that were allocated when the pass began, in
//! index order, and runs every handler that is due. Handlers get the table
//! and may change anything in it, so after each call the slot is examined
//! again rather than assumed to have survived:
//!
//! - freed (or freed and reused) by the handler → left alone
//! - rewritten by the handler → the new configuration stands
//! - otherwise one-shot slots are freed and repeating slots rescheduled,
//!   unless the handler disabled them, which keeps the trigger as it was
//!
//! Slots allocated during the pass are not visited until the next one.

use tracing::trace;

use crate::clock::{Clock, Timestamp};

use super::{AlarmId, Callback, TimeAlarms, TriggerCalculator};

impl<C: Clock> TimeAlarms<C> {
    /// Run a servicing pass at the clock's current time
    pub fn service(&mut self) {
        let now = self.clock.now();
        self.service_alarms(now);
    }

    /// Fire every enabled slot whose trigger is at or before `now`.
    ///
    /// Calls made while a pass is already running (from inside a handler)
    /// return without doing anything.
    pub fn service_alarms(&mut self, now: Timestamp) {
        if self.in_pass {
            trace!("nested service call ignored");
            return;
        }
        self.in_pass = true;

        let generations: Vec<Option<u32>> = self
            .slots
            .iter()
            .map(|s| s.is_allocated().then_some(s.generation))
            .collect();

        for (index, generation) in generations.into_iter().enumerate() {
            let Some(generation) = generation else {
                continue;
            };
            let slot = &mut self.slots[index];
            if slot.generation != generation || !slot.is_due(now) {
                continue;
            }
            let Some(mut callback) = slot.callback.take() else {
                continue;
            };
            let revision = slot.revision;

            let id = AlarmId::new(index as u8);
            trace!(%id, kind = %slot.kind, next_trigger = slot.next_trigger, now, "alarm firing");

            self.servicing = Some(id);
            callback.invoke(self);
            self.servicing = None;

            self.settle(id, generation, revision, callback, now);
        }

        self.in_pass = false;
    }

    /// Bring a slot back to a consistent state after its handler returned
    fn settle(
        &mut self,
        id: AlarmId,
        generation: u32,
        revision: u32,
        callback: Callback<C>,
        now: Timestamp,
    ) {
        let slot = &mut self.slots[id.index()];
        if !slot.is_allocated() || slot.generation != generation {
            return;
        }

        slot.callback = Some(callback);
        if slot.revision != revision {
            return;
        }

        if slot.one_shot {
            self.free(id);
            return;
        }
        if !slot.enabled {
            return;
        }

        let calc = TriggerCalculator::new(&self.clock);
        match calc.after_firing(slot.kind, slot.value, slot.next_trigger, now) {
            Some(next) => slot.next_trigger = next,
            None => slot.enabled = false,
        }
    }

    // ─── Introspection ──────────────────────────────────────────────────────

    /// Earliest trigger among allocated, enabled slots
    pub fn next_trigger(&self) -> Option<Timestamp> {
        self.slots
            .iter()
            .filter(|s| s.is_allocated() && s.enabled)
            .map(|s| s.next_trigger)
            .min()
    }

    /// Trigger time of one allocated slot
    pub fn next_trigger_of(&self, id: AlarmId) -> Option<Timestamp> {
        self.slots
            .get(id.index())
            .filter(|s| s.is_allocated())
            .map(|s| s.next_trigger)
    }

    /// Id of the alarm whose handler is running, if any
    pub fn triggered_alarm_id(&self) -> Option<AlarmId> {
        self.servicing
    }

    /// True while a servicing pass is in progress
    pub fn is_servicing(&self) -> bool {
        self.in_pass
    }
}
