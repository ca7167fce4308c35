//! Side effects the controller asks its owner to carry out
//!
//! Persistence and the Wi-Fi link live outside the core. The controller
//! queues requests; the firmware drains them after each step.

use core::mem::discriminant;

use heapless::Deque;

/// Pending effect capacity; one slot per kind is enough
pub const MAX_PENDING_EFFECTS: usize = 8;

/// Request for the firmware
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Effect {
    /// Write the dose schedule
    SaveDoses,
    /// Write [`Settings`](crate::config::Settings)
    SaveSettings,
    /// Write the day of month seen by the rollover detector
    SaveLastDay(u8),
    /// Write the intake log
    SaveLog,
    /// Start (`true`) or stop the Wi-Fi bridge
    SetLink(bool),
}

/// FIFO of effects, at most one per kind
#[derive(Debug, Default)]
pub(crate) struct EffectQueue {
    queue: Deque<Effect, MAX_PENDING_EFFECTS>,
}

impl EffectQueue {
    pub(crate) const fn new() -> Self {
        Self {
            queue: Deque::new(),
        }
    }

    /// Queue `effect`, replacing a queued effect of the same kind in place
    pub(crate) fn push(&mut self, effect: Effect) {
        if let Some(queued) = self
            .queue
            .iter_mut()
            .find(|e| discriminant(*e) == discriminant(&effect))
        {
            *queued = effect;
            return;
        }
        if self.queue.push_back(effect).is_err() {
            warn!("Effect queue full, dropped {}", effect);
        }
    }

    pub(crate) fn pop(&mut self) -> Option<Effect> {
        self.queue.pop_front()
    }

    pub(crate) fn len(&self) -> usize {
        self.queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let mut q = EffectQueue::new();
        q.push(Effect::SaveDoses);
        q.push(Effect::SetLink(true));
        assert_eq!(q.pop(), Some(Effect::SaveDoses));
        assert_eq!(q.pop(), Some(Effect::SetLink(true)));
        assert_eq!(q.pop(), None);
    }

    #[test]
    fn test_same_kind_collapses_to_latest() {
        let mut q = EffectQueue::new();
        q.push(Effect::SetLink(true));
        q.push(Effect::SaveSettings);
        q.push(Effect::SetLink(false));
        q.push(Effect::SaveSettings);

        assert_eq!(q.len(), 2);
        assert_eq!(q.pop(), Some(Effect::SetLink(false)));
        assert_eq!(q.pop(), Some(Effect::SaveSettings));
    }
}
