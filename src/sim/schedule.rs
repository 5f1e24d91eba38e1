//! Deferred one-shot actions keyed by tick deadline
//!
//! Each entry records the store generation it was scheduled in. A restart
//! clears the queue and bumps the generation, so an entry that somehow
//! survives is still recognisably stale when it comes due.

use super::entity::EntityId;

/// Work that runs after a delay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredAction {
    /// Banner finished: swap in the upgraded player and start the boss fight
    CompleteUpgrade,
    /// Defeat animation finished: remove the boss and show the win screen
    FinishBossDefeat { boss: EntityId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deferred {
    pub due_tick: u64,
    pub generation: u32,
    pub action: DeferredAction,
    seq: u64,
}

#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    pending: Vec<Deferred>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `action` to run `delay_ticks` after `now`
    pub fn schedule(&mut self, now: u64, delay_ticks: u64, generation: u32, action: DeferredAction) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Deferred {
            due_tick: now + delay_ticks,
            generation,
            action,
            seq,
        });
    }

    /// Remove and return every entry due at `now`, oldest deadline first
    pub fn take_due(&mut self, now: u64) -> Vec<Deferred> {
        let (mut due, rest): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|d| d.due_tick <= now);
        self.pending = rest;
        due.sort_by_key(|d| (d.due_tick, d.seq));
        due
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
