//! Keyed queue of delayed effects, serviced once per tick.
//!
//! Stands in for "play a sound, then do X" chains: the follow-up runs after
//! a fixed effect duration instead of on audio completion.

use valsrevenge_core::types::EntityId;

/// Identity of a pending effect. Scheduling an existing key replaces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKey {
    DeathEffect(EntityId),
}

/// What to do when a timer fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    /// Remove the entity from the registry.
    Remove(EntityId),
    /// Restore the entity to full health (player respawn).
    ResetHealth(EntityId),
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    key: TimerKey,
    due_at: f64,
    seq: u64,
    action: TimerAction,
}

#[derive(Debug, Default)]
pub struct TimerQueue {
    entries: Vec<Entry>,
    next_seq: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, key: TimerKey, due_at: f64, action: TimerAction) {
        self.cancel(key);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(Entry {
            key,
            due_at,
            seq,
            action,
        });
    }

    /// Remove a pending timer. Returns whether one existed.
    pub fn cancel(&mut self, key: TimerKey) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.key != key);
        self.entries.len() != before
    }

    pub fn contains(&self, key: TimerKey) -> bool {
        self.entries.iter().any(|e| e.key == key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pop every timer due at or before `now`, earliest first. Ties keep
    /// scheduling order.
    pub fn drain_due(&mut self, now: f64) -> Vec<(TimerKey, TimerAction)> {
        let mut due: Vec<Entry> = Vec::new();
        self.entries.retain(|e| {
            if e.due_at <= now {
                due.push(*e);
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| a.due_at.total_cmp(&b.due_at).then(a.seq.cmp(&b.seq)));
        due.into_iter().map(|e| (e.key, e.action)).collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
