//! Frame-scheduled deferred events
//!
//! Every event remembers the session epoch it was scheduled in. Starting a
//! new session bumps the epoch, so leftovers from an old session are dropped
//! instead of firing into the new one.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeferredEvent {
    /// Lives ran out; the end screen is shown after a short beat
    GameOver,
    /// Next link of a chain reaction
    ChainSlice { id: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scheduled {
    pub due: u64,
    pub epoch: u32,
    pub event: DeferredEvent,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pending: Vec<Scheduled>,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, due: u64, epoch: u32, event: DeferredEvent) {
        self.pending.push(Scheduled { due, epoch, event });
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Remove and return events due at or before `frame`, in scheduling
    /// order. Events from other epochs are discarded.
    pub fn drain_due(&mut self, frame: u64, epoch: u32) -> Vec<DeferredEvent> {
        let mut due = Vec::new();
        self.pending.retain(|s| {
            if s.epoch != epoch {
                return false;
            }
            if s.due <= frame {
                due.push(s.event);
                return false;
            }
            true
        });
        due
    }
}
