//! One-shot deferred actions
//!
//! Delays like the bomb fuse are entries keyed by elapsed simulation time, not
//! threads. Each fires exactly once, in due order (ties by scheduling order),
//! and everything pending is dropped when the session is torn down.

use serde::{Deserialize, Serialize};

/// Tolerance for accumulated float deltas reaching a due time
const DUE_EPSILON: f64 = 1e-6;

/// Work a scheduled entry performs when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeferredAction {
    /// Bomb fuse expired: WaitingForBomb -> Playing
    StartPlaying,
    /// Smoke trail lifetime over
    RemoveSmokeTrail(u32),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Scheduled {
    id: u64,
    due: f64,
    action: DeferredAction,
}

/// Session-owned scheduler
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scheduler {
    now: f64,
    next_id: u64,
    pending: Vec<Scheduled>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Elapsed simulation time
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Queue `action` to fire `delay` seconds from now. Returns its handle.
    pub fn schedule(&mut self, delay: f64, action: DeferredAction) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.pending.push(Scheduled {
            id,
            due: self.now + delay.max(0.0),
            action,
        });
        id
    }

    /// Drop one pending entry. Returns whether it was still pending.
    pub fn cancel(&mut self, handle: u64) -> bool {
        let before = self.pending.len();
        self.pending.retain(|s| s.id != handle);
        self.pending.len() != before
    }

    /// Drop everything pending
    pub fn cancel_all(&mut self) {
        if !self.pending.is_empty() {
            log::debug!("Cancelling {} deferred actions", self.pending.len());
        }
        self.pending.clear();
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Advance the clock and remove the entries now due, in firing order
    pub fn advance(&mut self, dt: f64) -> Vec<DeferredAction> {
        self.now += dt.max(0.0);
        let now = self.now + DUE_EPSILON;

        let mut due: Vec<Scheduled> = Vec::new();
        self.pending.retain(|s| {
            if s.due <= now {
                due.push(s.clone());
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| a.due.total_cmp(&b.due).then(a.id.cmp(&b.id)));
        due.into_iter().map(|s| s.action).collect()
    }
}
