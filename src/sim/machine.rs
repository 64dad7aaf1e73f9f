//! Transition-table state machine
//!
//! Both the game-flow and player-motion machines are plain enums that know
//! their own valid successors. [`Machine`] only tracks current/previous and
//! enforces the table; entry and exit behaviour lives with the session code
//! that owns the context.

use serde::{Deserialize, Serialize};

/// A state enum with an explicit transition table
pub trait MachineState: Copy + Eq + std::fmt::Debug {
    /// Whether `next` may follow `self`
    fn can_transition_to(self, next: Self) -> bool;
}

/// Current and previous state of one machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Machine<S> {
    current: S,
    previous: Option<S>,
}

impl<S: MachineState> Machine<S> {
    pub fn new(initial: S) -> Self {
        Self {
            current: initial,
            previous: None,
        }
    }

    pub fn current(&self) -> S {
        self.current
    }

    pub fn previous(&self) -> Option<S> {
        self.previous
    }

    /// Whether a request for `next` would be accepted
    pub fn can_enter(&self, next: S) -> bool {
        self.current.can_transition_to(next)
    }

    /// Move to `next` if the table allows it. Returns the state that was left.
    pub fn enter(&mut self, next: S) -> Option<S> {
        if !self.can_enter(next) {
            return None;
        }
        let from = self.current;
        self.previous = Some(from);
        self.current = next;
        Some(from)
    }
}
