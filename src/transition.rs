//! Gate in front of the meditation overlay.
//!
//! `idle -> transitioning -> meditating`, and straight back to `idle` on exit.
//! Each entry hands out a ticket; only the ticket of the current entry can
//! complete the transition, so a stale timer firing after an exit is a no-op.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    #[default]
    Idle,
    Transitioning,
    Meditating,
}

/// Identifies one `begin` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionTicket(u64);

#[derive(Debug, Default)]
pub struct TransitionSequencer {
    stage: Stage,
    generation: u64,
}

impl TransitionSequencer {
    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn is_transitioning(&self) -> bool {
        self.stage == Stage::Transitioning
    }

    pub fn is_meditating(&self) -> bool {
        self.stage == Stage::Meditating
    }

    /// Start the transition. Ignored unless idle.
    pub fn begin(&mut self) -> Option<TransitionTicket> {
        if self.stage != Stage::Idle {
            return None;
        }
        self.generation += 1;
        self.stage = Stage::Transitioning;
        Some(TransitionTicket(self.generation))
    }

    /// Flip to meditating in one step. Returns false for stale tickets.
    pub fn complete(&mut self, ticket: TransitionTicket) -> bool {
        if self.stage != Stage::Transitioning || ticket.0 != self.generation {
            return false;
        }
        self.stage = Stage::Meditating;
        true
    }

    /// Close the overlay (or abandon the transition). Returns the stage left.
    pub fn exit(&mut self) -> Stage {
        let previous = self.stage;
        if previous != Stage::Idle {
            self.generation += 1;
            self.stage = Stage::Idle;
        }
        previous
    }
}
