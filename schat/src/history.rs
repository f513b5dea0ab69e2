//! Per-session working copy of the conversation.

use sprovider::Turn;

/// In-memory history owned by one turn loop run: seeded from the store,
/// appended to as rounds progress, discarded at session end. The durable
/// log is written separately.
#[derive(Debug, Clone, Default)]
pub struct WorkingHistory {
    turns: Vec<Turn>,
}

impl WorkingHistory {
    pub fn seeded(turns: Vec<Turn>) -> Self {
        Self { turns }
    }

    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn snapshot(&self) -> Vec<Turn> {
        self.turns.clone()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
