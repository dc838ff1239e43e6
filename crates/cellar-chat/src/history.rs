//! In-memory conversation history
//!
//! Append-only within a session; `clear` is the only removal path. The
//! windowed read excludes the most recent turn, which belongs to the
//! exchange currently being answered.

use parking_lot::RwLock;

use crate::types::Turn;

/// Ordered log of conversation turns for one session
///
/// One session is single-writer and processes one turn at a time; the lock
/// exists so the serving layer can take snapshot reads through `&self`.
#[derive(Debug, Default)]
pub struct HistoryStore {
    turns: RwLock<Vec<Turn>>,
}

impl HistoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn to the end of the log
    pub fn append(&self, turn: Turn) {
        self.turns.write().push(turn);
    }

    /// Last `min(n, len - 1)` turns, excluding the most recent one
    ///
    /// The most recent turn is the in-flight question being answered, not a
    /// resolved exchange, so it never feeds the prompt window. Fewer than
    /// two recorded turns yield an empty window.
    pub fn window(&self, n: usize) -> Vec<Turn> {
        let turns = self.turns.read();
        if turns.len() < 2 {
            return Vec::new();
        }
        let resolved = &turns[..turns.len() - 1];
        let start = resolved.len().saturating_sub(n);
        resolved[start..].to_vec()
    }

    /// Discard all turns; idempotent
    pub fn clear(&self) {
        self.turns.write().clear();
        tracing::debug!("conversation history cleared");
    }

    /// Number of recorded turns
    pub fn len(&self) -> usize {
        self.turns.read().len()
    }

    /// Whether no turns are recorded
    pub fn is_empty(&self) -> bool {
        self.turns.read().is_empty()
    }

    /// Snapshot of all recorded turns, in arrival order
    pub fn turns(&self) -> Vec<Turn> {
        self.turns.read().clone()
    }
}
