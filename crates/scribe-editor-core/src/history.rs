//! Undo/redo history for a single text buffer.
//!
//! Provides:
//! - `UndoManager` trait for abstracting undo implementations
//! - `HistoryManager` - snapshot history with debounced checkpointing
//!
//! Updates land in two phases. `update_history` makes the new value the
//! present immediately and opens a debounce window ([`Phase::Live`]); only
//! when the window elapses without another update is the value committed as
//! a checkpoint. Rapid keystrokes therefore coalesce into one undo step.
//!
//! The manager owns no timer. Callers either poll it with the current time
//! (`poll_at`) or drive it through [`crate::debounce::DebouncedHistory`].

use std::collections::VecDeque;
use std::time::Duration;

use serde::Deserialize;
use web_time::Instant;

/// Maximum number of checkpoints kept in `past`.
pub const MAX_HISTORY: usize = 50;

/// Quiet period after which a live edit becomes a checkpoint.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(500);

/// Trait for managing undo/redo operations.
///
/// Implementations must actually perform the undo/redo, not just track state.
pub trait UndoManager {
    /// Check if undo is available.
    fn can_undo(&self) -> bool;

    /// Check if redo is available.
    fn can_redo(&self) -> bool;

    /// Perform undo. Returns true if successful.
    fn undo(&mut self) -> bool;

    /// Perform redo. Returns true if successful.
    fn redo(&mut self) -> bool;

    /// Clear all undo/redo history.
    fn clear_history(&mut self);
}

/// Tunables for a history instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub max_entries: usize,
    #[serde(rename = "debounce_ms", with = "millis")]
    pub debounce: Duration,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_entries: MAX_HISTORY,
            debounce: DEBOUNCE_WINDOW,
        }
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Duration, D::Error> {
        u64::deserialize(de).map(Duration::from_millis)
    }
}

/// Snapshot stacks. `past` is oldest first, `future` is nearest redo first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HistoryState {
    pub past: VecDeque<String>,
    pub present: String,
    pub future: VecDeque<String>,
}

/// Whether an edit is waiting for its debounce window to close.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Settled,
    Live { value: String, due: Instant },
}

/// Linear undo/redo history over whole-buffer snapshots.
#[derive(Debug, Clone)]
pub struct HistoryManager {
    state: HistoryState,
    /// Value of the most recent checkpoint (or of the last undo/redo/reset).
    committed: String,
    phase: Phase,
    config: HistoryConfig,
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new("")
    }
}

impl HistoryManager {
    pub fn new(initial: impl Into<String>) -> Self {
        Self::with_config(initial, HistoryConfig::default())
    }

    pub fn with_config(initial: impl Into<String>, config: HistoryConfig) -> Self {
        let initial = initial.into();
        Self {
            state: HistoryState {
                present: initial.clone(),
                ..Default::default()
            },
            committed: initial,
            phase: Phase::Settled,
            config,
        }
    }

    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    /// The live buffer value, including any uncommitted edit.
    pub fn present(&self) -> &str {
        &self.state.present
    }

    pub fn state(&self) -> &HistoryState {
        &self.state
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn has_pending(&self) -> bool {
        matches!(self.phase, Phase::Live { .. })
    }

    /// When the pending checkpoint falls due, if one is pending.
    pub fn due(&self) -> Option<Instant> {
        match &self.phase {
            Phase::Live { due, .. } => Some(*due),
            Phase::Settled => None,
        }
    }

    /// Record a new buffer value now.
    pub fn update_history(&mut self, value: impl Into<String>) {
        self.update_history_at(value, Instant::now());
    }

    /// Record a new buffer value at `now`.
    ///
    /// `present` changes immediately; the checkpoint is scheduled for
    /// `now + debounce`, replacing any earlier pending one. A value that
    /// differs from the last checkpoint discards the redo stack right away,
    /// whether or not its checkpoint ever commits.
    pub fn update_history_at(&mut self, value: impl Into<String>, now: Instant) {
        let value = value.into();
        tracing::trace!(len = value.len(), "history update");
        if value != self.committed {
            self.state.future.clear();
        }
        self.state.present = value.clone();
        self.phase = Phase::Live {
            value,
            due: now + self.config.debounce,
        };
    }

    /// Commit the pending checkpoint if its window has closed by `now`.
    /// Returns true if a checkpoint was committed.
    pub fn poll_at(&mut self, now: Instant) -> bool {
        match &self.phase {
            Phase::Live { due, .. } if *due <= now => self.flush(),
            _ => false,
        }
    }

    pub fn poll(&mut self) -> bool {
        self.poll_at(Instant::now())
    }

    /// Commit the pending edit immediately, ignoring the window.
    /// Returns true if a checkpoint was committed.
    pub fn flush(&mut self) -> bool {
        let Phase::Live { value, .. } = std::mem::take(&mut self.phase) else {
            return false;
        };
        if value == self.committed {
            return false;
        }

        let previous = std::mem::replace(&mut self.committed, value.clone());
        self.state.past.push_back(previous);
        while self.state.past.len() > self.config.max_entries {
            self.state.past.pop_front();
        }
        self.state.present = value;
        self.state.future.clear();

        tracing::debug!(depth = self.state.past.len(), "history checkpoint");
        true
    }

    /// Drop the pending checkpoint. `present` keeps the uncommitted value.
    pub fn cancel_pending(&mut self) {
        if self.has_pending() {
            tracing::debug!("history checkpoint cancelled");
        }
        self.phase = Phase::Settled;
    }

    /// Replace the content wholesale, discarding past and future.
    ///
    /// Used for external restores (e.g. loading a saved draft); the
    /// replacement itself is not undoable.
    pub fn reset_history(&mut self, value: impl Into<String>) {
        let value = value.into();
        self.phase = Phase::Settled;
        self.committed = value.clone();
        self.state = HistoryState {
            present: value,
            ..Default::default()
        };
    }
}

impl UndoManager for HistoryManager {
    fn can_undo(&self) -> bool {
        !self.state.past.is_empty()
    }

    fn can_redo(&self) -> bool {
        !self.state.future.is_empty()
    }

    // A live edit is settled first so it lands on the redo stack rather
    // than committing after the undo has already moved `present`.
    fn undo(&mut self) -> bool {
        self.flush();
        let Some(previous) = self.state.past.pop_back() else {
            return false;
        };
        let current = std::mem::replace(&mut self.state.present, previous.clone());
        self.state.future.push_front(current);
        self.committed = previous;
        tracing::debug!(
            past = self.state.past.len(),
            future = self.state.future.len(),
            "undo"
        );
        true
    }

    fn redo(&mut self) -> bool {
        self.flush();
        let Some(next) = self.state.future.pop_front() else {
            return false;
        };
        let current = std::mem::replace(&mut self.state.present, next.clone());
        self.state.past.push_back(current);
        self.committed = next;
        tracing::debug!(
            past = self.state.past.len(),
            future = self.state.future.len(),
            "redo"
        );
        true
    }

    fn clear_history(&mut self) {
        let present = self.state.present.clone();
        self.reset_history(present);
    }
}
