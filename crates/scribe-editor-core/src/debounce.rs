//! Timer-driven checkpointing for a [`HistoryManager`] on a tokio runtime.
//!
//! Every update aborts the pending commit task and spawns a fresh one, so at
//! most one timer is ever outstanding. A generation counter guards the race
//! where a task has already woken and is waiting on the lock when it is
//! superseded.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::history::{HistoryConfig, HistoryManager, HistoryState, UndoManager};

struct Shared {
    history: HistoryManager,
    generation: u64,
}

/// A history whose checkpoints commit on their own after the quiet period.
///
/// Methods that schedule work must be called from within a tokio runtime.
pub struct DebouncedHistory {
    shared: Arc<Mutex<Shared>>,
    window: Duration,
    task: Option<JoinHandle<()>>,
}

impl DebouncedHistory {
    pub fn new(initial: impl Into<String>) -> Self {
        Self::with_config(initial, HistoryConfig::default())
    }

    pub fn with_config(initial: impl Into<String>, config: HistoryConfig) -> Self {
        Self {
            shared: Arc::new(Mutex::new(Shared {
                history: HistoryManager::with_config(initial, config),
                generation: 0,
            })),
            window: config.debounce,
            task: None,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // Abort the outstanding task, invalidate any wake-up already in flight,
    // then run `f` under the lock. Returns the new generation.
    fn supersede<R>(&mut self, f: impl FnOnce(&mut HistoryManager) -> R) -> (u64, R) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        let mut shared = self.shared.lock().unwrap_or_else(PoisonError::into_inner);
        shared.generation += 1;
        let result = f(&mut shared.history);
        (shared.generation, result)
    }

    /// Record a new value and (re)start the quiet-period timer.
    pub fn update(&mut self, value: impl Into<String>) {
        let (generation, ()) = self.supersede(|history| history.update_history(value));

        let shared = Arc::clone(&self.shared);
        let window = self.window;
        self.task = Some(tokio::spawn(async move {
            tokio::time::sleep(window).await;
            let mut shared = shared.lock().unwrap_or_else(PoisonError::into_inner);
            if shared.generation != generation {
                tracing::trace!(generation, "stale checkpoint wake-up");
                return;
            }
            shared.history.flush();
        }));
    }

    /// Drop the pending checkpoint without committing it.
    pub fn cancel(&mut self) {
        self.supersede(HistoryManager::cancel_pending);
    }

    /// Commit the pending checkpoint now.
    pub fn flush(&mut self) -> bool {
        self.supersede(HistoryManager::flush).1
    }

    pub fn undo(&mut self) -> bool {
        self.supersede(|history| history.undo()).1
    }

    pub fn redo(&mut self) -> bool {
        self.supersede(|history| history.redo()).1
    }

    /// Replace the content and discard all history.
    pub fn reset(&mut self, value: impl Into<String>) {
        self.supersede(|history| history.reset_history(value));
    }

    pub fn present(&self) -> String {
        self.lock().history.present().to_string()
    }

    pub fn can_undo(&self) -> bool {
        self.lock().history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.lock().history.can_redo()
    }

    pub fn has_pending(&self) -> bool {
        self.lock().history.has_pending()
    }

    pub fn state(&self) -> HistoryState {
        self.lock().history.state().clone()
    }
}

impl Drop for DebouncedHistory {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
