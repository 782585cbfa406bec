//! Drive an [`EditorSession`] from a recorded event log.
//!
//! The log is JSON lines, one event per line, e.g.
//!
//! ```text
//! {"op": "edit_markdown", "text": "# Draft"}
//! {"op": "wait", "ms": 600}
//! {"op": "format", "token": "bold", "start": 2, "end": 7}
//! {"op": "undo"}
//! ```
//!
//! Time only moves on `wait`, so a replay is deterministic.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use miette::{IntoDiagnostic, Result, WrapErr};
use scribe_editor_core::{Clock, EditorSession, HistoryConfig, SelectionRange, View};
use serde::{Deserialize, Serialize};
use web_time::Instant;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ReplayEvent {
    View {
        view: View,
    },
    EditMarkdown {
        text: String,
    },
    EditPlainText {
        text: String,
    },
    Format {
        token: String,
        start: usize,
        end: Option<usize>,
    },
    Insert {
        text: String,
        start: usize,
        end: Option<usize>,
    },
    Replace {
        text: String,
    },
    Restore {
        text: String,
    },
    Undo,
    Redo,
    Wait {
        ms: u64,
    },
}

/// Session state after the last event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplayOutcome {
    pub view: View,
    pub markdown: String,
    pub plain_text: String,
    pub cursor: Option<usize>,
    pub can_undo: bool,
    pub can_redo: bool,
}

#[derive(Clone)]
struct ReplayClock(Rc<Cell<Instant>>);

impl Clock for ReplayClock {
    fn now(&self) -> Instant {
        self.0.get()
    }
}

pub fn parse_log(log: &str) -> Result<Vec<ReplayEvent>> {
    log.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str(line)
                .into_diagnostic()
                .wrap_err_with(|| format!("invalid replay event on line {}", index + 1))
        })
        .collect()
}

pub fn replay(initial: &str, events: &[ReplayEvent], config: HistoryConfig) -> ReplayOutcome {
    let time = Rc::new(Cell::new(Instant::now()));
    let mut session = EditorSession::with_clock(initial, config, ReplayClock(Rc::clone(&time)));
    let mut cursor = None;

    for event in events {
        tracing::trace!(?event, "replay");
        match event {
            ReplayEvent::View { view } => session.switch_view(*view),
            ReplayEvent::EditMarkdown { text } => session.edit_markdown(text.as_str()),
            ReplayEvent::EditPlainText { text } => session.edit_plain_text(text.as_str()),
            ReplayEvent::Format { token, start, end } => {
                let selection = SelectionRange::new(*start, end.unwrap_or(*start));
                cursor = Some(session.apply_format(selection, token).cursor);
            }
            ReplayEvent::Insert { text, start, end } => {
                let selection = SelectionRange::new(*start, end.unwrap_or(*start));
                cursor = Some(session.insert_text(selection, text).cursor);
            }
            ReplayEvent::Replace { text } => session.replace_markdown(text.as_str()),
            ReplayEvent::Restore { text } => session.restore_draft(text.as_str()),
            ReplayEvent::Undo => {
                session.undo();
            }
            ReplayEvent::Redo => {
                session.redo();
            }
            ReplayEvent::Wait { ms } => {
                time.set(time.get() + Duration::from_millis(*ms));
                session.poll();
            }
        }
    }

    ReplayOutcome {
        view: session.view(),
        markdown: session.markdown().to_string(),
        plain_text: session.plain_text().to_string(),
        cursor,
        can_undo: session.can_undo(),
        can_redo: session.can_redo(),
    }
}
