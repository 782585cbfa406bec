//! Host-side coordination of the markdown and plain-text buffers.
//!
//! Each buffer owns an independent [`HistoryManager`]. When one buffer
//! changes, the session derives the other's value and records it as a
//! separate checkpoint in the other history. The two undo stacks are not
//! forced to the same depth: undo in one view walks that view's history and
//! then re-derives the other buffer as an ordinary edit.

use web_time::Instant;

use crate::comment;
use crate::format::{FormatRegistry, insert_text};
use crate::history::{HistoryConfig, HistoryManager, UndoManager};
use crate::plain::{plain_text_to_markdown, to_plain_text};
use crate::types::{Insertion, SelectionRange, View};

/// Source of "now" for debounce deadlines.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Which buffer an operation lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Buffer {
    Markdown,
    PlainText,
}

impl From<View> for Buffer {
    fn from(view: View) -> Self {
        match view {
            View::Preview | View::Markdown => Buffer::Markdown,
            View::PlainText => Buffer::PlainText,
        }
    }
}

pub struct EditorSession<C: Clock = SystemClock> {
    view: View,
    markdown: HistoryManager,
    plain: HistoryManager,
    registry: FormatRegistry,
    clock: C,
}

impl EditorSession {
    pub fn new(markdown: impl Into<String>) -> Self {
        Self::with_clock(markdown, HistoryConfig::default(), SystemClock)
    }
}

impl<C: Clock> EditorSession<C> {
    pub fn with_clock(markdown: impl Into<String>, config: HistoryConfig, clock: C) -> Self {
        let markdown = markdown.into();
        let plain = to_plain_text(&markdown);
        Self {
            view: View::default(),
            markdown: HistoryManager::with_config(markdown, config),
            plain: HistoryManager::with_config(plain, config),
            registry: FormatRegistry::with_builtins(),
            clock,
        }
    }

    /// Swap in a registry with extra tokens.
    pub fn with_registry(mut self, registry: FormatRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn markdown(&self) -> &str {
        self.markdown.present()
    }

    pub fn plain_text(&self) -> &str {
        self.plain.present()
    }

    /// Markdown with comment spans removed, as rendered, exported and shared.
    pub fn public_markdown(&self) -> String {
        comment::strip(self.markdown())
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn markdown_history(&self) -> &HistoryManager {
        &self.markdown
    }

    pub fn plain_history(&self) -> &HistoryManager {
        &self.plain
    }

    /// Change the active view. Pending checkpoints in both buffers are
    /// dropped so nothing commits against a buffer the user has left.
    pub fn switch_view(&mut self, view: View) {
        if view == self.view {
            return;
        }
        self.markdown.cancel_pending();
        self.plain.cancel_pending();
        tracing::debug!(from = ?self.view, to = ?view, "switch view");
        self.view = view;
    }

    /// Typing in the markdown editor.
    pub fn edit_markdown(&mut self, text: impl Into<String>) {
        let text = text.into();
        let now = self.clock.now();
        self.plain.update_history_at(to_plain_text(&text), now);
        self.markdown.update_history_at(text, now);
    }

    /// Typing in the plain-text editor. Replaces the markdown verbatim,
    /// flattening whatever formatting it had.
    pub fn edit_plain_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        let now = self.clock.now();
        self.markdown.update_history_at(plain_text_to_markdown(&text), now);
        self.plain.update_history_at(text, now);
    }

    /// Apply a toolbar token to the active buffer.
    pub fn apply_format(&mut self, selection: SelectionRange, token: &str) -> Insertion {
        let buffer = Buffer::from(self.view);
        let insertion = self.registry.apply(self.text(buffer), selection, token);
        self.edit(buffer, insertion.text.clone());
        insertion
    }

    /// Replace the selection in the active buffer with literal text.
    pub fn insert_text(&mut self, selection: SelectionRange, text: &str) -> Insertion {
        let buffer = Buffer::from(self.view);
        let insertion = insert_text(self.text(buffer), selection, text);
        self.edit(buffer, insertion.text.clone());
        insertion
    }

    /// Replace the markdown wholesale as an undoable edit, whatever the
    /// active view (e.g. a proofread result).
    pub fn replace_markdown(&mut self, markdown: impl Into<String>) {
        self.edit_markdown(markdown);
    }

    /// Load saved content. Both histories start over from it.
    pub fn restore_draft(&mut self, markdown: impl Into<String>) {
        let markdown = markdown.into();
        self.plain.reset_history(to_plain_text(&markdown));
        self.markdown.reset_history(markdown);
        tracing::debug!("draft restored");
    }

    pub fn can_undo(&self) -> bool {
        self.history(Buffer::from(self.view)).can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history(Buffer::from(self.view)).can_redo()
    }

    /// Undo in the active view's history, then carry the result across.
    pub fn undo(&mut self) -> bool {
        let buffer = Buffer::from(self.view);
        if !self.history_mut(buffer).undo() {
            return false;
        }
        self.propagate(buffer);
        true
    }

    pub fn redo(&mut self) -> bool {
        let buffer = Buffer::from(self.view);
        if !self.history_mut(buffer).redo() {
            return false;
        }
        self.propagate(buffer);
        true
    }

    /// Commit any checkpoint whose window has closed by `now`.
    pub fn poll_at(&mut self, now: Instant) -> bool {
        let markdown = self.markdown.poll_at(now);
        let plain = self.plain.poll_at(now);
        markdown || plain
    }

    pub fn poll(&mut self) -> bool {
        self.poll_at(self.clock.now())
    }

    fn text(&self, buffer: Buffer) -> &str {
        self.history(buffer).present()
    }

    fn history(&self, buffer: Buffer) -> &HistoryManager {
        match buffer {
            Buffer::Markdown => &self.markdown,
            Buffer::PlainText => &self.plain,
        }
    }

    fn history_mut(&mut self, buffer: Buffer) -> &mut HistoryManager {
        match buffer {
            Buffer::Markdown => &mut self.markdown,
            Buffer::PlainText => &mut self.plain,
        }
    }

    fn edit(&mut self, buffer: Buffer, text: String) {
        match buffer {
            Buffer::Markdown => self.edit_markdown(text),
            Buffer::PlainText => self.edit_plain_text(text),
        }
    }

    // Push the value `source` now holds into the other buffer's history.
    fn propagate(&mut self, source: Buffer) {
        let now = self.clock.now();
        match source {
            Buffer::Markdown => {
                let derived = to_plain_text(self.markdown.present());
                self.plain.update_history_at(derived, now);
            }
            Buffer::PlainText => {
                let derived = plain_text_to_markdown(self.plain.present());
                self.markdown.update_history_at(derived, now);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use super::*;

    #[derive(Clone)]
    struct ManualClock(Arc<Mutex<Instant>>);

    impl ManualClock {
        fn new() -> Self {
            Self(Arc::new(Mutex::new(Instant::now())))
        }

        fn advance(&self, ms: u64) {
            *self.0.lock().unwrap() += Duration::from_millis(ms);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            *self.0.lock().unwrap()
        }
    }

    fn session(markdown: &str) -> (EditorSession<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let session = EditorSession::with_clock(markdown, HistoryConfig::default(), clock.clone());
        (session, clock)
    }

    fn settle(session: &mut EditorSession<ManualClock>, clock: &ManualClock) {
        clock.advance(600);
        session.poll();
    }

    #[test]
    fn starts_in_preview_with_derived_plain_text() {
        let (session, _) = session("# Title\n\n**bold**");
        assert_eq!(session.view(), View::Preview);
        assert_eq!(session.plain_text(), "Title\n\nbold");
        assert!(!session.can_undo());
    }

    #[test]
    fn markdown_edit_updates_both_buffers() {
        let (mut session, clock) = session("a");
        session.edit_markdown("*a* b");
        assert_eq!(session.markdown(), "*a* b");
        assert_eq!(session.plain_text(), "a b");

        settle(&mut session, &clock);
        assert!(session.markdown_history().can_undo());
        assert!(session.plain_history().can_undo());
    }

    #[test]
    fn plain_edit_flattens_markdown() {
        let (mut session, clock) = session("# Title\n\n**bold** body");
        session.switch_view(View::PlainText);
        session.edit_plain_text("Title\n\nbold body!");
        assert_eq!(session.markdown(), "Title\n\nbold body!");

        settle(&mut session, &clock);
        session.switch_view(View::Markdown);
        assert!(session.undo());
        assert_eq!(session.markdown(), "# Title\n\n**bold** body");
    }

    #[test]
    fn apply_format_targets_markdown_from_preview() {
        let (mut session, _) = session("hello world");
        let insertion = session.apply_format(SelectionRange::new(0, 5), "bold");
        assert_eq!(insertion.text, "**hello** world");
        assert_eq!(insertion.cursor, 9);
        assert_eq!(session.markdown(), "**hello** world");
        assert_eq!(session.plain_text(), "hello world");
    }

    #[test]
    fn comment_in_plain_view_wraps_selection() {
        let (mut session, _) = session("fix this");
        session.switch_view(View::PlainText);
        let insertion = session.apply_format(SelectionRange::new(4, 8), "comment");
        assert_eq!(insertion.text, "fix [[comment: this]]");
        assert_eq!(session.markdown(), "fix [[comment: this]]");
        assert_eq!(session.public_markdown(), "fix ");
    }

    #[test]
    fn insert_text_places_caret_after_emoji() {
        let (mut session, _) = session("hi ");
        let insertion = session.insert_text(SelectionRange::caret(3), "🎉");
        assert_eq!(insertion.text, "hi 🎉");
        assert_eq!(insertion.cursor, 5);
    }

    #[test]
    fn undo_rederives_the_other_buffer() {
        let (mut session, clock) = session("one");
        session.switch_view(View::Markdown);
        session.edit_markdown("**one** two");
        settle(&mut session, &clock);

        assert!(session.undo());
        assert_eq!(session.markdown(), "one");
        assert_eq!(session.plain_text(), "one");
        assert!(session.redo());
        assert_eq!(session.plain_text(), "one two");
    }

    #[test]
    fn histories_may_diverge_in_depth() {
        let (mut session, clock) = session("x");
        session.switch_view(View::Markdown);
        // Formatting-only change: the plain projection stays "x".
        session.edit_markdown("**x**");
        settle(&mut session, &clock);

        assert_eq!(session.markdown_history().state().past.len(), 1);
        assert!(session.plain_history().state().past.is_empty());
        session.switch_view(View::PlainText);
        assert!(!session.can_undo());
    }

    #[test]
    fn switch_view_drops_pending_checkpoints() {
        let (mut session, clock) = session("a");
        session.edit_markdown("ab");
        session.switch_view(View::PlainText);
        settle(&mut session, &clock);

        assert_eq!(session.markdown(), "ab");
        assert!(!session.markdown_history().can_undo());
        assert!(!session.plain_history().can_undo());
    }

    #[test]
    fn edit_after_undo_survives_view_round_trip_without_redo() {
        let (mut session, clock) = session("A");
        session.switch_view(View::Markdown);
        session.edit_markdown("AB");
        settle(&mut session, &clock);
        assert!(session.undo());
        assert!(session.can_redo());

        session.edit_markdown("AX");
        session.switch_view(View::PlainText);
        session.switch_view(View::Markdown);

        assert!(!session.can_redo());
        assert!(!session.redo());
        assert_eq!(session.markdown(), "AX");
        assert_eq!(session.plain_text(), "AX");
    }

    #[test]
    fn plain_view_undo_redo_rederives_markdown_as_pending_checkpoint() {
        let (mut session, clock) = session("**one**");
        session.switch_view(View::PlainText);
        session.edit_plain_text("one two");
        settle(&mut session, &clock);
        assert_eq!(session.markdown_history().state().past.len(), 1);
        assert_eq!(session.plain_history().state().past.len(), 1);

        assert!(session.undo());
        assert_eq!(session.plain_text(), "one");
        assert_eq!(session.markdown(), "one");
        assert!(session.markdown_history().has_pending());
        assert_eq!(session.markdown_history().state().past.len(), 1);
        assert!(session.can_redo());

        settle(&mut session, &clock);
        assert!(!session.markdown_history().has_pending());
        assert_eq!(session.markdown_history().state().past, ["**one**", "one two"]);

        assert!(session.redo());
        assert_eq!(session.plain_text(), "one two");
        assert_eq!(session.markdown(), "one two");
        assert!(session.markdown_history().has_pending());
        assert_eq!(session.markdown_history().state().past.len(), 2);
        assert!(!session.can_redo());

        settle(&mut session, &clock);
        assert_eq!(session.markdown_history().state().past.len(), 3);
    }

    #[test]
    fn restore_draft_resets_both_histories() {
        let (mut session, clock) = session("a");
        session.edit_markdown("ab");
        settle(&mut session, &clock);
        session.edit_markdown("abc");

        session.restore_draft("## Saved");
        assert_eq!(session.markdown(), "## Saved");
        assert_eq!(session.plain_text(), "Saved");
        assert!(!session.markdown_history().can_undo());
        assert!(!session.plain_history().can_undo());
        assert!(!session.poll_at(clock.now() + Duration::from_secs(5)));
    }

    #[test]
    fn replace_markdown_is_undoable() {
        let (mut session, clock) = session("teh draft");
        session.switch_view(View::PlainText);
        session.replace_markdown("the draft");
        settle(&mut session, &clock);

        session.switch_view(View::Markdown);
        assert!(session.undo());
        assert_eq!(session.markdown(), "teh draft");
    }
}
