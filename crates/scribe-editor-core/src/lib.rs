//! scribe-editor-core: text transformation and history for a markdown editor.
//!
//! This crate provides:
//! - `comment` - the `[[comment: ...]]` private-note sublanguage
//! - `FormatRegistry` - toolbar token insertion with caret placement
//! - `plain` - the lossy markdown to plain-text projection
//! - `toc` - heading extraction and `{{TOC}}` injection for HTML and markdown
//! - `HistoryManager` - debounced undo/redo over one buffer
//! - `EditorSession` - two linked buffers with their own histories
//!
//! All offsets at the API boundary are UTF-16 code units.

pub mod comment;
pub mod debounce;
pub mod error;
pub mod escape;
pub mod format;
pub mod history;
pub mod offsets;
pub mod plain;
pub mod session;
pub mod toc;
pub mod types;

pub use debounce::DebouncedHistory;
pub use error::EditorError;
pub use format::{
    FormatRegistry, Resolved, Strategy, TOC_PLACEHOLDER, insert_format, insert_text,
    try_insert_format,
};
pub use history::{
    DEBOUNCE_WINDOW, HistoryConfig, HistoryManager, HistoryState, MAX_HISTORY, Phase, UndoManager,
};
pub use plain::{plain_text_to_markdown, to_plain_text};
pub use session::{Clock, EditorSession, SystemClock};
pub use smol_str::SmolStr;
pub use toc::{HtmlHeadings, TocItem};
pub use types::{Insertion, SelectionRange, View};
