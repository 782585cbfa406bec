//! Markdown format insertion.
//!
//! A format token names a transformation of the selected text. Tokens are
//! data: each registered token maps to one of a small closed set of
//! [`Strategy`] values, and every strategy is implemented once in
//! [`Strategy::render`]. Two token shapes are resolved outside the table:
//! `social-<platform>::<url>` is parameterized by its payload, and any token
//! the registry does not know passes the selection through unchanged.

use std::collections::HashMap;
use std::sync::LazyLock;

use smol_str::{SmolStr, format_smolstr};

use crate::comment::{self, COMMENT_OPEN};
use crate::error::EditorError;
use crate::offsets::{byte_to_utf16, utf16_len, utf16_to_byte};
use crate::types::{Insertion, SelectionRange};

/// Delimiter between a parameterized token and its payload.
pub const PAYLOAD_DELIMITER: &str = "::";

/// Prefix of the parameterized social-icon token.
pub const SOCIAL_PREFIX: &str = "social-";

/// Placeholder the table-of-contents engine replaces at render/export time.
pub const TOC_PLACEHOLDER: &str = "{{TOC}}";

const LINK_TAIL: &str = "](url)";

const TABLE_TEMPLATE: &str = "\n\n| Column 1 | Column 2 |\n| :--- | :--- |\n| Row 1, Cell 1 | Row 1, Cell 2 |\n| Row 2, Cell 1 | Row 2, Cell 2 |\n\n";

/// LLM providers with an `llm-<id>` token, as `(id, display name)`.
pub const LLM_PROVIDERS: &[(&str, &str)] = &[
    ("gemini", "Gemini"),
    ("chatgpt", "ChatGPT"),
    ("claude", "Claude"),
    ("perplexity", "Perplexity"),
    ("mistral", "Mistral"),
    ("groq", "Groq"),
    ("deepseek", "DeepSeek"),
    ("ollama", "Ollama"),
    ("anthropic", "Anthropic"),
];

const BADGES: &[(&str, &str)] = &[
    (
        "mit",
        "[![License: MIT](https://img.shields.io/badge/License-MIT-blue.svg)](/LICENSE)",
    ),
    (
        "apache",
        "[![License: Apache 2.0](https://img.shields.io/badge/License-Apache%202.0-blue.svg)](/LICENSE)",
    ),
    (
        "gpl",
        "[![License: GPL v3](https://img.shields.io/badge/License-GPLv3-blue.svg)](/LICENSE)",
    ),
    (
        "coc",
        "[![Code of Conduct](https://img.shields.io/badge/Contributor%20Covenant-2.1-4baaaa.svg)](/CODE_OF_CONDUCT.md)",
    ),
    (
        "contributing",
        "[![Contributing](https://img.shields.io/badge/Contributions-Welcome-brightgreen.svg)](/CONTRIBUTING.md)",
    ),
    (
        "build",
        "[![Build Status](https://img.shields.io/badge/build-passing-brightgreen.svg)](#)",
    ),
    (
        "coverage",
        "[![Coverage](https://img.shields.io/badge/coverage-95%25-brightgreen.svg)](#)",
    ),
    (
        "version",
        "[![Version](https://img.shields.io/badge/version-1.0.0-blue.svg)](#)",
    ),
    (
        "react",
        "![React](https://img.shields.io/badge/React-20232A?style=flat&logo=react&logoColor=61DAFB)",
    ),
    (
        "typescript",
        "![TypeScript](https://img.shields.io/badge/TypeScript-007ACC?style=flat&logo=typescript&logoColor=white)",
    ),
    (
        "javascript",
        "![JavaScript](https://img.shields.io/badge/JavaScript-F7DF1E?style=flat&logo=javascript&logoColor=black)",
    ),
    (
        "vite",
        "![Vite](https://img.shields.io/badge/Vite-646CFF?style=flat&logo=vite&logoColor=white)",
    ),
    (
        "tailwind",
        "![Tailwind CSS](https://img.shields.io/badge/Tailwind_CSS-38B2AC?style=flat&logo=tailwind-css&logoColor=white)",
    ),
    (
        "nodejs",
        "![Node.js](https://img.shields.io/badge/Node.js-339933?style=flat&logo=node.js&logoColor=white)",
    ),
    (
        "vue",
        "![Vue.js](https://img.shields.io/badge/Vue.js-4FC08D?style=flat&logo=vue.js&logoColor=white)",
    ),
    (
        "angular",
        "![Angular](https://img.shields.io/badge/Angular-DD0031?style=flat&logo=angular&logoColor=white)",
    ),
    (
        "svelte",
        "![Svelte](https://img.shields.io/badge/Svelte-FF3E00?style=flat&logo=svelte&logoColor=white)",
    ),
    (
        "nextjs",
        "![Next.js](https://img.shields.io/badge/Next.js-000000?style=flat&logo=next.js&logoColor=white)",
    ),
    (
        "webpack",
        "![Webpack](https://img.shields.io/badge/Webpack-8DD6F9?style=flat&logo=webpack&logoColor=black)",
    ),
    (
        "npm",
        "![npm](https://img.shields.io/badge/npm-CB3837?style=flat&logo=npm&logoColor=white)",
    ),
    (
        "yarn",
        "![Yarn](https://img.shields.io/badge/Yarn-2C8EBB?style=flat&logo=yarn&logoColor=white)",
    ),
    (
        "pnpm",
        "![pnpm](https://img.shields.io/badge/pnpm-F69220?style=flat&logo=pnpm&logoColor=white)",
    ),
    (
        "supabase",
        "![Supabase](https://img.shields.io/badge/Supabase-3ECF8E?style=flat&logo=supabase&logoColor=white)",
    ),
    (
        "postgresql",
        "![PostgreSQL](https://img.shields.io/badge/PostgreSQL-316192?style=flat&logo=postgresql&logoColor=white)",
    ),
    (
        "mongodb",
        "![MongoDB](https://img.shields.io/badge/MongoDB-47A248?style=flat&logo=mongodb&logoColor=white)",
    ),
    (
        "express",
        "![Express](https://img.shields.io/badge/Express-000000?style=flat&logo=express&logoColor=white)",
    ),
    (
        "bootstrap",
        "![Bootstrap](https://img.shields.io/badge/Bootstrap-7952B3?style=flat&logo=bootstrap&logoColor=white)",
    ),
    (
        "sass",
        "![Sass](https://img.shields.io/badge/Sass-CC6699?style=flat&logo=sass&logoColor=white)",
    ),
];

/// How a registered token transforms the selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    /// `open + (selection | placeholder) + close`. With a selection the caret
    /// lands after the span, otherwise right after `open`.
    Wrap {
        open: SmolStr,
        close: SmolStr,
        placeholder: SmolStr,
    },
    /// `prefix + (selection | placeholder)`. With a selection the caret lands
    /// after the text, otherwise right after `prefix`.
    LinePrefix { prefix: SmolStr, placeholder: SmolStr },
    /// `open + (selection | placeholder) + "](url)"`. With a selection the
    /// caret lands on the url placeholder, otherwise right after `open`.
    Link { open: SmolStr, placeholder: SmolStr },
    /// Fixed structural template, selection discarded, caret at the end.
    Block(SmolStr),
    /// Fixed badge or icon snippet, selection discarded, caret at the end.
    Snippet(SmolStr),
    /// Private comment: wraps the selection or inserts the template. The
    /// caret always lands just after the opening marker.
    Comment,
}

impl Strategy {
    pub fn wrap(open: &str, close: &str, placeholder: &str) -> Self {
        Self::Wrap {
            open: open.into(),
            close: close.into(),
            placeholder: placeholder.into(),
        }
    }

    pub fn line_prefix(prefix: &str, placeholder: &str) -> Self {
        Self::LinePrefix {
            prefix: prefix.into(),
            placeholder: placeholder.into(),
        }
    }

    pub fn link(open: &str, placeholder: &str) -> Self {
        Self::Link {
            open: open.into(),
            placeholder: placeholder.into(),
        }
    }

    /// Produce the inserted text and the caret offset relative to the
    /// selection start, in UTF-16 units.
    pub fn render(&self, selected: &str) -> (String, usize) {
        let has_selection = !selected.is_empty();
        match self {
            Strategy::Wrap {
                open,
                close,
                placeholder,
            } => {
                let body = if has_selection { selected } else { placeholder.as_str() };
                let text = format!("{open}{body}{close}");
                let cursor = if has_selection {
                    utf16_len(&text)
                } else {
                    utf16_len(open)
                };
                (text, cursor)
            }
            Strategy::LinePrefix {
                prefix,
                placeholder,
            } => {
                let body = if has_selection { selected } else { placeholder.as_str() };
                let text = format!("{prefix}{body}");
                let cursor = if has_selection {
                    utf16_len(&text)
                } else {
                    utf16_len(prefix)
                };
                (text, cursor)
            }
            Strategy::Link { open, placeholder } => {
                let body = if has_selection { selected } else { placeholder.as_str() };
                let text = format!("{open}{body}{LINK_TAIL}");
                let cursor = if has_selection {
                    utf16_len(&text) - 4
                } else {
                    utf16_len(open)
                };
                (text, cursor)
            }
            Strategy::Block(body) | Strategy::Snippet(body) => {
                (body.to_string(), utf16_len(body))
            }
            Strategy::Comment => {
                let text = if has_selection {
                    comment::wrap(selected)
                } else {
                    comment::template().to_string()
                };
                (text, utf16_len(COMMENT_OPEN))
            }
        }
    }
}

/// How a token resolved against a registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved<'a> {
    Registered(&'a Strategy),
    Social { platform: &'a str, url: &'a str },
    Identity,
}

/// Token table mapping format tokens to insertion strategies.
#[derive(Debug, Clone, Default)]
pub struct FormatRegistry {
    entries: HashMap<SmolStr, Strategy>,
}

static BUILTIN: LazyLock<FormatRegistry> = LazyLock::new(FormatRegistry::with_builtins);

impl FormatRegistry {
    /// A registry with no tokens; everything but `social-` tokens is identity.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The shared registry holding the editor's toolbar vocabulary.
    pub fn builtin() -> &'static FormatRegistry {
        &BUILTIN
    }

    /// An owned copy of the toolbar vocabulary, for extending.
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();

        registry.register("h1", Strategy::line_prefix("# ", "Heading 1"));
        registry.register("h2", Strategy::line_prefix("## ", "Heading 2"));
        registry.register("h3", Strategy::line_prefix("### ", "Heading 3"));
        registry.register("quote", Strategy::line_prefix("> ", "quote"));
        registry.register("ul", Strategy::line_prefix("- ", "list item"));
        registry.register("ol", Strategy::line_prefix("1. ", "list item"));

        registry.register("bold", Strategy::wrap("**", "**", "bold text"));
        registry.register("italic", Strategy::wrap("*", "*", "italic text"));
        registry.register(
            "strikethrough",
            Strategy::wrap("~~", "~~", "strikethrough"),
        );
        registry.register("code", Strategy::wrap("`", "`", "code"));
        registry.register(
            "center",
            Strategy::wrap("<div align=\"center\">\n", "\n</div>", ""),
        );

        registry.register("link", Strategy::link("[", "link text"));
        registry.register("image", Strategy::link("![", "alt text"));

        registry.register("table", Strategy::Block(TABLE_TEMPLATE.into()));
        registry.register("toc", Strategy::Block(TOC_PLACEHOLDER.into()));
        registry.register("comment", Strategy::Comment);

        for (id, name) in LLM_PROVIDERS {
            registry.register(
                format_smolstr!("llm-{id}"),
                Strategy::Snippet(format_smolstr!("![{name}](llm-icon://{id})")),
            );
        }
        for (id, snippet) in BADGES {
            registry.register(format_smolstr!("badge-{id}"), Strategy::Snippet((*snippet).into()));
        }

        registry
    }

    /// Add or replace a token, returning the strategy it displaced.
    pub fn register(&mut self, token: impl Into<SmolStr>, strategy: Strategy) -> Option<Strategy> {
        self.entries.insert(token.into(), strategy)
    }

    pub fn lookup(&self, token: &str) -> Option<&Strategy> {
        self.entries.get(token)
    }

    /// Registered tokens, sorted.
    pub fn tokens(&self) -> Vec<&str> {
        let mut tokens: Vec<&str> = self.entries.keys().map(SmolStr::as_str).collect();
        tokens.sort_unstable();
        tokens
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve a token: exact registry match first, then the `social-`
    /// prefix, then identity.
    pub fn resolve<'a>(&'a self, token: &'a str) -> Resolved<'a> {
        if let Some(strategy) = self.lookup(token) {
            return Resolved::Registered(strategy);
        }
        if token.starts_with(SOCIAL_PREFIX) {
            let parts: Vec<&str> = token.split(PAYLOAD_DELIMITER).collect();
            if let [head, url] = parts[..] {
                let platform = head.strip_prefix(SOCIAL_PREFIX).unwrap_or(head);
                return Resolved::Social { platform, url };
            }
            tracing::debug!(token, "malformed social token, passing selection through");
            return Resolved::Identity;
        }
        tracing::debug!(token, "unknown format token, passing selection through");
        Resolved::Identity
    }

    /// Apply `token` to `buffer` at `selection`.
    ///
    /// Total over its input: the selection is normalized and clamped, and
    /// unrecognized or malformed tokens leave the buffer unchanged.
    pub fn apply(&self, buffer: &str, selection: SelectionRange, token: &str) -> Insertion {
        let selection = selection.clamp(utf16_len(buffer));
        let start = utf16_to_byte(buffer, selection.start);
        let end = utf16_to_byte(buffer, selection.end).max(start);

        let before = &buffer[..start];
        let selected = &buffer[start..end];
        let after = &buffer[end..];

        let (insert, offset) = match self.resolve(token) {
            Resolved::Registered(strategy) => strategy.render(selected),
            Resolved::Social { platform, url } => {
                let text = format!("[![{platform}](social-icon://{platform})]({url})");
                let offset = utf16_len(&text);
                (text, offset)
            }
            Resolved::Identity => (selected.to_string(), utf16_len(selected)),
        };

        let mut text = String::with_capacity(before.len() + insert.len() + after.len());
        text.push_str(before);
        text.push_str(&insert);
        text.push_str(after);

        Insertion {
            cursor: byte_to_utf16(buffer, start) + offset,
            text,
        }
    }
}

/// Apply a format token with the built-in registry.
pub fn insert_format(buffer: &str, selection: SelectionRange, token: &str) -> Insertion {
    FormatRegistry::builtin().apply(buffer, selection, token)
}

/// Like [`insert_format`], but rejects a malformed selection instead of
/// clamping it.
pub fn try_insert_format(
    buffer: &str,
    selection: SelectionRange,
    token: &str,
) -> Result<Insertion, EditorError> {
    let selection = selection.validate(utf16_len(buffer))?;
    Ok(insert_format(buffer, selection, token))
}

/// Replace the selection with literal text, caret after it.
pub fn insert_text(buffer: &str, selection: SelectionRange, text: &str) -> Insertion {
    let selection = selection.clamp(utf16_len(buffer));
    let start = utf16_to_byte(buffer, selection.start);
    let end = utf16_to_byte(buffer, selection.end).max(start);

    Insertion {
        text: format!("{}{}{}", &buffer[..start], text, &buffer[end..]),
        cursor: byte_to_utf16(buffer, start) + utf16_len(text),
    }
}
