//! Console and log-view line types.
//!
//! Styling is up to the renderer; the engine only tags each span with the
//! role it played in the submitted command.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenRole {
    Verb,
    RecognizedArg,
    Plain,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogSpan {
    pub role: TokenRole,
    pub text: String,
}

impl LogSpan {
    pub fn new(role: TokenRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(TokenRole::Plain, text)
    }
}

/// A line appended to the log view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogLine {
    pub spans: Vec<LogSpan>,
    pub highlight: bool,
}

impl LogLine {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            spans: vec![LogSpan::plain(text)],
            highlight: false,
        }
    }

    pub fn highlighted(text: impl Into<String>) -> Self {
        Self {
            spans: vec![LogSpan::plain(text)],
            highlight: true,
        }
    }

    pub fn from_spans(spans: Vec<LogSpan>) -> Self {
        Self {
            spans,
            highlight: false,
        }
    }

    /// Spans joined with single spaces.
    pub fn text(&self) -> String {
        self.spans
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
