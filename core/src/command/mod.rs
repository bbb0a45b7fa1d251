//! Console command interpreter
//!
//! Grammar (whitespace separated, no quoting):
//!
//! ```text
//! add card <name...> <cost>
//! clear deck
//! ```
//!
//! Unknown verbs are answered with the closest known verb by edit distance.

pub mod distance;
mod interpreter;

use thiserror::Error;

pub use interpreter::CommandInterpreter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Add,
    Clear,
}

impl Verb {
    /// Suggestion ties go to the earlier verb in this list.
    pub const ALL: [Verb; 2] = [Verb::Add, Verb::Clear];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Clear => "clear",
        }
    }

    pub fn parse(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.as_str() == token)
    }

    /// The subject keyword every use of this verb starts with.
    pub fn subject(self) -> &'static str {
        match self {
            Self::Add => "card",
            Self::Clear => "deck",
        }
    }

    /// Minimum number of argument tokens after the verb.
    pub fn min_args(self) -> usize {
        match self {
            Self::Add => 3,
            Self::Clear => 1,
        }
    }

    pub fn usage(self) -> &'static str {
        match self {
            Self::Add => "add card <name> <cost>",
            Self::Clear => "clear deck",
        }
    }
}

impl std::fmt::Display for Verb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated command, alive for one interpretation cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub verb: Verb,
    pub args: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("missing arguments for '{verb}': expected {expected}, got {found} (usage: {})", .verb.usage())]
    MissingArguments {
        verb: Verb,
        expected: usize,
        found: usize,
    },
    #[error("invalid argument '{found}' for '{verb}': expected {expected}")]
    InvalidArgument {
        verb: Verb,
        expected: &'static str,
        found: String,
    },
    #[error("unknown command '{input}', did you mean '{suggestion}'?")]
    UnknownVerb { input: String, suggestion: Verb },
}

/// Result of interpreting one console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Executed(String),
    Rejected(CommandError),
    /// Nothing but whitespace was submitted.
    Blank,
}

impl Outcome {
    pub fn is_executed(&self) -> bool {
        matches!(self, Self::Executed(_))
    }

    /// Feedback line for the console, if any.
    pub fn message(&self) -> Option<String> {
        match self {
            Self::Executed(msg) => Some(msg.clone()),
            Self::Rejected(err) => Some(err.to_string()),
            Self::Blank => None,
        }
    }
}
