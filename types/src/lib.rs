//! Shared types for deckwatch.
//!
//! Everything here is plain data: the engine in `deckwatch-core` produces it and
//! front ends consume it for rendering.

pub mod card;
pub mod config;
pub mod console;

pub use card::Card;
pub use config::AppConfig;
pub use console::{LogLine, LogSpan, TokenRole};
