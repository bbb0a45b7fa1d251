//! Terminal rendering of the deck and log view.

use std::io::{self, Write};

use deckwatch_core::OverlaySink;
use deckwatch_types::{Card, LogLine, TokenRole};
use tracing::warn;

const RESET: &str = "\x1b[0m";
const BOLD_YELLOW: &str = "\x1b[1;33m";
const CYAN: &str = "\x1b[36m";
const GREEN: &str = "\x1b[32m";

/// Writes deck tables and log lines to any writer, stdout in practice.
pub struct TerminalSink<W> {
    out: W,
    color: bool,
    write_failed: bool,
}

impl<W: Write + Send + 'static> TerminalSink<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self {
            out,
            color,
            write_failed: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Whether any write to the terminal has failed so far.
    pub fn write_failed(&self) -> bool {
        self.write_failed
    }

    fn write_text(&mut self, text: &str) {
        let result = self
            .out
            .write_all(text.as_bytes())
            .and_then(|()| self.out.flush());
        self.note_failure(result);
    }

    // Only the first failure is logged; a closed stdout fails on every write
    fn note_failure(&mut self, result: io::Result<()>) {
        if let Err(e) = result {
            if !self.write_failed {
                warn!(error = %e, "Failed to write to terminal");
            }
            self.write_failed = true;
        }
    }
}

impl<W: Write + Send + 'static> OverlaySink for TerminalSink<W> {
    fn render(&mut self, deck: &[Card]) {
        self.write_text(&format_deck(deck));
    }

    fn append_log_line(&mut self, line: LogLine) {
        let text = format!("{}\n", format_line(&line, self.color));
        self.write_text(&text);
    }
}

pub fn format_deck(deck: &[Card]) -> String {
    if deck.is_empty() {
        return "── deck (empty) ──\n".to_string();
    }

    let total: u32 = deck.iter().map(|c| c.count).sum();
    let mut out = format!("── deck ({total} cards) ──\n");
    for card in deck {
        out.push_str(&format!(
            "{:>3}  {:<28} x{}\n",
            card.cost, card.display_name, card.count
        ));
    }
    out
}

pub fn format_line(line: &LogLine, color: bool) -> String {
    if !color {
        let text = line.text();
        return if line.highlight {
            format!("* {text}")
        } else {
            text
        };
    }

    let body = line
        .spans
        .iter()
        .map(|span| match span.role {
            TokenRole::Verb => format!("{CYAN}{}{RESET}", span.text),
            TokenRole::RecognizedArg => format!("{GREEN}{}{RESET}", span.text),
            TokenRole::Plain => span.text.clone(),
        })
        .collect::<Vec<_>>()
        .join(" ");

    if line.highlight {
        format!("{BOLD_YELLOW}{body}{RESET}")
    } else {
        body
    }
}
