use deckwatch_types::{Card, LogSpan, TokenRole};

use super::distance::distance;
use super::{Command, CommandError, Outcome, Verb};
use crate::deck::DeckModel;

/// Parses console lines and applies them to a deck.
///
/// Holds no state beyond the fixed grammar in [`Verb`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandInterpreter;

impl CommandInterpreter {
    pub fn new() -> Self {
        Self
    }

    /// Tokenize and validate a line. `Ok(None)` for a blank line.
    ///
    /// For `add`, every token between the subject and the trailing cost is
    /// part of the card name.
    pub fn parse(&self, line: &str) -> Result<Option<Command>, CommandError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some((&first, args)) = tokens.split_first() else {
            return Ok(None);
        };

        let verb = Verb::parse(first).ok_or_else(|| CommandError::UnknownVerb {
            input: first.to_string(),
            suggestion: self.suggest(first),
        })?;

        if args.len() < verb.min_args() {
            return Err(CommandError::MissingArguments {
                verb,
                expected: verb.min_args(),
                found: args.len(),
            });
        }

        if args[0] != verb.subject() {
            return Err(CommandError::InvalidArgument {
                verb,
                expected: verb.subject(),
                found: args[0].to_string(),
            });
        }

        let args = match verb {
            Verb::Add => {
                let Some((cost, name)) = args[1..].split_last() else {
                    return Err(CommandError::MissingArguments {
                        verb,
                        expected: verb.min_args(),
                        found: args.len(),
                    });
                };
                parse_cost(cost)?;
                vec![args[0].to_string(), name.join(" "), cost.to_string()]
            }
            Verb::Clear => vec![args[0].to_string()],
        };

        Ok(Some(Command { verb, args }))
    }

    /// Interpret one line against `deck`.
    pub fn parse_and_execute(&self, line: &str, deck: &mut DeckModel) -> Outcome {
        match self.parse(line) {
            Ok(Some(command)) => self.execute(command, deck),
            Ok(None) => Outcome::Blank,
            Err(err) => Outcome::Rejected(err),
        }
    }

    fn execute(&self, command: Command, deck: &mut DeckModel) -> Outcome {
        match command.verb {
            Verb::Add => {
                let name = &command.args[1];
                let cost = match parse_cost(&command.args[2]) {
                    Ok(cost) => cost,
                    Err(err) => return Outcome::Rejected(err),
                };
                deck.upsert(Card::named(name.as_str(), cost));
                Outcome::Executed(format!("Added {name} ({cost}) to deck"))
            }
            Verb::Clear => {
                let removed = deck.len();
                deck.clear();
                Outcome::Executed(format!("Cleared deck ({removed} cards removed)"))
            }
        }
    }

    /// Closest known verb to `input`; ties go to the earlier verb in [`Verb::ALL`].
    pub fn suggest(&self, input: &str) -> Verb {
        let mut best = Verb::ALL[0];
        let mut best_distance = usize::MAX;
        for verb in Verb::ALL {
            let d = distance(input, verb.as_str());
            if d < best_distance {
                best = verb;
                best_distance = d;
            }
        }
        best
    }

    /// Tag each token of `line` with the role it plays in the grammar.
    pub fn tag_tokens(&self, line: &str) -> Vec<LogSpan> {
        let mut verb = None;
        line.split_whitespace()
            .enumerate()
            .map(|(idx, token)| {
                let role = match idx {
                    0 => {
                        verb = Verb::parse(token);
                        if verb.is_some() {
                            TokenRole::Verb
                        } else {
                            TokenRole::Plain
                        }
                    }
                    1 if verb.is_some_and(|v| v.subject() == token) => TokenRole::RecognizedArg,
                    _ => TokenRole::Plain,
                };
                LogSpan::new(role, token)
            })
            .collect()
    }
}

fn parse_cost(token: &str) -> Result<u32, CommandError> {
    token.parse().map_err(|_| CommandError::InvalidArgument {
        verb: Verb::Add,
        expected: "a whole, non-negative cost",
        found: token.to_string(),
    })
}
