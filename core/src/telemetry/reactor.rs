//! Match lifecycle and roster handling.
//!
//! - Idle: waiting for a match; roster updates rebuild the deck
//! - InMatch: a `match_start` batch was seen; the deck at that moment is the
//!   active deck
//!
//! There is no transition back to Idle here. The hosting session ends instead.

use deckwatch_types::Card;
use tracing::{debug, info, warn};

use super::{EventBatch, InfoUpdate, MATCH_START, Subscription};
use crate::catalog::CardCatalog;
use crate::deck::{CardResolver, DeckModel, parse_roster};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchLifecycle {
    #[default]
    Idle,
    InMatch,
}

#[derive(Debug, Default)]
pub struct TelemetryReactor {
    subscription: Subscription,
    lifecycle: MatchLifecycle,
    active_deck: Option<Vec<Card>>,
}

impl TelemetryReactor {
    pub fn new(subscription: Subscription) -> Self {
        Self {
            subscription,
            lifecycle: MatchLifecycle::Idle,
            active_deck: None,
        }
    }

    pub fn subscription(&self) -> &Subscription {
        &self.subscription
    }

    pub fn lifecycle(&self) -> MatchLifecycle {
        self.lifecycle
    }

    /// Deck published at match start, kept current while its rebuild settles.
    pub fn active_deck(&self) -> Option<&[Card]> {
        self.active_deck.as_deref()
    }

    /// Rebuild the deck if the update carries a roster.
    ///
    /// Returns the generation of the rebuild that was started.
    pub fn on_info_update<C: CardCatalog>(
        &mut self,
        update: &InfoUpdate,
        deck: &mut DeckModel,
        resolver: &CardResolver<C>,
    ) -> Option<u64> {
        if !self.subscription.accepts(update.feature()) {
            debug!(feature = ?update.feature(), "Ignoring unsubscribed info update");
            return None;
        }

        let decks = update.decks()?;
        let (entries, errors) = parse_roster(decks);
        for err in &errors {
            warn!(error = %err, "Skipping malformed roster data");
        }

        // Nothing usable: keep the current deck rather than wiping it
        if entries.is_empty() && !errors.is_empty() {
            return None;
        }

        Some(deck.rebuild_from(entries, resolver))
    }

    /// Inspect the first event of a batch. On `match_start`, enter the match
    /// and return the deck to present.
    pub fn on_event_batch(&mut self, batch: &EventBatch, deck: &DeckModel) -> Option<&[Card]> {
        let Some(name) = batch.first_name() else {
            debug!("Ignoring empty event batch");
            return None;
        };

        if name != MATCH_START {
            return None;
        }

        if self.lifecycle == MatchLifecycle::Idle {
            info!(cards = deck.len(), pending = deck.pending(), "Match started");
        }
        self.lifecycle = MatchLifecycle::InMatch;
        self.active_deck = Some(deck.snapshot());
        self.active_deck.as_deref()
    }

    /// Follow late card resolutions into the active deck while in a match.
    pub fn refresh_active_deck(&mut self, deck: &DeckModel) -> Option<&[Card]> {
        if self.lifecycle != MatchLifecycle::InMatch {
            return None;
        }
        self.active_deck = Some(deck.snapshot());
        self.active_deck.as_deref()
    }
}
