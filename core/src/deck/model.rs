use std::sync::Arc;

use deckwatch_types::Card;
use tokio::sync::mpsc;
use tracing::{debug, info};

use super::roster::{RosterCard, RosterEntry};
use crate::catalog::{CardCatalog, CardRecord, LookupError};
use crate::error::EngineError;

/// Completion of one card lookup, tagged with the rebuild that issued it.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub generation: u64,
    pub card_id: String,
    pub count: u32,
    pub result: Result<CardRecord, LookupError>,
}

/// A shared catalog plus the channel lookup completions are delivered on.
pub struct CardResolver<C> {
    catalog: Arc<C>,
    completions: mpsc::Sender<Resolution>,
}

impl<C> Clone for CardResolver<C> {
    fn clone(&self) -> Self {
        Self {
            catalog: Arc::clone(&self.catalog),
            completions: self.completions.clone(),
        }
    }
}

impl<C: CardCatalog> CardResolver<C> {
    pub fn new(catalog: Arc<C>, completions: mpsc::Sender<Resolution>) -> Self {
        Self {
            catalog,
            completions,
        }
    }

    /// Create a resolver and the receiving end of its completion channel.
    pub fn channel(catalog: Arc<C>, buffer: usize) -> (Self, mpsc::Receiver<Resolution>) {
        let (tx, rx) = mpsc::channel(buffer);
        (Self::new(catalog, tx), rx)
    }

    /// Look up one roster card on its own task. Must be called inside a tokio runtime.
    fn spawn_lookup(&self, generation: u64, card: RosterCard) {
        let catalog = Arc::clone(&self.catalog);
        let completions = self.completions.clone();

        tokio::spawn(async move {
            let result = catalog.resolve(&card.card_id).await;
            let resolution = Resolution {
                generation,
                card_id: card.card_id,
                count: card.count,
                result,
            };
            if completions.send(resolution).await.is_err() {
                debug!(generation, "Resolution receiver dropped, discarding lookup");
            }
        });
    }
}

/// Cost-ordered, name-deduplicated card list.
///
/// Every rebuild (and every clear) starts a new generation; completions from an
/// older generation are rejected by [`DeckModel::complete`].
#[derive(Debug, Default)]
pub struct DeckModel {
    cards: Vec<Card>,
    generation: u64,
    pending: usize,
}

impl DeckModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty the deck and abandon any rebuild still resolving.
    pub fn clear(&mut self) {
        self.cards.clear();
        self.generation += 1;
        self.pending = 0;
    }

    /// Merge into an existing entry of the same name, otherwise insert after
    /// every entry with cost <= the new card's cost.
    pub fn upsert(&mut self, card: Card) {
        if let Some(existing) = self.cards.iter_mut().find(|c| c.is_same_card(&card)) {
            existing.count = existing.count.saturating_add(card.count);
            return;
        }

        let idx = self.cards.partition_point(|c| c.cost <= card.cost);
        self.cards.insert(idx, card);
    }

    /// Clear the deck and start resolving every card of `entries`.
    ///
    /// Returns immediately with the new generation; cards arrive through
    /// [`DeckModel::complete`] in whatever order the lookups finish.
    pub fn rebuild_from<C: CardCatalog>(
        &mut self,
        entries: Vec<RosterEntry>,
        resolver: &CardResolver<C>,
    ) -> u64 {
        self.clear();
        let generation = self.generation;

        for entry in entries {
            debug!(slot = %entry.slot, cards = entry.cards.len(), "Resolving deck slot");
            for card in entry.cards {
                resolver.spawn_lookup(generation, card);
                self.pending += 1;
            }
        }

        info!(generation, lookups = self.pending, "Deck rebuild started");
        generation
    }

    /// Apply one lookup completion.
    ///
    /// Stale generations and failed lookups leave the deck untouched and come
    /// back as errors for the caller to log.
    pub fn complete(&mut self, resolution: Resolution) -> Result<(), EngineError> {
        if resolution.generation != self.generation {
            return Err(EngineError::StaleResolution {
                card_id: resolution.card_id,
                generation: resolution.generation,
                current: self.generation,
            });
        }

        self.pending = self.pending.saturating_sub(1);

        match resolution.result {
            Ok(record) => {
                self.upsert(Card {
                    id: resolution.card_id,
                    display_name: record.name,
                    cost: record.cost,
                    count: resolution.count,
                    art_ref: record.art_ref,
                });
                Ok(())
            }
            Err(source) => Err(EngineError::LookupFailure {
                card_id: resolution.card_id,
                source,
            }),
        }
    }

    pub fn snapshot(&self) -> Vec<Card> {
        self.cards.clone()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Lookups of the current generation that have not completed yet.
    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn is_rebuilding(&self) -> bool {
        self.pending > 0
    }
}
