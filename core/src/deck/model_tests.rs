//! Tests for the deck model
//!
//! Covers ordering and merge rules of upsert, plus rebuild behavior when
//! lookups fail or land after a newer rebuild has started.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use deckwatch_types::Card;
use tokio::sync::mpsc;

use super::{CardResolver, DeckModel, Resolution, RosterCard, RosterEntry};
use crate::catalog::{CardCatalog, CardRecord, LookupError};
use crate::error::EngineError;

/// Catalog answering each id after a fixed delay; unknown ids fail.
#[derive(Default)]
struct DelayedCatalog {
    cards: HashMap<String, (CardRecord, Duration)>,
}

impl DelayedCatalog {
    fn with(mut self, id: &str, name: &str, cost: u32, delay_ms: u64) -> Self {
        let record = CardRecord {
            name: name.to_string(),
            cost,
            art_ref: None,
        };
        self.cards
            .insert(id.to_string(), (record, Duration::from_millis(delay_ms)));
        self
    }
}

impl CardCatalog for DelayedCatalog {
    async fn resolve(&self, card_id: &str) -> Result<CardRecord, LookupError> {
        match self.cards.get(card_id) {
            Some((record, delay)) => {
                tokio::time::sleep(*delay).await;
                Ok(record.clone())
            }
            None => Err(LookupError::NotFound(card_id.to_string())),
        }
    }
}

fn entry(slot: &str, ids: &[&str]) -> RosterEntry {
    RosterEntry {
        slot: slot.to_string(),
        cards: ids
            .iter()
            .map(|id| RosterCard {
                card_id: id.to_string(),
                count: 1,
            })
            .collect(),
    }
}

/// Feed the next `expected` completions into the deck.
async fn settle(
    deck: &mut DeckModel,
    rx: &mut mpsc::Receiver<Resolution>,
    expected: usize,
) -> Vec<Result<(), EngineError>> {
    let mut outcomes = Vec::with_capacity(expected);
    for _ in 0..expected {
        let resolution = rx.recv().await.expect("resolver dropped");
        outcomes.push(deck.complete(resolution));
    }
    outcomes
}

fn names(deck: &DeckModel) -> Vec<String> {
    deck.snapshot()
        .into_iter()
        .map(|c| c.display_name)
        .collect()
}

fn assert_sorted(deck: &DeckModel) {
    let snapshot = deck.snapshot();
    for pair in snapshot.windows(2) {
        assert!(
            pair[0].cost <= pair[1].cost,
            "{} before {} breaks cost order",
            pair[0],
            pair[1]
        );
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// upsert / clear
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn upsert_keeps_cost_order() {
    let mut deck = DeckModel::new();
    for (i, cost) in [5, 1, 3, 3, 0, 7, 2, 5, 1, 10, 0].into_iter().enumerate() {
        deck.upsert(Card::named(format!("card_{i}"), cost));
        assert_sorted(&deck);
    }
    assert_eq!(deck.len(), 11);
}

/// Every ordering of `items`, by Heap's algorithm.
fn permutations<T: Clone>(items: &[T]) -> Vec<Vec<T>> {
    fn heap<T: Clone>(k: usize, items: &mut Vec<T>, out: &mut Vec<Vec<T>>) {
        if k <= 1 {
            out.push(items.clone());
            return;
        }
        for i in 0..k - 1 {
            heap(k - 1, items, out);
            if k % 2 == 0 {
                items.swap(i, k - 1);
            } else {
                items.swap(0, k - 1);
            }
        }
        heap(k - 1, items, out);
    }

    let mut items = items.to_vec();
    let mut out = Vec::new();
    heap(items.len(), &mut items, &mut out);
    out
}

#[test]
fn every_upsert_order_stays_sorted_and_stable() {
    let cards = [
        ("Frostbolt", 2),
        ("Fireball", 4),
        ("Arcane Intellect", 3),
        ("Ice Barrier", 3),
        ("Frostbolt", 2),
        ("Mirror Image", 0),
        ("Counterspell", 3),
    ];

    let orders = permutations(&cards);
    assert_eq!(orders.len(), 5040);

    for order in orders {
        let mut deck = DeckModel::new();
        for (name, cost) in &order {
            deck.upsert(Card::named(*name, *cost));
            assert_sorted(&deck);
        }

        assert_eq!(deck.len(), 6, "{order:?}");
        let frostbolt = deck
            .cards()
            .iter()
            .find(|c| c.display_name == "Frostbolt")
            .unwrap();
        assert_eq!(frostbolt.count, 2);

        // Equal costs keep first-insertion order
        let mut first_seen: Vec<&str> = Vec::new();
        for (name, cost) in &order {
            if *cost == 3 && !first_seen.contains(name) {
                first_seen.push(*name);
            }
        }
        let threes: Vec<&str> = deck
            .cards()
            .iter()
            .filter(|c| c.cost == 3)
            .map(|c| c.display_name.as_str())
            .collect();
        assert_eq!(threes, first_seen, "{order:?}");
    }
}

#[test]
fn equal_cost_cards_keep_insertion_order() {
    let mut deck = DeckModel::new();
    deck.upsert(Card::named("Arcane Intellect", 3));
    deck.upsert(Card::named("Frostbolt", 2));
    deck.upsert(Card::named("Ice Barrier", 3));
    deck.upsert(Card::named("Mirror Image", 1));
    deck.upsert(Card::named("Counterspell", 3));

    assert_eq!(
        names(&deck),
        vec![
            "Mirror Image",
            "Frostbolt",
            "Arcane Intellect",
            "Ice Barrier",
            "Counterspell"
        ]
    );
}

#[test]
fn first_card_becomes_sole_entry() {
    let mut deck = DeckModel::new();
    deck.upsert(Card::named("Fireball", 4));
    assert_eq!(deck.snapshot(), vec![Card::named("Fireball", 4)]);
}

#[test]
fn same_name_merges_counts_in_place() {
    let mut deck = DeckModel::new();
    deck.upsert(Card::named("Frostbolt", 2));
    deck.upsert(Card::named("Fireball", 4));
    deck.upsert(Card::named("Flamestrike", 7));

    deck.upsert(Card::named("Fireball", 4).with_count(2));

    assert_eq!(deck.len(), 3);
    assert_eq!(names(&deck), vec!["Frostbolt", "Fireball", "Flamestrike"]);
    assert_eq!(deck.cards()[1].count, 3);
}

#[test]
fn merge_ignores_cost_of_incoming_duplicate() {
    let mut deck = DeckModel::new();
    deck.upsert(Card::named("Frostbolt", 2));
    deck.upsert(Card::named("Fireball", 4));

    // Same name with a different cost only bumps the count
    deck.upsert(Card::named("Frostbolt", 9));

    assert_eq!(names(&deck), vec!["Frostbolt", "Fireball"]);
    assert_eq!(deck.cards()[0].cost, 2);
    assert_eq!(deck.cards()[0].count, 2);
}

#[test]
fn clear_is_idempotent() {
    let mut deck = DeckModel::new();
    deck.upsert(Card::named("Fireball", 4));
    deck.upsert(Card::named("Frostbolt", 2));

    deck.clear();
    deck.clear();

    assert!(deck.is_empty());
    assert!(deck.snapshot().is_empty());
}

// ─────────────────────────────────────────────────────────────────────────────
// rebuild_from / complete
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn failed_lookup_is_omitted_from_rebuild() {
    let catalog = DelayedCatalog::default()
        .with("CS2_029", "Fireball", 4, 30)
        .with("CS2_024", "Frostbolt", 2, 10)
        .with("EX1_279", "Pyroblast", 10, 20);
    let (resolver, mut rx) = CardResolver::channel(Arc::new(catalog), 16);

    let mut deck = DeckModel::new();
    deck.upsert(Card::named("Leftover", 1));
    deck.rebuild_from(
        vec![
            entry("deck_1", &["CS2_029", "MISSING"]),
            entry("deck_2", &["CS2_024", "EX1_279"]),
        ],
        &resolver,
    );
    assert!(deck.is_empty());
    assert_eq!(deck.pending(), 4);

    let outcomes = settle(&mut deck, &mut rx, 4).await;

    assert_eq!(outcomes.iter().filter(|o| o.is_ok()).count(), 3);
    assert!(outcomes.iter().any(|o| matches!(
        o,
        Err(EngineError::LookupFailure { card_id, .. }) if card_id == "MISSING"
    )));
    assert_eq!(names(&deck), vec!["Frostbolt", "Fireball", "Pyroblast"]);
    assert_eq!(deck.cards()[1].id, "CS2_029");
    assert!(!deck.is_rebuilding());
}

#[tokio::test(start_paused = true)]
async fn partial_deck_visible_while_rebuilding() {
    let catalog = DelayedCatalog::default()
        .with("fast", "Fast", 3, 5)
        .with("slow", "Slow", 1, 500);
    let (resolver, mut rx) = CardResolver::channel(Arc::new(catalog), 16);

    let mut deck = DeckModel::new();
    deck.rebuild_from(vec![entry("deck_1", &["fast", "slow"])], &resolver);

    settle(&mut deck, &mut rx, 1).await;
    assert_eq!(names(&deck), vec!["Fast"]);
    assert_eq!(deck.pending(), 1);

    settle(&mut deck, &mut rx, 1).await;
    assert_eq!(names(&deck), vec!["Slow", "Fast"]);
}

#[tokio::test(start_paused = true)]
async fn superseded_rebuild_is_discarded() {
    let catalog = DelayedCatalog::default()
        .with("old_a", "Old A", 1, 100)
        .with("old_b", "Old B", 2, 120)
        .with("new_a", "New A", 3, 10)
        .with("new_b", "New B", 0, 20);
    let (resolver, mut rx) = CardResolver::channel(Arc::new(catalog), 16);

    let mut deck = DeckModel::new();
    let first = deck.rebuild_from(vec![entry("deck_1", &["old_a", "old_b"])], &resolver);
    let second = deck.rebuild_from(vec![entry("deck_1", &["new_a", "new_b"])], &resolver);
    assert!(second > first);

    let outcomes = settle(&mut deck, &mut rx, 4).await;

    let stale = outcomes
        .iter()
        .filter(|o| matches!(o, Err(EngineError::StaleResolution { generation, .. }) if *generation == first))
        .count();
    assert_eq!(stale, 2);
    assert_eq!(names(&deck), vec!["New B", "New A"]);
}

#[tokio::test(start_paused = true)]
async fn stale_completion_after_newer_rebuild_finished() {
    // The old rebuild's lookups finish after the new rebuild is fully applied
    let catalog = DelayedCatalog::default()
        .with("old", "Old", 1, 1_000)
        .with("new", "New", 1, 1);
    let (resolver, mut rx) = CardResolver::channel(Arc::new(catalog), 16);

    let mut deck = DeckModel::new();
    deck.rebuild_from(vec![entry("deck_1", &["old"])], &resolver);
    deck.rebuild_from(vec![entry("deck_1", &["new"])], &resolver);

    settle(&mut deck, &mut rx, 1).await;
    assert_eq!(names(&deck), vec!["New"]);

    let late = settle(&mut deck, &mut rx, 1).await;
    assert!(matches!(late[0], Err(EngineError::StaleResolution { .. })));
    assert_eq!(names(&deck), vec!["New"]);
}

#[tokio::test(start_paused = true)]
async fn clear_abandons_rebuild_in_flight() {
    let catalog = DelayedCatalog::default().with("CS2_029", "Fireball", 4, 50);
    let (resolver, mut rx) = CardResolver::channel(Arc::new(catalog), 16);

    let mut deck = DeckModel::new();
    deck.rebuild_from(vec![entry("deck_1", &["CS2_029"])], &resolver);
    deck.clear();
    assert_eq!(deck.pending(), 0);

    let outcomes = settle(&mut deck, &mut rx, 1).await;
    assert!(matches!(outcomes[0], Err(EngineError::StaleResolution { .. })));
    assert!(deck.is_empty());
}

#[tokio::test]
async fn same_card_across_slots_merges_counts() {
    let catalog = DelayedCatalog::default()
        .with("CS2_029", "Fireball", 4, 0)
        .with("CS2_024", "Frostbolt", 2, 0);
    let (resolver, mut rx) = CardResolver::channel(Arc::new(catalog), 16);

    let mut deck = DeckModel::new();
    deck.rebuild_from(
        vec![
            entry("deck_1", &["CS2_029", "CS2_024"]),
            entry("deck_2", &["CS2_029"]),
        ],
        &resolver,
    );
    settle(&mut deck, &mut rx, 3).await;

    assert_eq!(names(&deck), vec!["Frostbolt", "Fireball"]);
    assert_eq!(deck.cards()[1].count, 2);
}

#[test]
fn completion_from_unknown_generation_is_stale() {
    let mut deck = DeckModel::new();
    let resolution = Resolution {
        generation: 42,
        card_id: "CS2_029".to_string(),
        count: 1,
        result: Ok(CardRecord {
            name: "Fireball".to_string(),
            cost: 4,
            art_ref: None,
        }),
    };

    let err = deck.complete(resolution).unwrap_err();
    assert!(matches!(
        err,
        EngineError::StaleResolution { generation: 42, current: 0, .. }
    ));
    assert!(deck.is_empty());
}
