use serde::Deserialize;
use serde_json::Value;

use crate::error::EngineError;

/// One `{cardId, count}` pair of a deck slot.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RosterCard {
    #[serde(rename = "cardId", alias = "card_id")]
    pub card_id: String,
    #[serde(default = "default_count")]
    pub count: u32,
}

fn default_count() -> u32 {
    1
}

/// The cards of one deck slot. Consumed once by a rebuild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    pub slot: String,
    pub cards: Vec<RosterCard>,
}

/// Parse the value of a `decks` key.
///
/// Slot values are either a JSON-encoded string or an already decoded array.
/// A slot that fails to parse is skipped; its error is returned alongside the
/// entries that did parse.
pub fn parse_roster(decks: &Value) -> (Vec<RosterEntry>, Vec<EngineError>) {
    let Some(slots) = decks.as_object() else {
        return (
            Vec::new(),
            vec![EngineError::malformed("decks is not an object")],
        );
    };

    let mut entries = Vec::with_capacity(slots.len());
    let mut errors = Vec::new();

    for (slot, value) in slots {
        match parse_slot(value) {
            Ok(cards) => entries.push(RosterEntry {
                slot: slot.clone(),
                cards,
            }),
            Err(detail) => errors.push(EngineError::malformed(format!(
                "deck slot {slot}: {detail}"
            ))),
        }
    }

    (entries, errors)
}

fn parse_slot(value: &Value) -> Result<Vec<RosterCard>, String> {
    let cards: Vec<RosterCard> = match value {
        Value::String(serialized) => {
            serde_json::from_str(serialized).map_err(|e| e.to_string())?
        }
        Value::Array(_) => {
            serde_json::from_value(value.clone()).map_err(|e| e.to_string())?
        }
        Value::Null => Vec::new(),
        other => return Err(format!("unexpected slot value {other}")),
    };

    if cards.iter().any(|c| c.count == 0) {
        return Err("card count must be at least 1".to_string());
    }

    Ok(cards)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_serialized_slots() {
        let decks = json!({
            "deck_1": r#"[{"cardId":"CS2_029","count":2},{"cardId":"CS2_024","count":1}]"#,
            "deck_2": r#"[{"cardId":"EX1_277"}]"#,
        });

        let (entries, errors) = parse_roster(&decks);
        assert!(errors.is_empty());
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].slot, "deck_1");
        assert_eq!(entries[0].cards[0].card_id, "CS2_029");
        assert_eq!(entries[0].cards[0].count, 2);
        // count defaults to one copy
        assert_eq!(entries[1].cards[0].count, 1);
    }

    #[test]
    fn test_parse_decoded_array_slot() {
        let decks = json!({ "deck_1": [{"card_id": "CS2_029", "count": 1}] });

        let (entries, errors) = parse_roster(&decks);
        assert!(errors.is_empty());
        assert_eq!(entries[0].cards[0].card_id, "CS2_029");
    }

    #[test]
    fn test_malformed_slot_is_skipped() {
        let decks = json!({
            "deck_1": "not json at all",
            "deck_2": r#"[{"cardId":"CS2_024","count":1}]"#,
            "deck_3": 42,
        });

        let (entries, errors) = parse_roster(&decks);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].slot, "deck_2");
        assert_eq!(errors.len(), 2);
        assert!(matches!(errors[0], EngineError::MalformedTelemetry(_)));
    }

    #[test]
    fn test_zero_count_rejected() {
        let decks = json!({ "deck_1": r#"[{"cardId":"CS2_024","count":0}]"# });
        let (entries, errors) = parse_roster(&decks);
        assert!(entries.is_empty());
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_non_object_decks() {
        let (entries, errors) = parse_roster(&json!(["deck_1"]));
        assert!(entries.is_empty());
        assert_eq!(errors.len(), 1);
    }
}
