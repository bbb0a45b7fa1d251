use serde::{Deserialize, Serialize};

/// One entry of the active deck.
///
/// Identity for merging is `display_name`: two cards with the same name are the
/// same card and their counts add up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Catalog id for resolved cards, the typed name for console-added ones.
    pub id: String,
    pub display_name: String,
    pub cost: u32,
    pub count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub art_ref: Option<String>,
}

impl Card {
    /// A single copy of a card added by hand, without catalog metadata.
    pub fn named(name: impl Into<String>, cost: u32) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            display_name: name,
            cost,
            count: 1,
            art_ref: None,
        }
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    pub fn is_same_card(&self, other: &Card) -> bool {
        self.display_name == other.display_name
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}) {} x{}", self.cost, self.display_name, self.count)
    }
}
