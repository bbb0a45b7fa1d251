use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use super::{CardCatalog, CardRecord, LookupError};

/// In-memory catalog keyed by card id.
#[derive(Debug, Clone, Default)]
pub struct CardTable {
    cards: HashMap<String, CardRecord>,
}

/// One row of a card table file.
#[derive(Debug, Deserialize)]
struct CardRow {
    id: String,
    #[serde(flatten)]
    record: CardRecord,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse error in {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl CardTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a JSON array of `{ "id", "name", "cost", "art"? }` rows.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path).map_err(|e| CatalogError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::from_json(&contents).map_err(|e| CatalogError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let rows: Vec<CardRow> = serde_json::from_str(json)?;
        let mut table = Self::new();
        for row in rows {
            table.insert(row.id, row.record);
        }
        Ok(table)
    }

    /// Insert or replace a record, returns the previous one
    pub fn insert(&mut self, id: impl Into<String>, record: CardRecord) -> Option<CardRecord> {
        self.cards.insert(id.into(), record)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl CardCatalog for CardTable {
    async fn resolve(&self, card_id: &str) -> Result<CardRecord, LookupError> {
        self.cards
            .get(card_id)
            .cloned()
            .ok_or_else(|| LookupError::NotFound(card_id.to_string()))
    }
}
