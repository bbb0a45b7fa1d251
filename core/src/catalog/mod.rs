//! Card metadata lookup.
//!
//! The engine only depends on [`CardCatalog`]: an asynchronous id -> record
//! resolver. Timeouts are the catalog's business; [`TimeoutCatalog`] adds one to
//! any implementation.

mod table;
mod timeout;

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use table::{CardTable, CatalogError};
pub use timeout::TimeoutCatalog;

/// Display metadata for one card id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRecord {
    pub name: String,
    pub cost: u32,
    #[serde(default, alias = "art", skip_serializing_if = "Option::is_none")]
    pub art_ref: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("no card with id {0}")]
    NotFound(String),
    #[error("lookup timed out after {0:?}")]
    Timeout(Duration),
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

pub trait CardCatalog: Send + Sync + 'static {
    fn resolve(
        &self,
        card_id: &str,
    ) -> impl Future<Output = Result<CardRecord, LookupError>> + Send;
}
