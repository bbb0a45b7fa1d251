use std::time::Duration;

use super::{CardCatalog, CardRecord, LookupError};

/// Bounds every lookup of the wrapped catalog.
#[derive(Debug, Clone)]
pub struct TimeoutCatalog<C> {
    inner: C,
    limit: Duration,
}

impl<C: CardCatalog> TimeoutCatalog<C> {
    pub fn new(inner: C, limit: Duration) -> Self {
        Self { inner, limit }
    }
}

impl<C: CardCatalog> CardCatalog for TimeoutCatalog<C> {
    async fn resolve(&self, card_id: &str) -> Result<CardRecord, LookupError> {
        match tokio::time::timeout(self.limit, self.inner.resolve(card_id)).await {
            Ok(result) => result,
            Err(_) => Err(LookupError::Timeout(self.limit)),
        }
    }
}
