//! Purchasable catalog
//!
//! The engine stores constituent ids only; the host commerce system
//! owns the actual purchasables and exposes them through a resolver
//! injected at service construction.

use async_trait::async_trait;
use shared::error::AppResult;
use shared::purchasable::Purchasable;
use std::collections::HashMap;
use std::sync::Arc;

/// Looks up live purchasables by element id
#[async_trait]
pub trait PurchasableResolver: Send + Sync {
    async fn resolve(&self, purchasable_id: &str) -> AppResult<Option<Arc<dyn Purchasable>>>;
}

/// Resolver backed by a plain map, for hosts that preload their
/// catalog and for tests
#[derive(Default)]
pub struct InMemoryCatalog {
    entries: HashMap<String, Arc<dyn Purchasable>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, purchasable: Arc<dyn Purchasable>) {
        self.entries.insert(purchasable.id().to_string(), purchasable);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl PurchasableResolver for InMemoryCatalog {
    async fn resolve(&self, purchasable_id: &str) -> AppResult<Option<Arc<dyn Purchasable>>> {
        Ok(self.entries.get(purchasable_id).cloned())
    }
}
