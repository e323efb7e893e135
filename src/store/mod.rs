//! Strategy persistence
//!
//! The API server talks to a `StrategyStore`; the in-memory implementation
//! backs both the default deployment and the test suite.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::models::strategy::StrategyConfig;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("strategy not found: {0}")]
    NotFound(String),
}

#[async_trait]
pub trait StrategyStore: Send + Sync {
    async fn list(&self) -> Result<Vec<StrategyConfig>, StoreError>;
    async fn get(&self, id: &str) -> Result<StrategyConfig, StoreError>;
    async fn create(&self, strategy: StrategyConfig) -> Result<StrategyConfig, StoreError>;
    async fn update(&self, id: &str, strategy: StrategyConfig) -> Result<StrategyConfig, StoreError>;
    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}

/// Process-local store. Insertion order is preserved for listings.
#[derive(Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<MemoryStoreInner>>,
}

#[derive(Default)]
struct MemoryStoreInner {
    strategies: HashMap<String, StrategyConfig>,
    order: Vec<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StrategyStore for MemoryStore {
    async fn list(&self) -> Result<Vec<StrategyConfig>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .order
            .iter()
            .filter_map(|id| inner.strategies.get(id).cloned())
            .collect())
    }

    async fn get(&self, id: &str) -> Result<StrategyConfig, StoreError> {
        let inner = self.inner.read().await;
        inner
            .strategies
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn create(&self, strategy: StrategyConfig) -> Result<StrategyConfig, StoreError> {
        let mut inner = self.inner.write().await;
        let id = strategy.id.clone();
        if !inner.strategies.contains_key(&id) {
            inner.order.push(id.clone());
        }
        inner.strategies.insert(id, strategy.clone());
        Ok(strategy)
    }

    async fn update(&self, id: &str, mut strategy: StrategyConfig) -> Result<StrategyConfig, StoreError> {
        let mut inner = self.inner.write().await;
        if !inner.strategies.contains_key(id) {
            return Err(StoreError::NotFound(id.to_string()));
        }
        strategy.id = id.to_string();
        inner.strategies.insert(id.to_string(), strategy.clone());
        Ok(strategy)
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if inner.strategies.remove(id).is_none() {
            return Err(StoreError::NotFound(id.to_string()));
        }
        inner.order.retain(|existing| existing != id);
        Ok(())
    }
}
