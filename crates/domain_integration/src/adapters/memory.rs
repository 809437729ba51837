//! In-memory port implementations
//!
//! Used by the service when integrations and credentials come from the
//! catalog file loaded at start-up, and by tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use core_kernel::{DomainPort, IntegrationId, PortError};

use crate::integration::IntegrationRecord;
use crate::ports::{CredentialsStore, IntegrationRepository, MetricsCounter};

/// Integration records held in memory
#[derive(Debug, Default, Clone)]
pub struct InMemoryIntegrationRepository {
    records: Arc<RwLock<HashMap<IntegrationId, IntegrationRecord>>>,
}

impl InMemoryIntegrationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates the repository
    pub fn with_records(records: impl IntoIterator<Item = IntegrationRecord>) -> Self {
        let map = records.into_iter().map(|r| (r.id, r)).collect();
        Self {
            records: Arc::new(RwLock::new(map)),
        }
    }

    pub async fn insert(&self, record: IntegrationRecord) {
        self.records.write().await.insert(record.id, record);
    }
}

impl DomainPort for InMemoryIntegrationRepository {}

#[async_trait]
impl IntegrationRepository for InMemoryIntegrationRepository {
    async fn find(&self, id: IntegrationId) -> Result<Option<IntegrationRecord>, PortError> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<IntegrationRecord>, PortError> {
        Ok(self.records.read().await.values().cloned().collect())
    }
}

/// Credential bundles held in memory, keyed by credentials reference
#[derive(Debug, Default, Clone)]
pub struct InMemoryCredentialsStore {
    bundles: Arc<RwLock<HashMap<String, Value>>>,
}

impl InMemoryCredentialsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bundles(bundles: impl IntoIterator<Item = (String, Value)>) -> Self {
        Self {
            bundles: Arc::new(RwLock::new(bundles.into_iter().collect())),
        }
    }

    pub async fn insert(&self, key: impl Into<String>, bundle: Value) {
        self.bundles.write().await.insert(key.into(), bundle);
    }
}

impl DomainPort for InMemoryCredentialsStore {}

#[async_trait]
impl CredentialsStore for InMemoryCredentialsStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, PortError> {
        Ok(self.bundles.read().await.get(key).cloned())
    }
}

/// Per-integration-type request totals
#[derive(Debug, Default)]
pub struct InMemoryRequestCounter {
    counts: Mutex<HashMap<String, u64>>,
}

impl InMemoryRequestCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total for one integration type
    pub fn count(&self, integration_type: &str) -> u64 {
        self.counts
            .lock()
            .map(|counts| counts.get(integration_type).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    /// Returns a copy of every total
    pub fn snapshot(&self) -> HashMap<String, u64> {
        self.counts
            .lock()
            .map(|counts| counts.clone())
            .unwrap_or_default()
    }
}

impl DomainPort for InMemoryRequestCounter {}

impl MetricsCounter for InMemoryRequestCounter {
    fn increment(&self, integration_type: &str) -> Result<(), PortError> {
        let mut counts = self
            .counts
            .lock()
            .map_err(|_| PortError::internal("request counter lock poisoned"))?;
        *counts.entry(integration_type.to_string()).or_insert(0) += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::TenantId;
    use serde_json::json;

    #[tokio::test]
    async fn test_repository_find_and_list() {
        let record = IntegrationRecord::matrix(TenantId::new(), "clinic-a");
        let repo = InMemoryIntegrationRepository::with_records(vec![record.clone()]);

        assert_eq!(repo.find(record.id).await.unwrap(), Some(record.clone()));
        assert_eq!(repo.find(IntegrationId::new()).await.unwrap(), None);
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_credentials_store_lookup_is_exact() {
        let store = InMemoryCredentialsStore::new();
        store.insert("clinic-a", json!({"production": {}})).await;

        assert!(store.get("clinic-a").await.unwrap().is_some());
        assert!(store.get("clinic-b").await.unwrap().is_none());
    }

    #[test]
    fn test_request_counter_counts_per_type() {
        let counter = InMemoryRequestCounter::new();
        counter.increment("matrix").unwrap();
        counter.increment("matrix").unwrap();

        assert_eq!(counter.count("matrix"), 2);
        assert_eq!(counter.count("other"), 0);
        assert_eq!(counter.snapshot().len(), 1);
    }
}
