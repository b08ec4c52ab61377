use crate::domain::vault::{NewVaultEntry, VaultEntry};
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::RwLock;

pub mod local_store;

/// Append-only card metadata store. Entries are never updated or removed.
#[async_trait::async_trait]
pub trait VaultStore: Send + Sync {
    async fn append(&self, entry: NewVaultEntry) -> Result<VaultEntry>;

    async fn list_newest_first(&self) -> Result<Vec<VaultEntry>>;
}

pub fn new_entry_id() -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("vault_{}_{}", chrono::Utc::now().timestamp_millis(), &suffix[..8])
}

pub fn materialize(entry: NewVaultEntry) -> VaultEntry {
    VaultEntry {
        id: new_entry_id(),
        customer_email: entry.customer_email,
        cc_last4: entry.cc_last4,
        cc_hash: entry.cc_hash,
        brand: entry.brand,
        created_at: chrono::Utc::now(),
    }
}

#[derive(Clone, Default)]
pub struct MemoryVaultStore {
    entries: Arc<RwLock<Vec<VaultEntry>>>,
}

impl MemoryVaultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[async_trait::async_trait]
impl VaultStore for MemoryVaultStore {
    async fn append(&self, entry: NewVaultEntry) -> Result<VaultEntry> {
        let stored = materialize(entry);
        self.entries.write().await.insert(0, stored.clone());
        Ok(stored)
    }

    async fn list_newest_first(&self) -> Result<Vec<VaultEntry>> {
        Ok(self.entries.read().await.clone())
    }
}
