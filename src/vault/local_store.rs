use crate::domain::vault::{NewVaultEntry, VaultEntry};
use crate::vault::{materialize, VaultStore};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Vault kept as a JSON array on disk, newest entry first.
#[derive(Clone)]
pub struct LocalVaultStore {
    pub path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl LocalVaultStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    async fn read_all(&self) -> Result<Vec<VaultEntry>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(Vec::new()),
            Ok(bytes) => serde_json::from_slice(&bytes)
                .with_context(|| format!("corrupt vault file {}", self.path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait::async_trait]
impl VaultStore for LocalVaultStore {
    async fn append(&self, entry: NewVaultEntry) -> Result<VaultEntry> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.read_all().await?;
        let stored = materialize(entry);
        entries.insert(0, stored.clone());

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, serde_json::to_vec(&entries)?).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        tracing::debug!(id = %stored.id, last4 = %stored.cc_last4, "vault entry appended");
        Ok(stored)
    }

    async fn list_newest_first(&self) -> Result<Vec<VaultEntry>> {
        let _guard = self.write_lock.lock().await;
        self.read_all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalVaultStore::new(dir.path().join("vault.json"));
        assert!(store.list_newest_first().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn appends_newest_first_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("vault.json");
        let store = LocalVaultStore::new(&path);

        store
            .append(NewVaultEntry::from_card_number("4111111111111111", "a@b.com", "visa"))
            .await
            .unwrap();
        store
            .append(NewVaultEntry::from_card_number("5555444433332222", "a@b.com", "mastercard"))
            .await
            .unwrap();

        let reopened = LocalVaultStore::new(&path);
        let entries = reopened.list_newest_first().await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].cc_last4, "2222");
        assert_eq!(entries[1].cc_last4, "1111");
    }
}
