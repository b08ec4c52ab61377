use crate::domain::vault::{NewVaultEntry, VaultEntry};
use crate::repo::orders_repo::{NewOrder, OrderStore, OrdersRepo};
use crate::repo::vault_repo::VaultRepo;
use crate::vault::VaultStore;
use anyhow::Result;
use sqlx::PgPool;
use std::sync::Arc;

/// Everything the checkout endpoint persists.
#[async_trait::async_trait]
pub trait CheckoutLedger: Send + Sync {
    /// The vault row and the approved order are kept together or not at all.
    async fn record_card_checkout(&self, entry: NewVaultEntry, order: &NewOrder) -> Result<VaultEntry>;
    async fn record_order(&self, order: &NewOrder) -> Result<()>;
    async fn vault_newest_first(&self) -> Result<Vec<VaultEntry>>;
}

#[derive(Clone)]
pub struct PgCheckoutLedger {
    pub pool: PgPool,
}

#[async_trait::async_trait]
impl CheckoutLedger for PgCheckoutLedger {
    async fn record_card_checkout(&self, entry: NewVaultEntry, order: &NewOrder) -> Result<VaultEntry> {
        let mut tx = self.pool.begin().await?;
        let stored = VaultRepo::insert_tx(&mut tx, entry).await?;
        OrdersRepo::insert_tx(&mut tx, order).await?;
        tx.commit().await?;
        Ok(stored)
    }

    async fn record_order(&self, order: &NewOrder) -> Result<()> {
        OrdersRepo { pool: self.pool.clone() }.insert(order).await
    }

    async fn vault_newest_first(&self) -> Result<Vec<VaultEntry>> {
        VaultRepo { pool: self.pool.clone() }.list_newest_first().await
    }
}

/// Ledger over stores without a shared transaction. The order goes in first,
/// so a failed order never leaves card metadata behind.
#[derive(Clone)]
pub struct StoreLedger {
    pub vault: Arc<dyn VaultStore>,
    pub orders: Arc<dyn OrderStore>,
}

#[async_trait::async_trait]
impl CheckoutLedger for StoreLedger {
    async fn record_card_checkout(&self, entry: NewVaultEntry, order: &NewOrder) -> Result<VaultEntry> {
        self.orders.insert(order).await?;
        self.vault.append(entry).await
    }

    async fn record_order(&self, order: &NewOrder) -> Result<()> {
        self.orders.insert(order).await
    }

    async fn vault_newest_first(&self) -> Result<Vec<VaultEntry>> {
        self.vault.list_newest_first().await
    }
}
