use crate::backend::{
    shipping_for_cep, time_order_id, BackendMode, CardPaymentReceipt, PaymentBackend, PixCharge,
    DEMO_PIX_CODE, PIX_TTL_SECS,
};
use crate::domain::checkout::CardData;
use crate::domain::vault::{NewVaultEntry, VaultEntry};
use crate::vault::VaultStore;
use anyhow::Result;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_APPROVAL_RATE: f64 = 0.95;
pub const DECLINED_MESSAGE: &str = "Transação negada pelo banco emissor.";

#[derive(Debug, Clone, Copy)]
pub struct Latency {
    pub shipping: Duration,
    pub card: Duration,
    pub pix: Duration,
    pub vault: Duration,
}

impl Latency {
    pub fn demo() -> Self {
        Self {
            shipping: Duration::from_millis(600),
            card: Duration::from_millis(1500),
            pix: Duration::from_millis(400),
            vault: Duration::from_millis(200),
        }
    }

    pub fn none() -> Self {
        Self {
            shipping: Duration::ZERO,
            card: Duration::ZERO,
            pix: Duration::ZERO,
            vault: Duration::ZERO,
        }
    }
}

/// In-process backend: random approvals, vault kept in a local store.
pub struct SimulatedBackend {
    pub vault: Arc<dyn VaultStore>,
    pub approval_rate: f64,
    pub latency: Latency,
    pub customer_email: String,
    pub brand: String,
}

async fn pause(d: Duration) {
    if !d.is_zero() {
        tokio::time::sleep(d).await;
    }
}

#[async_trait::async_trait]
impl PaymentBackend for SimulatedBackend {
    fn mode(&self) -> BackendMode {
        BackendMode::Simulated
    }

    async fn calculate_shipping(&self, cep: &str) -> Result<i64> {
        pause(self.latency.shipping).await;
        Ok(shipping_for_cep(cep))
    }

    async fn process_card_payment(&self, card: &CardData, amount_cents: i64) -> Result<CardPaymentReceipt> {
        pause(self.latency.card).await;

        let approved = rand::thread_rng().gen_bool(self.approval_rate.clamp(0.0, 1.0));
        if !approved {
            tracing::info!(last4 = %card.last4(), amount_cents, "simulated card payment declined");
            anyhow::bail!(DECLINED_MESSAGE);
        }

        let entry = NewVaultEntry::from_card_number(&card.number, &self.customer_email, &self.brand);
        self.vault.append(entry).await?;

        let tx_suffix: u64 = rand::thread_rng().gen();
        let receipt = CardPaymentReceipt {
            order_id: time_order_id("ORD"),
            tx_id: format!("tx_{:x}", tx_suffix),
        };
        tracing::info!(order_id = %receipt.order_id, amount_cents, "simulated card payment approved");
        Ok(receipt)
    }

    async fn generate_pix(&self) -> Result<PixCharge> {
        pause(self.latency.pix).await;
        Ok(PixCharge {
            code: DEMO_PIX_CODE.to_string(),
            expires_at: chrono::Utc::now() + chrono::Duration::seconds(PIX_TTL_SECS),
            order_id: time_order_id("ORD"),
        })
    }

    async fn get_vault_data(&self) -> Result<Vec<VaultEntry>> {
        pause(self.latency.vault).await;
        self.vault.list_newest_first().await
    }
}
