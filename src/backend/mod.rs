use crate::config::AppConfig;
use crate::domain::checkout::CardData;
use crate::domain::vault::VaultEntry;
use crate::vault::local_store::LocalVaultStore;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub mod live;
pub mod simulated;

pub const SHIPPING_NEAR_CENTS: i64 = 990;
pub const SHIPPING_FAR_CENTS: i64 = 1990;
pub const PIX_TTL_SECS: i64 = 5 * 60;
pub const DEMO_PIX_CODE: &str = "00020126580014BR.GOV.BCB.PIX0136123e4567-e89b-12d3-a456-426614174000520400005303986540510.005802BR5913MarketplaceAgil6008Brasilia62070503***6304E2CA";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BackendMode {
    Live,
    Simulated,
}

impl BackendMode {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "LIVE" => BackendMode::Live,
            _ => BackendMode::Simulated,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardPaymentReceipt {
    pub order_id: String,
    pub tx_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixCharge {
    pub code: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub order_id: String,
}

/// Shipping bands keyed on the first CEP digit.
pub fn shipping_for_cep(cep: &str) -> i64 {
    if cep.starts_with('0') || cep.starts_with('1') {
        SHIPPING_NEAR_CENTS
    } else {
        SHIPPING_FAR_CENTS
    }
}

pub fn time_order_id(prefix: &str) -> String {
    format!("{}-{}", prefix, chrono::Utc::now().timestamp_millis())
}

/// Storefront-facing payment operations. Every failure carries a message fit for display.
#[async_trait::async_trait]
pub trait PaymentBackend: Send + Sync {
    fn mode(&self) -> BackendMode;

    async fn calculate_shipping(&self, cep: &str) -> Result<i64>;

    /// `amount_cents` is the checkout total. Implementations must not forward `card.cvv`.
    async fn process_card_payment(&self, card: &CardData, amount_cents: i64) -> Result<CardPaymentReceipt>;

    async fn generate_pix(&self) -> Result<PixCharge>;

    async fn get_vault_data(&self) -> Result<Vec<VaultEntry>>;
}

pub fn build_backend(cfg: &AppConfig) -> Arc<dyn PaymentBackend> {
    match cfg.backend_mode {
        BackendMode::Live => {
            tracing::info!("payment backend: live ({})", cfg.api_base_url);
            Arc::new(live::LiveBackend {
                base_url: cfg.api_base_url.clone(),
                timeout_ms: cfg.backend_timeout_ms,
                vault_api_key: cfg.vault_api_key.clone(),
                client: reqwest::Client::new(),
            })
        }
        BackendMode::Simulated => {
            tracing::info!("payment backend: simulated (vault file {})", cfg.vault_file);
            Arc::new(simulated::SimulatedBackend {
                vault: Arc::new(LocalVaultStore::new(&cfg.vault_file)),
                approval_rate: simulated::DEFAULT_APPROVAL_RATE,
                latency: if cfg.simulated_latency {
                    simulated::Latency::demo()
                } else {
                    simulated::Latency::none()
                },
                customer_email: cfg.customer_email.clone(),
                brand: cfg.card_brand.clone(),
            })
        }
    }
}
