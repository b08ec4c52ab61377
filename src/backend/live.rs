use crate::backend::{shipping_for_cep, BackendMode, CardPaymentReceipt, PaymentBackend, PixCharge, PIX_TTL_SECS};
use crate::domain::checkout::CardData;
use crate::domain::vault::VaultEntry;
use crate::domain::wire::{CheckoutPayload, CheckoutReply, VaultReply};
use anyhow::{anyhow, Result};

pub const CARD_CONNECTION_MESSAGE: &str = "Erro de conexão com o servidor de pagamento.";
pub const CARD_FALLBACK_MESSAGE: &str = "Erro no pagamento";
pub const PIX_ERROR_MESSAGE: &str = "Erro ao gerar Pix no servidor.";
pub const VAULT_ERROR_MESSAGE: &str = "Erro ao carregar o cofre.";

/// Amount the storefront sends when requesting a Pix code.
pub const PIX_REQUEST_AMOUNT: f64 = 100.0;

/// Backend that talks to the `?action=` checkout endpoint over HTTP.
pub struct LiveBackend {
    pub base_url: String,
    pub timeout_ms: u64,
    pub vault_api_key: Option<String>,
    pub client: reqwest::Client,
}

impl LiveBackend {
    fn action_url(&self, action: &str) -> String {
        let sep = if self.base_url.contains('?') { '&' } else { '?' };
        format!("{}{}action={}", self.base_url, sep, action)
    }

    async fn post_checkout(&self, payload: &CheckoutPayload) -> reqwest::Result<CheckoutReply> {
        self.client
            .post(self.action_url("checkout"))
            .json(payload)
            .timeout(std::time::Duration::from_millis(self.timeout_ms))
            .send()
            .await?
            .json::<CheckoutReply>()
            .await
    }
}

#[async_trait::async_trait]
impl PaymentBackend for LiveBackend {
    fn mode(&self) -> BackendMode {
        BackendMode::Live
    }

    // The endpoint has no shipping action; the bands are the same on both sides.
    async fn calculate_shipping(&self, cep: &str) -> Result<i64> {
        Ok(shipping_for_cep(cep))
    }

    async fn process_card_payment(&self, card: &CardData, amount_cents: i64) -> Result<CardPaymentReceipt> {
        let payload = CheckoutPayload::card(card, amount_cents);
        let reply = self.post_checkout(&payload).await.map_err(|e| {
            tracing::error!("card checkout request failed: {}", e);
            anyhow!(CARD_CONNECTION_MESSAGE)
        })?;

        if !reply.success {
            let message = reply.message.unwrap_or_else(|| CARD_FALLBACK_MESSAGE.to_string());
            tracing::warn!(last4 = %card.last4(), "card checkout rejected: {}", message);
            return Err(anyhow!(message));
        }

        match (reply.order_id, reply.tx_id) {
            (Some(order_id), Some(tx_id)) => Ok(CardPaymentReceipt { order_id, tx_id }),
            _ => {
                tracing::error!("card checkout reply missing order_id/tx_id");
                Err(anyhow!(CARD_CONNECTION_MESSAGE))
            }
        }
    }

    async fn generate_pix(&self) -> Result<PixCharge> {
        let reply = self
            .post_checkout(&CheckoutPayload::pix(PIX_REQUEST_AMOUNT))
            .await
            .map_err(|e| {
                tracing::error!("pix request failed: {}", e);
                anyhow!(PIX_ERROR_MESSAGE)
            })?;

        if !reply.success {
            return Err(anyhow!(reply.message.unwrap_or_else(|| PIX_ERROR_MESSAGE.to_string())));
        }

        match (reply.pix_code, reply.order_id) {
            (Some(code), Some(order_id)) => Ok(PixCharge {
                code,
                expires_at: chrono::Utc::now() + chrono::Duration::seconds(PIX_TTL_SECS),
                order_id,
            }),
            _ => Err(anyhow!(PIX_ERROR_MESSAGE)),
        }
    }

    async fn get_vault_data(&self) -> Result<Vec<VaultEntry>> {
        let mut request = self
            .client
            .get(self.action_url("vault"))
            .timeout(std::time::Duration::from_millis(self.timeout_ms));
        if let Some(key) = &self.vault_api_key {
            request = request.header("X-Vault-Api-Key", key);
        }

        let reply: VaultReply = request
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                tracing::error!("vault request failed: {}", e);
                anyhow!(VAULT_ERROR_MESSAGE)
            })?
            .json()
            .await
            .map_err(|e| {
                tracing::error!("vault reply unreadable: {}", e);
                anyhow!(VAULT_ERROR_MESSAGE)
            })?;

        if !reply.success {
            return Err(anyhow!(reply.message.unwrap_or_else(|| VAULT_ERROR_MESSAGE.to_string())));
        }
        Ok(reply.data.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_url_appends_query() {
        let b = LiveBackend {
            base_url: "http://localhost/api/index.php".to_string(),
            timeout_ms: 100,
            vault_api_key: None,
            client: reqwest::Client::new(),
        };
        assert_eq!(b.action_url("vault"), "http://localhost/api/index.php?action=vault");
    }
}
