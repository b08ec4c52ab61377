use crate::backend::DEMO_PIX_CODE;
use crate::domain::checkout::PaymentMethod;
use crate::domain::money::amount_to_cents;
use crate::domain::vault::{NewVaultEntry, VaultEntry};
use crate::domain::wire::{CheckoutPayload, CheckoutReply};
use crate::repo::checkout_ledger::CheckoutLedger;
use crate::repo::orders_repo::{NewOrder, OrderStatus};
use anyhow::Result;
use std::sync::Arc;

pub const INVALID_CARD_MESSAGE: &str = "Dados do cartão inválidos";

/// Total recorded for Pix orders; the storefront does not send the real amount.
pub const PIX_ORDER_TOTAL_CENTS: i64 = 10_000;

/// Server side of the checkout endpoint. Card payments are always approved here.
#[derive(Clone)]
pub struct CheckoutService {
    pub ledger: Arc<dyn CheckoutLedger>,
    pub customer_email: String,
    pub brand: String,
}

impl CheckoutService {
    /// `Err` means the storage layer failed; business rejections come back as an unsuccessful reply.
    pub async fn checkout(&self, req: CheckoutPayload) -> Result<CheckoutReply> {
        match req.kind {
            PaymentMethod::CreditCard => self.card_checkout(req).await,
            PaymentMethod::Pix => self.pix_checkout().await,
        }
    }

    async fn card_checkout(&self, req: CheckoutPayload) -> Result<CheckoutReply> {
        let number = match req.card_number.as_deref().map(str::trim) {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => return Ok(CheckoutReply::failure(INVALID_CARD_MESSAGE)),
        };

        let entry = NewVaultEntry::from_card_number(&number, &self.customer_email, &self.brand);
        let order = NewOrder {
            order_uuid: format!("ORD-{}", chrono::Utc::now().timestamp()),
            total_cents: amount_to_cents(req.amount),
            payment_method: PaymentMethod::CreditCard,
            status: OrderStatus::Approved,
        };
        let stored = self.ledger.record_card_checkout(entry, &order).await?;

        let tx_id = format!("tx_{}", &uuid::Uuid::new_v4().simple().to_string()[..13]);
        tracing::info!(
            order_id = %order.order_uuid,
            vault_id = %stored.id,
            last4 = %stored.cc_last4,
            total_cents = order.total_cents,
            "card checkout approved"
        );
        Ok(CheckoutReply::card(order.order_uuid, tx_id))
    }

    async fn pix_checkout(&self) -> Result<CheckoutReply> {
        let order = NewOrder {
            order_uuid: format!("ORD-PIX-{}", chrono::Utc::now().timestamp()),
            total_cents: PIX_ORDER_TOTAL_CENTS,
            payment_method: PaymentMethod::Pix,
            status: OrderStatus::Pending,
        };
        self.ledger.record_order(&order).await?;

        tracing::info!(order_id = %order.order_uuid, "pix order created");
        Ok(CheckoutReply::pix(DEMO_PIX_CODE.to_string(), order.order_uuid))
    }

    pub async fn vault_entries(&self) -> Result<Vec<VaultEntry>> {
        self.ledger.vault_newest_first().await
    }
}
