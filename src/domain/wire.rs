//! JSON bodies exchanged with the `?action=` checkout endpoint.

use crate::domain::checkout::{CardData, PaymentMethod};
use crate::domain::money::cents_to_amount;
use crate::domain::vault::VaultEntry;
use serde::{Deserialize, Serialize};

/// `POST ?action=checkout` body. There is no CVV field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutPayload {
    #[serde(rename = "type", default)]
    pub kind: PaymentMethod,
    #[serde(default)]
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_holder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_expiry: Option<String>,
}

impl CheckoutPayload {
    pub fn card(card: &CardData, amount_cents: i64) -> Self {
        Self {
            kind: PaymentMethod::CreditCard,
            amount: cents_to_amount(amount_cents),
            card_number: Some(card.number.clone()),
            card_holder: Some(card.holder.clone()),
            card_expiry: Some(card.expiry.clone()),
        }
    }

    pub fn pix(amount: f64) -> Self {
        Self {
            kind: PaymentMethod::Pix,
            amount,
            card_number: None,
            card_holder: None,
            card_expiry: None,
        }
    }
}

/// Reply to `POST ?action=checkout`, also used for unknown actions.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CheckoutReply {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pix_code: Option<String>,
}

impl CheckoutReply {
    pub fn card(order_id: String, tx_id: String) -> Self {
        Self {
            success: true,
            order_id: Some(order_id),
            tx_id: Some(tx_id),
            ..Self::default()
        }
    }

    pub fn pix(pix_code: String, order_id: String) -> Self {
        Self {
            success: true,
            order_id: Some(order_id),
            pix_code: Some(pix_code),
            ..Self::default()
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            ..Self::default()
        }
    }
}

/// Reply to `GET ?action=vault`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VaultReply {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<VaultEntry>>,
}

impl VaultReply {
    pub fn entries(data: Vec<VaultEntry>) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_payload_carries_no_cvv() {
        let card = CardData {
            number: "4111111111111111".to_string(),
            holder: "JOAO".to_string(),
            expiry: "01/29".to_string(),
            cvv: "456".to_string(),
        };
        let body = serde_json::to_value(CheckoutPayload::card(&card, 21681)).unwrap();
        assert_eq!(body["type"], "CREDIT_CARD");
        assert_eq!(body["amount"], 216.81);
        assert!(body.get("cvv").is_none());
        assert!(!body.to_string().contains("456"));
    }

    #[test]
    fn pix_payload_omits_card_fields() {
        let body = serde_json::to_value(CheckoutPayload::pix(100.0)).unwrap();
        assert_eq!(body, serde_json::json!({"type": "PIX", "amount": 100.0}));
    }

    #[test]
    fn missing_type_defaults_to_card() {
        let payload: CheckoutPayload = serde_json::from_str(r#"{"amount": 12.5}"#).unwrap();
        assert_eq!(payload.kind, PaymentMethod::CreditCard);
        assert!(payload.card_number.is_none());
    }

    #[test]
    fn failure_reply_shape() {
        let body = serde_json::to_value(CheckoutReply::failure("Endpoint desconhecido")).unwrap();
        assert_eq!(body, serde_json::json!({"success": false, "message": "Endpoint desconhecido"}));
    }
}
