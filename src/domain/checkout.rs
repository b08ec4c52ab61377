use serde::{Deserialize, Serialize};

pub const MIN_CEP_LEN: usize = 8;
pub const MIN_CARD_NUMBER_LEN: usize = 13;
pub const MIN_CVV_LEN: usize = 3;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckoutStep {
    Shipping,
    Payment,
    Processing,
    Success,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    #[default]
    CreditCard,
    Pix,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "CREDIT_CARD",
            PaymentMethod::Pix => "PIX",
        }
    }
}

/// Card form contents. Lives only in memory; `cvv` is never serialized.
#[derive(Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CardData {
    pub number: String,
    pub holder: String,
    pub expiry: String,
    #[serde(skip_serializing, default)]
    pub cvv: String,
}

impl CardData {
    pub fn is_plausible(&self) -> bool {
        self.number.chars().count() >= MIN_CARD_NUMBER_LEN
            && self.cvv.chars().count() >= MIN_CVV_LEN
    }

    pub fn last4(&self) -> String {
        last4(&self.number)
    }
}

impl std::fmt::Debug for CardData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardData")
            .field("number", &format_args!("****{}", self.last4()))
            .field("holder", &self.holder)
            .field("expiry", &self.expiry)
            .field("cvv", &"***")
            .finish()
    }
}

pub fn last4(number: &str) -> String {
    let chars: Vec<char> = number.chars().collect();
    let start = chars.len().saturating_sub(4);
    chars[start..].iter().collect()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PixData {
    pub code: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutState {
    pub step: CheckoutStep,
    pub cep: String,
    pub shipping_cost_cents: i64,
    pub payment_method: PaymentMethod,
    pub card_data: CardData,
    pub pix_data: Option<PixData>,
    pub order_id: Option<String>,
}

impl Default for CheckoutState {
    fn default() -> Self {
        Self {
            step: CheckoutStep::Shipping,
            cep: String::new(),
            shipping_cost_cents: 0,
            payment_method: PaymentMethod::CreditCard,
            card_data: CardData::default(),
            pix_data: None,
            order_id: None,
        }
    }
}

impl CheckoutState {
    pub fn cep_complete(&self) -> bool {
        self.cep.chars().count() >= MIN_CEP_LEN
    }

    /// Clears the per-opening fields. CEP, card form and method are kept.
    pub fn reopen(&mut self) {
        self.step = CheckoutStep::Shipping;
        self.pix_data = None;
        self.order_id = None;
    }
}
