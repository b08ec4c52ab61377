use crate::domain::checkout::last4;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub const HASH_PREFIX: &str = "enc_aes256_";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VaultEntry {
    pub id: String,
    pub customer_email: String,
    pub cc_last4: String,
    pub cc_hash: String,
    pub brand: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Minimized card metadata ready to be appended to a vault store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVaultEntry {
    pub customer_email: String,
    pub cc_last4: String,
    pub cc_hash: String,
    pub brand: String,
}

impl NewVaultEntry {
    /// Only the card number is accepted here; CVV, holder and expiry never reach the vault.
    pub fn from_card_number(number: &str, customer_email: &str, brand: &str) -> Self {
        Self {
            customer_email: customer_email.to_string(),
            cc_last4: last4(number),
            cc_hash: hash_placeholder(number),
            brand: brand.to_string(),
        }
    }
}

pub fn hash_placeholder(number: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(number.as_bytes());
    format!("{}{:x}", HASH_PREFIX, hasher.finalize())
}
