use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A discount code. `code` is stored upper-case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromoCode {
    pub code: String,
    pub discount_percent: i64,
    pub discount_fixed: i64,
    pub min_order: i64,
    pub uses_left: i64,
    pub valid_until: Option<DateTime<Utc>>,
}

/// Payload for creating or replacing a promo code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromoCreate {
    #[serde(default)]
    pub discount_percent: i64,
    #[serde(default)]
    pub discount_fixed: i64,
    #[serde(default)]
    pub min_order: i64,
    #[serde(default = "default_uses")]
    pub uses_left: i64,
    #[serde(default)]
    pub valid_until: Option<DateTime<Utc>>,
}

fn default_uses() -> i64 {
    999
}

/// Successful promo check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum PromoOutcome {
    Discount { discount: i64 },
    /// The code is fine but the order is too small. Not an error.
    BelowMinimum { min_order: i64 },
}

/// Normalize user input to the stored key form.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}
