//! Promo engine: code lookup, expiry and usage checks, discount math.

pub mod entity;

pub use entity::PromoAction;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::actor_framework::Table;
use crate::domain::{normalize_code, PromoCode, PromoCreate, PromoOutcome};
use crate::error::{PromoError, ShopError};

/// `floor(subtotal * percent / 100) + fixed`, capped at the subtotal.
///
/// Computed in `i128`; the cap keeps the result within `0..=subtotal`.
pub fn compute_discount(promo: &PromoCode, subtotal: i64) -> i64 {
    let subtotal = subtotal.max(0);
    let discount = i128::from(subtotal) * i128::from(promo.discount_percent) / 100 + i128::from(promo.discount_fixed);
    let capped = discount.clamp(0, i128::from(subtotal));
    i64::try_from(capped).unwrap_or(subtotal)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromoBook {
    codes: Table<PromoCode>,
}

impl PromoBook {
    /// The two codes every fresh shop starts with.
    pub fn seeded() -> Self {
        let mut book = Self::default();
        let seeds = [
            ("WELCOME10", PromoCreate { discount_percent: 10, discount_fixed: 0, min_order: 100, uses_left: 999, valid_until: None }),
            ("SALE50", PromoCreate { discount_percent: 0, discount_fixed: 50, min_order: 200, uses_left: 999, valid_until: None }),
        ];
        for (code, terms) in seeds {
            // Seed terms are valid by construction.
            let _ = book.upsert(code, terms);
        }
        book
    }

    pub fn get(&self, code: &str) -> Option<&PromoCode> {
        self.codes.get(&normalize_code(code))
    }

    pub fn list(&self) -> Vec<PromoCode> {
        self.codes.values().cloned().collect()
    }

    pub fn upsert(&mut self, code: &str, terms: PromoCreate) -> Result<PromoCode, ShopError> {
        let code = normalize_code(code);
        let promo = if self.codes.contains(&code) {
            self.codes.update(&code, terms)?
        } else {
            self.codes.create(code, terms)?
        };
        info!(code = %promo.code, "Promo code saved");
        Ok(promo.clone())
    }

    /// Read-only check of `code` against an order subtotal.
    pub fn validate(&self, code: &str, subtotal: i64, now: DateTime<Utc>) -> Result<PromoOutcome, PromoError> {
        let key = normalize_code(code);
        let promo = self.codes.get(&key).ok_or_else(|| PromoError::NotFound(key.clone()))?;

        if promo.valid_until.is_some_and(|until| now > until) {
            return Err(PromoError::Expired(key));
        }
        if promo.uses_left <= 0 {
            return Err(PromoError::Exhausted(key));
        }
        if subtotal < promo.min_order {
            debug!(code = %key, subtotal, min_order = promo.min_order, "Subtotal below promo minimum");
            return Ok(PromoOutcome::BelowMinimum { min_order: promo.min_order });
        }
        Ok(PromoOutcome::Discount { discount: compute_discount(promo, subtotal) })
    }

    /// Validates and consumes one use. A below-minimum subtotal is an error here.
    pub fn redeem(&mut self, code: &str, subtotal: i64, now: DateTime<Utc>) -> Result<i64, ShopError> {
        let discount = match self.validate(code, subtotal, now)? {
            PromoOutcome::Discount { discount } => discount,
            PromoOutcome::BelowMinimum { min_order } => return Err(PromoError::BelowMinimum { min_order }.into()),
        };
        let key = normalize_code(code);
        let uses_left = self.codes.perform_action(&key, PromoAction::Redeem)?;
        info!(code = %key, discount, uses_left, "Promo code redeemed");
        Ok(discount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_percent_discount_above_minimum() {
        let book = PromoBook::seeded();
        let outcome = book.validate("WELCOME10", 300, Utc::now()).unwrap();
        assert_eq!(outcome, PromoOutcome::Discount { discount: 30 });
    }

    #[test]
    fn test_below_minimum_is_a_soft_result() {
        let book = PromoBook::seeded();
        let outcome = book.validate("WELCOME10", 50, Utc::now()).unwrap();
        assert_eq!(outcome, PromoOutcome::BelowMinimum { min_order: 100 });
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let book = PromoBook::seeded();
        let outcome = book.validate("  sale50 ", 200, Utc::now()).unwrap();
        assert_eq!(outcome, PromoOutcome::Discount { discount: 50 });
    }

    #[test]
    fn test_rejections() {
        let mut book = PromoBook::seeded();
        let now = Utc::now();
        assert_eq!(book.validate("NOPE", 500, now), Err(PromoError::NotFound("NOPE".into())));

        book.upsert("old", PromoCreate {
            discount_percent: 5,
            discount_fixed: 0,
            min_order: 0,
            uses_left: 10,
            valid_until: Some(now - Duration::days(1)),
        })
        .unwrap();
        assert_eq!(book.validate("OLD", 500, now), Err(PromoError::Expired("OLD".into())));

        book.upsert("used", PromoCreate {
            discount_percent: 5,
            discount_fixed: 0,
            min_order: 0,
            uses_left: 0,
            valid_until: None,
        })
        .unwrap();
        assert_eq!(book.validate("USED", 500, now), Err(PromoError::Exhausted("USED".into())));
    }

    #[test]
    fn test_discount_never_exceeds_subtotal() {
        let mut book = PromoBook::default();
        book.upsert("BIG", PromoCreate {
            discount_percent: 50,
            discount_fixed: 500,
            min_order: 0,
            uses_left: 1,
            valid_until: None,
        })
        .unwrap();
        let outcome = book.validate("BIG", 301, Utc::now()).unwrap();
        assert_eq!(outcome, PromoOutcome::Discount { discount: 301 });
    }

    #[test]
    fn test_percent_is_floored() {
        let book = PromoBook::seeded();
        let outcome = book.validate("WELCOME10", 109, Utc::now()).unwrap();
        assert_eq!(outcome, PromoOutcome::Discount { discount: 10 });
    }

    #[test]
    fn test_huge_subtotal_does_not_overflow() {
        let book = PromoBook::seeded();
        let outcome = book.validate("WELCOME10", i64::MAX, Utc::now()).unwrap();
        assert_eq!(outcome, PromoOutcome::Discount { discount: i64::MAX / 10 });

        let big = book.get("SALE50").unwrap();
        assert_eq!(compute_discount(big, i64::MAX), 50);
    }

    #[test]
    fn test_redeem_consumes_uses() {
        let mut book = PromoBook::default();
        book.upsert("ONCE", PromoCreate {
            discount_percent: 0,
            discount_fixed: 20,
            min_order: 0,
            uses_left: 1,
            valid_until: None,
        })
        .unwrap();

        assert_eq!(book.redeem("once", 100, Utc::now()).unwrap(), 20);
        assert_eq!(book.get("ONCE").unwrap().uses_left, 0);
        assert_eq!(
            book.redeem("ONCE", 100, Utc::now()),
            Err(ShopError::Promo(PromoError::Exhausted("ONCE".into())))
        );
    }

    #[test]
    fn test_redeem_below_minimum_fails() {
        let mut book = PromoBook::seeded();
        assert_eq!(
            book.redeem("SALE50", 150, Utc::now()),
            Err(ShopError::Promo(PromoError::BelowMinimum { min_order: 200 }))
        );
        assert_eq!(book.get("SALE50").unwrap().uses_left, 999);
    }

    #[test]
    fn test_invalid_terms_rejected() {
        let mut book = PromoBook::default();
        let bad = PromoCreate {
            discount_percent: 120,
            discount_fixed: 0,
            min_order: 0,
            uses_left: 1,
            valid_until: None,
        };
        assert!(matches!(book.upsert("X", bad), Err(ShopError::Validation(_))));
        assert!(matches!(book.upsert("   ", PromoCreate {
            discount_percent: 1,
            discount_fixed: 0,
            min_order: 0,
            uses_left: 1,
            valid_until: None,
        }), Err(ShopError::Validation(_))));
    }
}
