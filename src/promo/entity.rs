use crate::actor_framework::Entity;
use crate::domain::{PromoCode, PromoCreate};
use crate::error::{PromoError, ShopError};

/// Custom actions for promo codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromoAction {
    /// Consumes one use.
    Redeem,
}

fn check_terms(terms: &PromoCreate) -> Result<(), ShopError> {
    if terms.discount_percent < 0 || terms.discount_percent > 100 {
        return Err(ShopError::validation(format!(
            "Discount percent must be within 0..=100, got {}",
            terms.discount_percent
        )));
    }
    if terms.discount_fixed < 0 || terms.min_order < 0 {
        return Err(ShopError::validation("Promo amounts must not be negative"));
    }
    Ok(())
}

impl Entity for PromoCode {
    type Id = String;
    type CreatePayload = PromoCreate;
    type Patch = PromoCreate;
    type Action = PromoAction;
    type ActionResult = i64;

    fn id(&self) -> &String {
        &self.code
    }

    fn from_create(code: String, terms: PromoCreate) -> Result<Self, ShopError> {
        if code.is_empty() {
            return Err(ShopError::validation("Promo code required"));
        }
        check_terms(&terms)?;
        Ok(Self {
            code,
            discount_percent: terms.discount_percent,
            discount_fixed: terms.discount_fixed,
            min_order: terms.min_order,
            uses_left: terms.uses_left,
            valid_until: terms.valid_until,
        })
    }

    fn on_update(&mut self, terms: PromoCreate) -> Result<(), ShopError> {
        check_terms(&terms)?;
        self.discount_percent = terms.discount_percent;
        self.discount_fixed = terms.discount_fixed;
        self.min_order = terms.min_order;
        self.uses_left = terms.uses_left;
        self.valid_until = terms.valid_until;
        Ok(())
    }

    /// Returns the uses left after redemption.
    fn handle_action(&mut self, action: PromoAction) -> Result<i64, ShopError> {
        match action {
            PromoAction::Redeem => {
                if self.uses_left <= 0 {
                    return Err(PromoError::Exhausted(self.code.clone()).into());
                }
                self.uses_left -= 1;
                Ok(self.uses_left)
            }
        }
    }
}
