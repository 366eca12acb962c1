/// Custom actions for Product rows.
///
/// These are the only ways stock changes outside of a full edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductAction {
    /// Decrements stock only if at least this many units are on hand.
    ///
    /// # Errors
    /// Fails without touching the row when the request exceeds stock.
    Reserve(i64),
    /// Absolute overwrite of the stock level (restock).
    SetQuantity(i64),
    /// Hides the product from listings and checkout.
    SoftDelete,
}

/// Results from ProductActions - variants match 1:1 with ProductAction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductActionResult {
    /// Stock left after the reservation
    Reserved(i64),
    QuantitySet(i64),
    Deleted,
}
