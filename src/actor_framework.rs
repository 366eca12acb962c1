use std::collections::BTreeMap;
use std::fmt::{Debug, Display};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ShopError;

// =============================================================================
// 1. THE ABSTRACTION (Rows with Hooks, DTOs, and Actions)
// =============================================================================

/// Trait that any row kept by the store actor must implement.
pub trait Entity: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    type Id: Ord + Clone + Send + Sync + Display + Debug + Serialize + DeserializeOwned;
    type CreatePayload: Send + Debug;
    type Patch: Send + Debug;

    type Action: Send + Debug;
    type ActionResult: Send + Debug;

    /// Get the ID of the entity
    fn id(&self) -> &Self::Id;

    /// Construct the full Entity from the ID and Payload
    fn from_create(id: Self::Id, payload: Self::CreatePayload) -> Result<Self, ShopError>;

    // --- Lifecycle Hooks ---

    fn on_update(&mut self, patch: Self::Patch) -> Result<(), ShopError>;

    // --- Action Handler ---

    /// Handle a custom domain-specific action
    fn handle_action(&mut self, action: Self::Action) -> Result<Self::ActionResult, ShopError>;
}

// =============================================================================
// 2. ID SEQUENCES
// =============================================================================

/// Monotonic id generator. Ids are never handed out twice, even after the row
/// they named is gone.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Sequence {
    next: i64,
}

impl Default for Sequence {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl Sequence {
    pub fn next_id(&mut self) -> i64 {
        let id = self.next;
        self.next += 1;
        id
    }
}

// =============================================================================
// 3. THE GENERIC TABLE
// =============================================================================

/// Keyed rows of one entity type, iterated in id order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Table<T: Entity> {
    rows: BTreeMap<T::Id, T>,
}

impl<T: Entity> Default for Table<T> {
    fn default() -> Self {
        Self { rows: BTreeMap::new() }
    }
}

impl<T: Entity> Table<T> {
    pub fn create(&mut self, id: T::Id, payload: T::CreatePayload) -> Result<&T, ShopError> {
        if self.rows.contains_key(&id) {
            return Err(ShopError::validation(format!("Duplicate id: {}", id)));
        }
        let item = T::from_create(id.clone(), payload)?;
        Ok(self.rows.entry(id).or_insert(item))
    }

    pub fn get(&self, id: &T::Id) -> Option<&T> {
        self.rows.get(id)
    }

    pub fn get_mut(&mut self, id: &T::Id) -> Option<&mut T> {
        self.rows.get_mut(id)
    }

    pub fn contains(&self, id: &T::Id) -> bool {
        self.rows.contains_key(id)
    }

    pub fn update(&mut self, id: &T::Id, patch: T::Patch) -> Result<&T, ShopError> {
        let item = self
            .rows
            .get_mut(id)
            .ok_or_else(|| ShopError::not_found(format!("Item not found: {}", id)))?;
        item.on_update(patch)?;
        Ok(item)
    }

    pub fn perform_action(&mut self, id: &T::Id, action: T::Action) -> Result<T::ActionResult, ShopError> {
        let item = self
            .rows
            .get_mut(id)
            .ok_or_else(|| ShopError::not_found(format!("Item not found: {}", id)))?;
        item.handle_action(action)
    }

    pub fn remove(&mut self, id: &T::Id) -> Option<T> {
        self.rows.remove(id)
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.rows.values()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// =============================================================================
// 4. EXAMPLE USAGE (Test)
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct Counter {
        id: i64,
        label: String,
        hits: u32,
    }

    #[derive(Debug)]
    enum CounterAction {
        Hit,
        Reset,
    }

    impl Entity for Counter {
        type Id = i64;
        type CreatePayload = String;
        type Patch = String;
        type Action = CounterAction;
        type ActionResult = u32;

        fn id(&self) -> &i64 {
            &self.id
        }

        fn from_create(id: i64, label: String) -> Result<Self, ShopError> {
            if label.is_empty() {
                return Err(ShopError::validation("label required"));
            }
            Ok(Self { id, label, hits: 0 })
        }

        fn on_update(&mut self, label: String) -> Result<(), ShopError> {
            self.label = label;
            Ok(())
        }

        fn handle_action(&mut self, action: CounterAction) -> Result<u32, ShopError> {
            match action {
                CounterAction::Hit => self.hits += 1,
                CounterAction::Reset => self.hits = 0,
            }
            Ok(self.hits)
        }
    }

    #[test]
    fn test_table_with_actions() {
        let mut seq = Sequence::default();
        let mut table = Table::<Counter>::default();

        let id = seq.next_id();
        table.create(id, "clicks".into()).unwrap();

        assert_eq!(table.perform_action(&id, CounterAction::Hit).unwrap(), 1);
        assert_eq!(table.perform_action(&id, CounterAction::Hit).unwrap(), 2);
        assert_eq!(table.perform_action(&id, CounterAction::Reset).unwrap(), 0);

        table.update(&id, "taps".into()).unwrap();
        assert_eq!(table.get(&id).unwrap().label, "taps");
    }

    #[test]
    fn test_sequence_never_reuses_ids() {
        let mut seq = Sequence::default();
        let mut table = Table::<Counter>::default();

        let first = seq.next_id();
        table.create(first, "a".into()).unwrap();
        table.remove(&first);

        let second = seq.next_id();
        assert_eq!(second, first + 1);
        assert!(table.create(second, "b".into()).is_ok());
        assert!(matches!(table.create(second, "c".into()), Err(ShopError::Validation(_))));
    }

    #[test]
    fn test_missing_rows_are_not_found() {
        let mut table = Table::<Counter>::default();
        assert!(matches!(table.update(&7, "x".into()), Err(ShopError::NotFound(_))));
        assert!(matches!(table.perform_action(&7, CounterAction::Hit), Err(ShopError::NotFound(_))));
        assert!(table.is_empty());
    }

    #[test]
    fn test_table_snapshot_restores_rows() {
        let mut table = Table::<Counter>::default();
        table.create(3, "kept".into()).unwrap();

        let json = serde_json::to_string(&table).unwrap();
        let restored: Table<Counter> = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.get(&3).unwrap().label, "kept");
        assert_eq!(restored.len(), 1);
    }
}
