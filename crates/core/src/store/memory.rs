use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::holding::Holding;
use super::HoldingStore;

/// In-memory holding store, kept sorted by purchase date.
///
/// The default backing for tests and single-session use; anything that
/// must survive a restart belongs behind a different `HoldingStore`
/// implementation.
#[derive(Debug, Default)]
pub struct MemoryHoldingStore {
    holdings: Vec<Holding>,
}

impl MemoryHoldingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.holdings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }

    /// Binary insert into the date-sorted vec in O(log n).
    fn insert_sorted(&mut self, holding: Holding) {
        let pos = self
            .holdings
            .binary_search_by_key(&holding.purchase_date, |h| h.purchase_date)
            .unwrap_or_else(|pos| pos);
        self.holdings.insert(pos, holding);
    }
}

impl HoldingStore for MemoryHoldingStore {
    fn list(&self) -> Vec<Holding> {
        self.holdings.clone()
    }

    fn get(&self, id: Uuid) -> Option<Holding> {
        self.holdings.iter().find(|h| h.id == id).cloned()
    }

    fn create(&mut self, holding: Holding) -> Uuid {
        let id = holding.id;
        self.insert_sorted(holding);
        id
    }

    fn update(&mut self, id: Uuid, mut holding: Holding) -> Result<(), CoreError> {
        let idx = self
            .holdings
            .iter()
            .position(|h| h.id == id)
            .ok_or_else(|| CoreError::HoldingNotFound(id.to_string()))?;

        holding.id = id;
        self.holdings.remove(idx);
        self.insert_sorted(holding);
        Ok(())
    }

    fn delete(&mut self, id: Uuid) -> Result<(), CoreError> {
        let idx = self
            .holdings
            .iter()
            .position(|h| h.id == id)
            .ok_or_else(|| CoreError::HoldingNotFound(id.to_string()))?;
        self.holdings.remove(idx);
        Ok(())
    }
}
