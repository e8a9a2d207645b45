pub mod memory;

pub use memory::MemoryHoldingStore;

use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::holding::Holding;

/// Storage seam for holdings (SOLID: Dependency Inversion).
///
/// The core never issues raw queries; it receives materialized records
/// through this trait. Hosts back it with whatever they like — the
/// in-memory implementation here, SQLite, a sync service — without
/// touching the computation code.
pub trait HoldingStore: Send + Sync {
    /// All holdings, ordered by purchase date (oldest first).
    fn list(&self) -> Vec<Holding>;

    /// A single holding by id.
    fn get(&self, id: Uuid) -> Option<Holding>;

    /// Insert a holding, returning its id.
    fn create(&mut self, holding: Holding) -> Uuid;

    /// Replace all fields of an existing holding. The stored id wins
    /// over whatever id the replacement carries.
    fn update(&mut self, id: Uuid, holding: Holding) -> Result<(), CoreError>;

    /// Remove a holding.
    fn delete(&mut self, id: Uuid) -> Result<(), CoreError>;
}
