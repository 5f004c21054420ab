//! Entity identity, state and available-index persistence.

pub mod identity;
pub mod state;
pub mod storage;


pub use identity::{EntityIdentity, derive_entity_id, mac_to_eui64};
pub use state::EntityState;
pub use storage::{FileIndexStore, IndexStore, MemoryIndexStore, StorageError};
