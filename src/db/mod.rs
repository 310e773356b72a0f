pub mod memory;
pub mod pool;
pub mod postgres;
pub mod store;

pub use memory::MemoryEntryStore;
pub use postgres::PgEntryStore;
pub use store::{EntryStore, StoreBackend, StoreError, StoreResult};
