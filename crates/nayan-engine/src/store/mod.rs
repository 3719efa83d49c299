pub mod file_store;

pub use file_store::FileStore;
pub use nayan_core::store::{KeyValueStore, MemoryStore};
