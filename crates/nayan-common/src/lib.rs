pub mod binding;
pub mod combo;
pub mod error;
pub mod protocol;
pub mod storage;

pub use binding::{ShortcutBinding, ShortcutTable, TableError, Upsert};
pub use combo::{ComboError, ComboToken, Modifiers};
pub use error::StoreError;
pub use storage::{LANGUAGE_KEY, StorageChange, StoredValue};
