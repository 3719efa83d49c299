pub mod schema;

pub use schema::{FeedbackConfig, NayanConfig, PickerConfig, RecordingConfig, StorageConfig};
