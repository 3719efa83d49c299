pub mod loader;

pub use loader::{ConfigError, ConfigLoader};
pub use nayan_core::config::NayanConfig;
