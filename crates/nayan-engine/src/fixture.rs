//! Page fixtures for the simulator.
//!
//! A fixture is a JSON [`PageSpec`]:
//!
//! ```json
//! { "url": "https://example.com/", "body": [ { "tag": "button", "attributes": { "id": "go" } } ] }
//! ```

use nayan_core::dom::{MemoryPage, PageSpec};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("Failed to read fixture: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse fixture: {0}")]
    Parse(#[from] serde_json::Error),
}

pub async fn load_spec(path: &Path) -> Result<PageSpec, FixtureError> {
    let content = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&content)?)
}

pub async fn load_page(path: &Path) -> Result<MemoryPage, FixtureError> {
    Ok(MemoryPage::from_spec(&load_spec(path).await?))
}
