pub mod cli;
pub mod config;
pub mod fixture;
pub mod simulator;
pub mod store;

pub use nayan_common::{binding, error, protocol, storage};
pub use nayan_core::{session, settings};
