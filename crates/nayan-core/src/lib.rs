pub mod combo;
pub mod config;
pub mod dispatcher;
pub mod dom;
pub mod domain;
pub mod event;
pub mod feedback;
pub mod locale;
pub mod page;
pub mod picker;
pub mod recording;
pub mod selector;
pub mod session;
pub mod settings;
pub mod store;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use nayan_common::{binding, protocol, storage};
