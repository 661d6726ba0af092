//! TOML configuration: remote source, local storage and list view.

mod loader;
mod types;

pub use loader::ConfigError;
pub use types::{Config, SourceConfig, StorageConfig, ViewConfig};
