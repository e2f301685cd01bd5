//! Configuration for the msprite tool
//!
//! Provides types, discovery and parsing for `msprite.toml`.

pub mod loader;
pub mod schema;

pub use loader::{find_config, find_config_from, load_config, merge_cli_overrides, CliOverrides, ConfigError};
pub use schema::*;
