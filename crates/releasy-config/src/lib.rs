//! Configuration management for Releasy.
//!
//! Loads and validates `releasy.toml`. Every key has a default, so an empty
//! file (or none at all, for commands that tolerate it) yields a usable
//! [`Config`].

mod error;
mod loader;
mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{CONFIG_FILE_NAME, find_and_load_config, find_and_load_config_from, load_config};
pub use schema::{Config, GitConfig, GithubConfig, NotesConfig, VersionConfig};
