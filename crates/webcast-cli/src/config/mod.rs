//! Application configuration module.
//!
//! Manages the TOML config file holding the API key and an optional
//! API domain override.

#[allow(clippy::module_inception)]
mod config;
mod paths;

#[allow(clippy::module_name_repetitions)]
pub use config::{AppConfig, resolve_api_key};
pub use paths::resolve_config_path;
