//! Application configuration module.
//!
//! Manages the TOML config file holding API locale, carousel paging and
//! image size settings. Credentials are read from the environment only.

#[allow(clippy::module_inception)]
mod config;
mod paths;

#[allow(clippy::module_name_repetitions)]
pub use config::{ApiConfig, AppConfig};
pub use paths::{config_dir, resolve_config_path};
