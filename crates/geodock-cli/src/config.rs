//! Layered configuration for the CLI.
//!
//! Values resolve from built-in defaults, then the TOML file, then command-line flags,
//! and finally `-S key=value` overrides.

pub mod builder;
pub mod defaults;
pub mod file;
pub mod models;

pub use builder::build_config;
pub use models::AppConfig;
