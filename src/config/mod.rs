//! Configuration module for the lobby daemon.
//!
//! Handles loading and validating daemon configuration from TOML files.

mod settings;

pub use settings::*;
