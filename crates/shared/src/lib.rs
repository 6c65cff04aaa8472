//! Shared library for the Anime Hub catalog client.
//!
//! This crate provides the pieces that do not depend on the network:
//! - Configuration management
//! - SQLite-backed local storage and the credential store
//! - Catalog data models
//! - Logging infrastructure

pub mod config;
pub mod db;
pub mod logging;
pub mod models;
pub mod storage;

// Re-export commonly used types
pub use config::Config;
pub use db::Database;
pub use logging::LogConfig;
pub use models::*;
pub use storage::{CredentialStore, LocalStorage};

/// Common result type using anyhow::Error
pub type Result<T> = anyhow::Result<T>;
