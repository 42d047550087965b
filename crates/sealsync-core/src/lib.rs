//! # sealsync-core
//!
//! Core library for the sealsync CLI providing:
//! - Configuration file parsing (sealsync.yaml)
//! - Environment variable overrides (SEALSYNC_* prefix)
//! - Shared types for repositories and backup targets

pub mod config;
pub mod error;
pub mod types;

pub use config::SealsyncConfig;
pub use error::{Error, Result};
pub use types::{BackupTarget, RepoRef};
