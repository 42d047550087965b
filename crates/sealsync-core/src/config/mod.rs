//! Configuration loading and management

mod env;
mod loader;

pub use env::{apply_env_overrides, ENV_PREFIX};
pub use loader::{SealsyncConfig, CONFIG_FILE_NAMES};
