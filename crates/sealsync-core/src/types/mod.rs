//! Type definitions for sealsync configuration

mod config_types;
mod target_types;

pub use config_types::*;
pub use target_types::*;
