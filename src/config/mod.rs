//! Configuration Management
//!
//! Hierarchical resolution, lowest to highest priority:
//! 1. Built-in defaults
//! 2. Global config (~/.config/hitlens/config.toml)
//! 3. Project config (./hitlens.toml)
//! 4. Environment (HITLENS_API_URL)
//! 5. CLI arguments (--api-url)

mod loader;
mod types;

pub use loader::{ConfigFormat, ConfigLoader};
pub use types::*;
