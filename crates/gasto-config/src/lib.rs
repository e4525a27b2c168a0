//! gasto-config
//!
//! User preferences for the Gastômetro shell and their on-disk persistence,
//! including timestamped backups.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::ConfigManager;
pub use model::{default_base_dir, Config, HOME_ENV};
