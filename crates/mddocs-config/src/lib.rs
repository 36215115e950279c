pub mod config;
pub mod error;
pub mod templates;

pub use config::{Config, PageConfig};
pub use error::ConfigError;
