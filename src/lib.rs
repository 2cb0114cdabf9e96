pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::memory::Catalog;
pub use app::Session;
pub use config::{Settings, TomlConfig};
pub use crate::core::{FileInterpreter, ParseError, Report, ScoreWeights};
pub use utils::error::{ImagelynError, Result};
