pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{cli::LocalStorage, toml_config::TomlConfig};
pub use core::{doctor::DoctorEngine, source::TargetSource};
pub use utils::error::{DoctorError, Result};
