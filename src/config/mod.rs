pub mod cli;
pub mod toml_config;

use crate::domain::model::Dialect;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "http://localhost:3001";
pub const DEFAULT_ENDPOINT: &str = "api/v1/traefik-config";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const MAX_TIMEOUT_SECS: u64 = 300;

/// Language the control plane answers in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum PayloadFormat {
    #[default]
    Json,
    Yaml,
}

impl From<PayloadFormat> for Dialect {
    fn from(format: PayloadFormat) -> Self {
        match format {
            PayloadFormat::Json => Dialect::Json,
            PayloadFormat::Yaml => Dialect::Yaml,
        }
    }
}

#[cfg(feature = "cli")]
pub use self::cli_config::CliConfig;

#[cfg(feature = "cli")]
mod cli_config {
    use super::{PayloadFormat, DEFAULT_BASE_URL, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT_SECS, MAX_TIMEOUT_SECS};
    use crate::core::{ConfigProvider, Target};
    use crate::domain::model::{Dialect, OutputFormat};
    use crate::utils::error::Result;
    use crate::utils::validation::{self, Validate};
    use clap::Parser;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize, Parser)]
    #[command(name = "traefik-doctor")]
    #[command(about = "Validate the dynamic Traefik configuration served by a control plane")]
    pub struct CliConfig {
        /// Base URL of the control plane API
        #[arg(long, default_value = DEFAULT_BASE_URL, conflicts_with = "config")]
        pub base_url: String,

        /// Path of the dynamic configuration endpoint, relative to the base URL
        #[arg(long, default_value = DEFAULT_ENDPOINT, conflicts_with = "config")]
        pub endpoint: String,

        /// Read the configuration from a local file instead of fetching it
        #[arg(long, conflicts_with = "config")]
        pub file: Option<String>,

        /// Request timeout in seconds (connect and total)
        #[arg(long)]
        pub timeout: Option<u64>,

        /// Extra request header, as 'Name: value' (repeatable)
        #[arg(long = "header", conflicts_with = "config")]
        pub headers: Vec<String>,

        /// Language of the HTTP payload
        #[arg(long, value_enum, conflicts_with = "config")]
        pub payload_format: Option<PayloadFormat>,

        /// Save the raw payload to this path
        #[arg(long)]
        pub save_raw: Option<String>,

        /// Report format
        #[arg(long, value_enum)]
        pub format: Option<OutputFormat>,

        /// Load settings from a TOML file; --timeout, --save-raw and --format override it,
        /// the source flags cannot be combined with it
        #[arg(short, long)]
        pub config: Option<String>,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Emit logs as JSON")]
        pub log_json: bool,
    }

    impl ConfigProvider for CliConfig {
        fn target(&self) -> Target {
            match &self.file {
                Some(path) => Target::File { path: path.clone() },
                None => Target::Http {
                    base_url: self.base_url.clone(),
                    endpoint: self.endpoint.clone(),
                },
            }
        }

        fn timeout_seconds(&self) -> u64 {
            self.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS)
        }

        fn headers(&self) -> Vec<(String, String)> {
            // Malformed entries are rejected by `validate` before a run.
            self.headers
                .iter()
                .filter_map(|raw| validation::parse_header("header", raw).ok())
                .collect()
        }

        fn payload_dialect(&self) -> Dialect {
            self.payload_format.unwrap_or_default().into()
        }

        fn save_raw_path(&self) -> Option<&str> {
            self.save_raw.as_deref()
        }

        fn output_format(&self) -> OutputFormat {
            self.format.unwrap_or_default()
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            match &self.file {
                Some(path) => validation::validate_path("file", path)?,
                None => {
                    validation::validate_url("base_url", &self.base_url)?;
                    validation::validate_non_empty_string("endpoint", &self.endpoint)?;
                }
            }

            validation::validate_range("timeout", self.timeout_seconds(), 1, MAX_TIMEOUT_SECS)?;

            for raw in &self.headers {
                validation::parse_header("header", raw)?;
            }

            if let Some(path) = &self.save_raw {
                validation::validate_path("save_raw", path)?;
            }

            Ok(())
        }
    }

}
