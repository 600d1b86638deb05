use crate::config::{PayloadFormat, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT_SECS, MAX_TIMEOUT_SECS};
use crate::core::{ConfigProvider, Target};
use crate::domain::model::{Dialect, OutputFormat};
use crate::utils::error::{DoctorError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub source: SourceConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub base_url: Option<String>,
    pub endpoint: Option<String>,
    pub file: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub payload_format: Option<PayloadFormat>,
    pub headers: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub save_raw: Option<String>,
    pub format: Option<OutputFormat>,
}

fn env_var_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"))
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(DoctorError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| DoctorError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Expands `${VAR}` from the environment; unset variables are left as written.
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }

    /// Command line values win over the file.
    pub fn apply_overrides(
        &mut self,
        timeout: Option<u64>,
        save_raw: Option<String>,
        format: Option<OutputFormat>,
    ) {
        if let Some(timeout) = timeout {
            tracing::info!("🔧 Timeout overridden to: {}s", timeout);
            self.source.timeout_seconds = Some(timeout);
        }
        if let Some(path) = save_raw {
            self.output.save_raw = Some(path);
        }
        if let Some(format) = format {
            self.output.format = Some(format);
        }
    }

    pub fn validate_config(&self) -> Result<()> {
        match (&self.source.base_url, &self.source.file) {
            (Some(_), Some(_)) => {
                return Err(DoctorError::ConfigValidationError {
                    field: "source".to_string(),
                    message: "set either base_url or file, not both".to_string(),
                })
            }
            (None, None) => {
                return Err(DoctorError::MissingConfigError {
                    field: "source.base_url or source.file".to_string(),
                })
            }
            (Some(base_url), None) => {
                validation::validate_url("source.base_url", base_url)?;
                if let Some(endpoint) = &self.source.endpoint {
                    validation::validate_non_empty_string("source.endpoint", endpoint)?;
                }
            }
            (None, Some(file)) => validation::validate_path("source.file", file)?,
        }

        validation::validate_range(
            "source.timeout_seconds",
            self.timeout_seconds(),
            1,
            MAX_TIMEOUT_SECS,
        )?;

        if let Some(headers) = &self.source.headers {
            for (name, value) in headers {
                validation::validate_header_name("source.headers", name)?;
                if value.contains("${") {
                    return Err(DoctorError::InvalidConfigValueError {
                        field: format!("source.headers.{}", name),
                        value: value.clone(),
                        reason: "references an environment variable that is not set".to_string(),
                    });
                }
            }
        }

        if let Some(path) = &self.output.save_raw {
            validation::validate_path("output.save_raw", path)?;
        }

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn target(&self) -> Target {
        match (&self.source.file, &self.source.base_url) {
            (Some(path), _) => Target::File { path: path.clone() },
            (None, base_url) => Target::Http {
                base_url: base_url.clone().unwrap_or_default(),
                endpoint: self
                    .source
                    .endpoint
                    .clone()
                    .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            },
        }
    }

    fn timeout_seconds(&self) -> u64 {
        self.source.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECS)
    }

    fn headers(&self) -> Vec<(String, String)> {
        self.source
            .headers
            .as_ref()
            .map(|headers| {
                headers
                    .iter()
                    .map(|(name, value)| (name.clone(), value.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn payload_dialect(&self) -> Dialect {
        self.source.payload_format.unwrap_or_default().into()
    }

    fn save_raw_path(&self) -> Option<&str> {
        self.output.save_raw.as_deref()
    }

    fn output_format(&self) -> OutputFormat {
        self.output.format.unwrap_or_default()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
