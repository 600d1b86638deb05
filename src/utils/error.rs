use thiserror::Error;

#[derive(Error, Debug)]
pub enum DoctorError {
    #[error("request to {url} timed out after {timeout_secs}s")]
    FetchTimeout { url: String, timeout_secs: u64 },

    #[error("could not connect to {url}: {source}")]
    FetchConnect {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} failed: {source}")]
    FetchTransport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with HTTP status {status}")]
    FetchStatus { url: String, status: u16 },

    #[error("empty body returned by {source_description}")]
    EmptyBody { source_description: String },

    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    #[error("malformed payload from {source_description}: {reason}")]
    MalformedPayload {
        source_description: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Configuration could not be retrieved at all.
    Transport,
    /// Configuration was retrieved but has no usable structure.
    Format,
    Configuration,
    Io,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl DoctorError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            DoctorError::FetchTimeout { .. }
            | DoctorError::FetchConnect { .. }
            | DoctorError::FetchTransport { .. }
            | DoctorError::FetchStatus { .. }
            | DoctorError::EmptyBody { .. }
            | DoctorError::FileNotFound { .. } => ErrorCategory::Transport,
            DoctorError::MalformedPayload { .. } => ErrorCategory::Format,
            DoctorError::ConfigError { .. }
            | DoctorError::ConfigValidationError { .. }
            | DoctorError::InvalidConfigValueError { .. }
            | DoctorError::MissingConfigError { .. } => ErrorCategory::Configuration,
            DoctorError::IoError(_) => ErrorCategory::Io,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration => ErrorSeverity::Medium,
            ErrorCategory::Format => ErrorSeverity::High,
            ErrorCategory::Transport | ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    /// Every error is fatal to a run; the exit code is shared with critical findings.
    pub fn exit_code(&self) -> i32 {
        1
    }

    /// Short label used as the first word of the fatal report line.
    pub fn failure_label(&self) -> &'static str {
        match self {
            DoctorError::EmptyBody { .. } => "empty body",
            DoctorError::MalformedPayload { .. } => "malformed payload",
            DoctorError::FileNotFound { .. } | DoctorError::IoError(_) => "read failed",
            DoctorError::ConfigError { .. }
            | DoctorError::ConfigValidationError { .. }
            | DoctorError::InvalidConfigValueError { .. }
            | DoctorError::MissingConfigError { .. } => "invalid configuration",
            _ => "fetch failed",
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            DoctorError::FetchTimeout { timeout_secs, .. } => format!(
                "The control plane did not answer within {}s. Check that it is running and not overloaded, or raise --timeout",
                timeout_secs
            ),
            DoctorError::FetchConnect { .. } => {
                "Check --base-url and that the control plane container is up and reachable from this host".to_string()
            }
            DoctorError::FetchTransport { .. } => {
                "Retry the request; if it keeps failing inspect the control plane logs".to_string()
            }
            DoctorError::FetchStatus { status, .. } if *status == 401 || *status == 403 => {
                "The endpoint rejected the request. Pass the required credentials with --header".to_string()
            }
            DoctorError::FetchStatus { status, .. } if *status >= 500 => {
                "The control plane failed to build the configuration. Inspect its logs for the failing resource".to_string()
            }
            DoctorError::FetchStatus { .. } => {
                "Check that --endpoint points at the dynamic configuration route".to_string()
            }
            DoctorError::EmptyBody { .. } => {
                "The configuration was retrieved but contains nothing. The generator may not have produced any routes yet".to_string()
            }
            DoctorError::FileNotFound { .. } => {
                "Check the path to the dynamic configuration file".to_string()
            }
            DoctorError::MalformedPayload { .. } => {
                "Save the payload with --save-raw and inspect it; the endpoint may be returning an error page".to_string()
            }
            DoctorError::IoError(_) => "Check file permissions and free disk space".to_string(),
            DoctorError::ConfigError { .. }
            | DoctorError::ConfigValidationError { .. }
            | DoctorError::InvalidConfigValueError { .. }
            | DoctorError::MissingConfigError { .. } => {
                "Fix the command line flags or the TOML configuration file".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Transport => format!("Could not retrieve configuration: {}", self),
            ErrorCategory::Format => format!("Retrieved configuration is unusable: {}", self),
            ErrorCategory::Configuration => format!("Invalid settings: {}", self),
            ErrorCategory::Io => format!("File system error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, DoctorError>;
