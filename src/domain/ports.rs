use crate::domain::model::{Dialect, OutputFormat, RawPayload, SourceMode};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Sink for the raw payload copy.
pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Where the dynamic configuration should be read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Http { base_url: String, endpoint: String },
    File { path: String },
}

impl Target {
    pub fn describe(&self) -> String {
        match self {
            Target::Http { base_url, endpoint } => join_url(base_url, endpoint),
            Target::File { path } => path.clone(),
        }
    }
}

/// `<base>/<endpoint>` with exactly one slash between the halves.
pub fn join_url(base_url: &str, endpoint: &str) -> String {
    let endpoint = endpoint.trim_start_matches('/');
    if endpoint.is_empty() {
        return base_url.trim_end_matches('/').to_string();
    }
    format!("{}/{}", base_url.trim_end_matches('/'), endpoint)
}

pub trait ConfigProvider: Send + Sync {
    fn target(&self) -> Target;
    fn timeout_seconds(&self) -> u64;
    fn headers(&self) -> Vec<(String, String)>;
    fn payload_dialect(&self) -> Dialect;
    fn save_raw_path(&self) -> Option<&str>;
    fn output_format(&self) -> OutputFormat;
}

#[async_trait]
pub trait ConfigSource: Send + Sync {
    async fn fetch(&self) -> Result<RawPayload>;
    fn mode(&self) -> SourceMode;
    fn dialect(&self) -> Dialect;
    fn describe(&self) -> String;
}
