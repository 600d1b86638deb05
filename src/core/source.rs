use crate::domain::model::{Dialect, RawPayload, SourceMode};
use crate::domain::ports::{ConfigProvider, ConfigSource, Target};
use crate::utils::error::{DoctorError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::path::Path;
use std::time::Duration;

/// Single bounded GET against the control plane. No retries.
pub struct HttpSource {
    url: String,
    timeout_secs: u64,
    headers: Vec<(String, String)>,
    dialect: Dialect,
    client: Client,
}

impl HttpSource {
    pub fn new(url: impl Into<String>, timeout_secs: u64) -> Result<Self> {
        let timeout = Duration::from_secs(timeout_secs);
        let client = Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .map_err(|e| DoctorError::ConfigError {
                message: format!("could not build HTTP client: {}", e),
            })?;

        Ok(Self {
            url: url.into(),
            timeout_secs,
            headers: Vec::new(),
            dialect: Dialect::Json,
            client,
        })
    }

    pub fn with_headers(mut self, headers: Vec<(String, String)>) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    fn transport_error(&self, e: reqwest::Error) -> DoctorError {
        if e.is_timeout() {
            DoctorError::FetchTimeout {
                url: self.url.clone(),
                timeout_secs: self.timeout_secs,
            }
        } else if e.is_connect() {
            DoctorError::FetchConnect {
                url: self.url.clone(),
                source: e,
            }
        } else {
            DoctorError::FetchTransport {
                url: self.url.clone(),
                source: e,
            }
        }
    }
}

#[async_trait]
impl ConfigSource for HttpSource {
    async fn fetch(&self) -> Result<RawPayload> {
        let mut request = self.client.get(&self.url);
        for (name, value) in &self.headers {
            request = request.header(name, value);
        }

        tracing::debug!("Requesting dynamic configuration from: {}", self.url);
        let response = request.send().await.map_err(|e| self.transport_error(e))?;
        let status = response.status();
        tracing::debug!("Control plane response status: {}", status);

        if status != StatusCode::OK {
            return Err(DoctorError::FetchStatus {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?;

        if body.is_empty() {
            return Err(DoctorError::EmptyBody {
                source_description: self.url.clone(),
            });
        }

        tracing::info!("📥 Received {} bytes from {}", body.len(), self.url);
        Ok(RawPayload::new(
            body.to_vec(),
            self.url.clone(),
            Some(status.as_u16()),
        ))
    }

    fn mode(&self) -> SourceMode {
        SourceMode::Fetch
    }

    fn dialect(&self) -> Dialect {
        self.dialect.clone()
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Dynamic configuration read from disk; the dialect follows the extension.
pub struct FileSource {
    path: String,
    dialect: Dialect,
}

impl FileSource {
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let dialect = dialect_for_path(&path);
        Self { path, dialect }
    }
}

pub fn dialect_for_path(path: &str) -> Dialect {
    match Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
    {
        None => Dialect::Yaml,
        Some(ext) => match ext.as_str() {
            "json" => Dialect::Json,
            "yml" | "yaml" => Dialect::Yaml,
            _ => Dialect::Unsupported(ext),
        },
    }
}

#[async_trait]
impl ConfigSource for FileSource {
    async fn fetch(&self) -> Result<RawPayload> {
        tracing::debug!("Reading dynamic configuration from: {}", self.path);

        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(DoctorError::FileNotFound {
                    path: self.path.clone(),
                })
            }
            Err(e) => return Err(DoctorError::IoError(e)),
        };

        if bytes.is_empty() {
            return Err(DoctorError::EmptyBody {
                source_description: self.path.clone(),
            });
        }

        tracing::info!("📄 Read {} bytes from {}", bytes.len(), self.path);
        Ok(RawPayload::new(bytes, self.path.clone(), None))
    }

    fn mode(&self) -> SourceMode {
        SourceMode::File
    }

    fn dialect(&self) -> Dialect {
        self.dialect.clone()
    }

    fn describe(&self) -> String {
        self.path.clone()
    }
}

/// Source picked at runtime from a [`ConfigProvider`] target.
pub enum TargetSource {
    Http(HttpSource),
    File(FileSource),
}

impl TargetSource {
    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let target = config.target();
        match target {
            Target::Http { .. } => {
                let source = HttpSource::new(target.describe(), config.timeout_seconds())?
                    .with_headers(config.headers())
                    .with_dialect(config.payload_dialect());
                Ok(TargetSource::Http(source))
            }
            Target::File { path } => Ok(TargetSource::File(FileSource::new(path))),
        }
    }
}

#[async_trait]
impl ConfigSource for TargetSource {
    async fn fetch(&self) -> Result<RawPayload> {
        match self {
            TargetSource::Http(source) => source.fetch().await,
            TargetSource::File(source) => source.fetch().await,
        }
    }

    fn mode(&self) -> SourceMode {
        match self {
            TargetSource::Http(source) => source.mode(),
            TargetSource::File(source) => source.mode(),
        }
    }

    fn dialect(&self) -> Dialect {
        match self {
            TargetSource::Http(source) => source.dialect(),
            TargetSource::File(source) => source.dialect(),
        }
    }

    fn describe(&self) -> String {
        match self {
            TargetSource::Http(source) => source.describe(),
            TargetSource::File(source) => source.describe(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use std::io::Write;
    use tempfile::Builder;

    #[tokio::test]
    async fn test_fetch_successful_response() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/api/v1/traefik-config");
            then.status(200)
                .header("Content-Type", "application/json")
                .body(r#"{"http":{"routers":{},"services":{}}}"#);
        });

        let source = HttpSource::new(server.url("/api/v1/traefik-config"), 5).unwrap();
        let payload = source.fetch().await.unwrap();

        api_mock.assert();
        assert_eq!(payload.http_status, Some(200));
        assert_eq!(payload.byte_count, payload.bytes.len());
        assert!(payload.byte_count > 0);
        assert_eq!(source.mode(), SourceMode::Fetch);
    }

    #[tokio::test]
    async fn test_fetch_sends_extra_headers() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/config")
                .header("Authorization", "Bearer secret");
            then.status(200).body("{}");
        });

        let source = HttpSource::new(server.url("/config"), 5)
            .unwrap()
            .with_headers(vec![(
                "Authorization".to_string(),
                "Bearer secret".to_string(),
            )]);

        assert!(source.fetch().await.is_ok());
        api_mock.assert();
    }

    #[tokio::test]
    async fn test_fetch_non_200_is_status_error() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/config");
            then.status(504);
        });

        let source = HttpSource::new(server.url("/config"), 5).unwrap();
        let err = source.fetch().await.unwrap_err();

        api_mock.assert();
        assert!(matches!(err, DoctorError::FetchStatus { status: 504, .. }));
    }

    #[tokio::test]
    async fn test_fetch_empty_body_is_distinct_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/config");
            then.status(200).body("");
        });

        let source = HttpSource::new(server.url("/config"), 5).unwrap();
        let err = source.fetch().await.unwrap_err();

        assert!(matches!(err, DoctorError::EmptyBody { .. }));
        assert_eq!(err.failure_label(), "empty body");
    }

    #[tokio::test]
    async fn test_fetch_timeout() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/slow");
            then.status(200)
                .body("{}")
                .delay(Duration::from_secs(3));
        });

        let source = HttpSource::new(server.url("/slow"), 1).unwrap();
        let err = source.fetch().await.unwrap_err();

        assert!(matches!(err, DoctorError::FetchTimeout { timeout_secs: 1, .. }));
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        // Port 9 (discard) is not expected to accept HTTP connections.
        let source = HttpSource::new("http://127.0.0.1:9/config", 2).unwrap();
        let err = source.fetch().await.unwrap_err();

        assert!(matches!(
            err,
            DoctorError::FetchConnect { .. }
                | DoctorError::FetchTransport { .. }
                | DoctorError::FetchTimeout { .. }
        ));
        assert_eq!(err.failure_label(), "fetch failed");
    }

    #[tokio::test]
    async fn test_file_source_reads_contents() {
        let mut file = Builder::new().suffix(".yml").tempfile().unwrap();
        file.write_all(b"http:\n  routers: {}\n").unwrap();

        let source = FileSource::new(file.path().to_str().unwrap());
        let payload = source.fetch().await.unwrap();

        assert_eq!(payload.http_status, None);
        assert_eq!(payload.byte_count, 20);
        assert_eq!(source.dialect(), Dialect::Yaml);
        assert_eq!(source.mode(), SourceMode::File);
    }

    #[tokio::test]
    async fn test_file_source_missing_file() {
        let source = FileSource::new("/definitely/not/here/dynamic.yml");
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, DoctorError::FileNotFound { .. }));
    }

    #[tokio::test]
    async fn test_file_source_empty_file() {
        let file = Builder::new().suffix(".json").tempfile().unwrap();
        let source = FileSource::new(file.path().to_str().unwrap());
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, DoctorError::EmptyBody { .. }));
    }

    #[test]
    fn test_dialect_for_path() {
        assert_eq!(dialect_for_path("dynamic.json"), Dialect::Json);
        assert_eq!(dialect_for_path("dynamic.YAML"), Dialect::Yaml);
        assert_eq!(dialect_for_path("dynamic.yml"), Dialect::Yaml);
        assert_eq!(dialect_for_path("dynamic"), Dialect::Yaml);
        assert_eq!(
            dialect_for_path("dynamic.toml"),
            Dialect::Unsupported("toml".to_string())
        );
    }
}
