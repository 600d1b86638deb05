use crate::config::cli::LocalStorage;
use crate::core::parser::{self, ParsedDocument};
use crate::core::source::TargetSource;
use crate::core::{model_builder, references, tls};
use crate::domain::model::{
    Dialect, Finding, FindingCategory, Inspection, RawPayload, SourceMode, ValidationReport,
};
use crate::domain::ports::{ConfigProvider, ConfigSource, Storage};
use crate::utils::error::{DoctorError, Result};

/// Builds the source described by `config` and runs a single inspection,
/// saving the raw payload when the configuration asks for it.
pub async fn inspect<C: ConfigProvider>(config: &C) -> Result<Inspection> {
    let engine = DoctorEngine::new(TargetSource::from_config(config)?);

    match config.save_raw_path() {
        Some(path) => {
            engine
                .with_raw_sink(LocalStorage::default(), path)
                .run()
                .await
        }
        None => engine.run().await,
    }
}

/// Runs one fetch → parse → extract → validate pass.
pub struct DoctorEngine<C: ConfigSource, S: Storage = LocalStorage> {
    source: C,
    raw_sink: Option<(S, String)>,
}

impl<C: ConfigSource> DoctorEngine<C> {
    pub fn new(source: C) -> Self {
        Self {
            source,
            raw_sink: None,
        }
    }
}

impl<C: ConfigSource, S: Storage> DoctorEngine<C, S> {
    /// Also write the untouched payload to `path` through `storage`.
    pub fn with_raw_sink<T: Storage>(self, storage: T, path: impl Into<String>) -> DoctorEngine<C, T> {
        DoctorEngine {
            source: self.source,
            raw_sink: Some((storage, path.into())),
        }
    }

    pub async fn run(&self) -> Result<Inspection> {
        tracing::info!("🔎 Inspecting dynamic configuration from {}", self.source.describe());

        let payload = self.source.fetch().await?;
        self.persist_raw(&payload).await;

        let dialect = self.source.dialect();
        let parsed = parser::parse(&payload, &dialect);
        let format = parsed.kind();
        tracing::debug!("Payload classified as {:?}", format);

        let report = self.evaluate(&payload, &dialect, parsed)?;

        tracing::info!(
            "Checked {} routers against {} services: {} critical, {} warning(s)",
            report.router_count,
            report.service_count,
            report.critical_count(),
            report.warning_count()
        );

        Ok(Inspection {
            source: payload.source_description.clone(),
            http_status: payload.http_status,
            byte_count: payload.byte_count,
            format,
            report,
        })
    }

    fn evaluate(
        &self,
        payload: &RawPayload,
        dialect: &Dialect,
        parsed: ParsedDocument,
    ) -> Result<ValidationReport> {
        let mode = self.source.mode();

        match parsed {
            ParsedDocument::ParsedObject(document) => {
                let model = model_builder::build(&document);

                let mut findings = references::validate(&model.routers, &model.services);
                findings.extend(tls::validate(&model.routers));

                Ok(ValidationReport::aggregate(
                    findings,
                    model.routers.len(),
                    model.services.len(),
                ))
            }
            ParsedDocument::Empty => Err(DoctorError::EmptyBody {
                source_description: payload.source_description.clone(),
            }),
            ParsedDocument::MissingHttp => match mode {
                SourceMode::Fetch => Err(DoctorError::MalformedPayload {
                    source_description: payload.source_description.clone(),
                    reason: "no `http` section with routers or services".to_string(),
                }),
                SourceMode::File => Ok(format_only(Finding::warning(
                    FindingCategory::MissingRoutingSection,
                    "configuration has no `http` section with routers or services; semantic checks skipped",
                    None,
                ))),
            },
            ParsedDocument::Unsupported { dialect } => Ok(format_only(Finding::warning(
                FindingCategory::UnsupportedFormat,
                format!(
                    "unsupported configuration format `{}`; semantic checks skipped",
                    dialect
                ),
                None,
            ))),
            ParsedDocument::NonParseable { message, .. } => match mode {
                SourceMode::Fetch => Err(DoctorError::MalformedPayload {
                    source_description: payload.source_description.clone(),
                    reason: format!("body is not valid {}: {}", dialect, message),
                }),
                SourceMode::File => Ok(format_only(Finding::critical(
                    FindingCategory::ParseError,
                    format!("config file {} parse error: {}", dialect, message),
                    None,
                ))),
            },
            ParsedDocument::ParsedNonObject { found } => match mode {
                SourceMode::Fetch => Err(DoctorError::MalformedPayload {
                    source_description: payload.source_description.clone(),
                    reason: format!("top-level value is a {}, expected an object", found),
                }),
                SourceMode::File => Ok(format_only(Finding::critical(
                    FindingCategory::UnexpectedShape,
                    format!(
                        "config file top-level value is a {}, expected a mapping",
                        found
                    ),
                    None,
                ))),
            },
        }
    }

    async fn persist_raw(&self, payload: &RawPayload) {
        let Some((storage, path)) = &self.raw_sink else {
            return;
        };

        match storage.write_file(path, &payload.bytes).await {
            Ok(()) => tracing::info!("💾 Raw payload ({} bytes) saved to {}", payload.byte_count, path),
            Err(e) => tracing::warn!("Could not save raw payload to {}: {}", path, e),
        }
    }
}

fn format_only(finding: Finding) -> ValidationReport {
    ValidationReport::aggregate(vec![finding], 0, 0)
}
