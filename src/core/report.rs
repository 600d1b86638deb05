//! Report rendering.
//!
//! Output is a pure function of the inspection, so identical input always
//! renders byte-identical reports.

use crate::domain::model::{Finding, FormatKind, Inspection, OutputFormat};
use crate::utils::error::{DoctorError, Result};
use serde::Serialize;

#[derive(Serialize)]
struct JsonReport<'a> {
    source: &'a str,
    http_status: Option<u16>,
    byte_count: usize,
    format: FormatKind,
    router_count: usize,
    service_count: usize,
    critical_count: usize,
    warning_count: usize,
    exit_code: i32,
    findings: &'a [Finding],
}

#[derive(Serialize)]
struct JsonFailure {
    error: String,
    failure: &'static str,
    exit_code: i32,
}

pub fn render(inspection: &Inspection, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => render_text(inspection),
        OutputFormat::Json => render_json(inspection),
    }
}

pub fn render_failure(error: &DoctorError, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format!(
            "[ERROR] {}: {}\nSummary: configuration could not be validated ({}), no checks were run\n",
            error.failure_label(),
            error,
            error.failure_label()
        ),
        OutputFormat::Json => {
            let failure = JsonFailure {
                error: error.to_string(),
                failure: error.failure_label(),
                exit_code: error.exit_code(),
            };
            // Only strings and integers; serialisation cannot fail.
            serde_json::to_string_pretty(&failure).unwrap_or_default() + "\n"
        }
    }
}

/// Rendered report and process exit code for a finished run.
pub fn conclude(result: &Result<Inspection>, format: OutputFormat) -> (String, i32) {
    match result {
        Ok(inspection) => (render(inspection, format), inspection.report.exit_code()),
        Err(error) => (render_failure(error, format), error.exit_code()),
    }
}

fn render_text(inspection: &Inspection) -> String {
    let report = &inspection.report;
    let mut lines = Vec::with_capacity(report.findings.len() + 3);

    let status = inspection
        .http_status
        .map(|s| format!("HTTP {}, ", s))
        .unwrap_or_default();
    lines.push(format!(
        "[INFO] source: {} ({}{} bytes)",
        inspection.source, status, inspection.byte_count
    ));
    lines.push(format!(
        "[INFO] routers: {}, services: {}",
        report.router_count, report.service_count
    ));

    for finding in &report.findings {
        lines.push(format!("[{}] {}", finding.severity.token(), finding.message));
    }

    lines.push(format!(
        "Summary: {} critical, {} warning(s)",
        report.critical_count(),
        report.warning_count()
    ));

    lines.join("\n") + "\n"
}

fn render_json(inspection: &Inspection) -> String {
    let report = &inspection.report;
    let json = JsonReport {
        source: &inspection.source,
        http_status: inspection.http_status,
        byte_count: inspection.byte_count,
        format: inspection.format,
        router_count: report.router_count,
        service_count: report.service_count,
        critical_count: report.critical_count(),
        warning_count: report.warning_count(),
        exit_code: report.exit_code(),
        findings: &report.findings,
    };
    serde_json::to_string_pretty(&json).unwrap_or_default() + "\n"
}
