use crate::domain::model::{Document, Router, RoutingModel, Scalar, Service};

/// Extracts routers and services from a parsed configuration.
///
/// Malformed entries are skipped rather than failing the run so that one bad
/// router cannot hide findings about the others.
pub fn build(document: &Document) -> RoutingModel {
    let http = document.get("http");

    let routers = http
        .and_then(|h| h.get("routers"))
        .and_then(Document::as_mapping)
        .map(|routers| {
            routers
                .iter()
                .filter_map(|(name, entry)| extract_router(name, entry))
                .collect()
        })
        .unwrap_or_default();

    let services = http
        .and_then(|h| h.get("services"))
        .and_then(Document::as_mapping)
        .map(|services| {
            services
                .keys()
                .map(|name| Service { name: name.clone() })
                .collect()
        })
        .unwrap_or_default();

    RoutingModel { routers, services }
}

fn extract_router(name: &str, entry: &Document) -> Option<Router> {
    let fields = match entry {
        Document::Mapping(fields) => fields,
        Document::Sequence(_) | Document::Scalar(_) | Document::Null => {
            tracing::debug!(
                "Skipping router '{}': expected a mapping, found {}",
                name,
                entry.kind_name()
            );
            return None;
        }
    };

    let rule = fields
        .get("rule")
        .and_then(Document::as_str)
        .unwrap_or_default()
        .to_string();

    let service_ref = match fields.get("service") {
        Some(Document::Scalar(scalar)) => Some(scalar.to_string()),
        Some(Document::Null) | None => None,
        Some(other) => {
            tracing::debug!(
                "Router '{}' has a {} as service, ignoring it",
                name,
                other.kind_name()
            );
            None
        }
    };

    let tls_domains = fields
        .get("tls")
        .and_then(|tls| tls.get("domains"))
        .map(extract_domains);

    Some(Router {
        name: name.to_string(),
        rule,
        service_ref,
        tls_domains,
    })
}

/// Accepts both a plain list of hostnames and Traefik's `{main, sans}` entries.
fn extract_domains(value: &Document) -> Vec<String> {
    let entries = match value {
        Document::Sequence(entries) => entries,
        Document::Null => return Vec::new(),
        Document::Mapping(_) | Document::Scalar(_) => {
            tracing::debug!("tls.domains is a {}, expected a list", value.kind_name());
            return Vec::new();
        }
    };

    let mut domains = Vec::new();
    for entry in entries {
        match entry {
            Document::Scalar(Scalar::String(domain)) => domains.push(domain.clone()),
            Document::Mapping(fields) => {
                if let Some(main) = fields.get("main").and_then(Document::as_str) {
                    domains.push(main.to_string());
                }
                if let Some(Document::Sequence(sans)) = fields.get("sans") {
                    domains.extend(sans.iter().filter_map(Document::as_str).map(str::to_string));
                }
            }
            Document::Scalar(_) | Document::Sequence(_) | Document::Null => {}
        }
    }
    domains
}
