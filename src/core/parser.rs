//! Payload classification and normalisation into a [`Document`].
//!
//! Parsing never fails hard: every outcome, including a syntax error, is a
//! [`ParsedDocument`] variant and the caller decides what is fatal.

use crate::domain::model::{Dialect, Document, FormatKind, RawPayload, Scalar};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub enum ParsedDocument {
    Empty,
    NonParseable { dialect: Dialect, message: String },
    ParsedNonObject { found: &'static str },
    MissingHttp,
    Unsupported { dialect: Dialect },
    ParsedObject(Document),
}

impl ParsedDocument {
    pub fn kind(&self) -> FormatKind {
        match self {
            ParsedDocument::Empty => FormatKind::Empty,
            ParsedDocument::NonParseable { .. } => FormatKind::NonParseable,
            ParsedDocument::ParsedNonObject { .. } => FormatKind::ParsedNonObject,
            ParsedDocument::MissingHttp => FormatKind::MissingHttp,
            ParsedDocument::Unsupported { .. } => FormatKind::Unsupported,
            ParsedDocument::ParsedObject(_) => FormatKind::ParsedObject,
        }
    }
}

pub fn parse(payload: &RawPayload, dialect: &Dialect) -> ParsedDocument {
    if payload.bytes.iter().all(|b| b.is_ascii_whitespace()) {
        return ParsedDocument::Empty;
    }

    let root = match dialect {
        Dialect::Unsupported(_) => {
            return ParsedDocument::Unsupported {
                dialect: dialect.clone(),
            }
        }
        Dialect::Json => parse_json(&payload.bytes),
        Dialect::Yaml => parse_json(&payload.bytes).or_else(|_| parse_yaml(&payload.bytes)),
    };

    let root = match root {
        Ok(root) => root,
        Err(message) => {
            tracing::debug!(
                "{} parse of {} failed: {}",
                dialect,
                payload.source_description,
                message
            );
            return ParsedDocument::NonParseable {
                dialect: dialect.clone(),
                message,
            };
        }
    };

    classify(root)
}

fn classify(root: Document) -> ParsedDocument {
    if root.as_mapping().is_none() {
        return ParsedDocument::ParsedNonObject {
            found: root.kind_name(),
        };
    }

    let has_routing = root
        .get("http")
        .map(|http| {
            let routers = http.get("routers").and_then(Document::as_mapping);
            let services = http.get("services").and_then(Document::as_mapping);
            routers.is_some() || services.is_some()
        })
        .unwrap_or(false);

    if has_routing {
        ParsedDocument::ParsedObject(root)
    } else {
        ParsedDocument::MissingHttp
    }
}

fn parse_json(bytes: &[u8]) -> Result<Document, String> {
    serde_json::from_slice::<serde_json::Value>(bytes)
        .map(from_json)
        .map_err(|e| e.to_string())
}

fn parse_yaml(bytes: &[u8]) -> Result<Document, String> {
    let text = std::str::from_utf8(bytes).map_err(|e| format!("payload is not UTF-8: {}", e))?;
    let mut value: serde_yaml::Value = serde_yaml::from_str(text).map_err(|e| e.to_string())?;
    // `<<: *anchor` merge keys, as Traefik's loader resolves them
    value.apply_merge().map_err(|e| e.to_string())?;
    Ok(from_yaml(value))
}

fn from_json(value: serde_json::Value) -> Document {
    match value {
        serde_json::Value::Null => Document::Null,
        serde_json::Value::Bool(b) => Document::Scalar(Scalar::Bool(b)),
        serde_json::Value::Number(n) => Document::Scalar(Scalar::Number(n.to_string())),
        serde_json::Value::String(s) => Document::Scalar(Scalar::String(s)),
        serde_json::Value::Array(items) => {
            Document::Sequence(items.into_iter().map(from_json).collect())
        }
        serde_json::Value::Object(obj) => Document::Mapping(
            obj.into_iter()
                .map(|(key, value)| (key, from_json(value)))
                .collect(),
        ),
    }
}

fn from_yaml(value: serde_yaml::Value) -> Document {
    match value {
        serde_yaml::Value::Null => Document::Null,
        serde_yaml::Value::Bool(b) => Document::Scalar(Scalar::Bool(b)),
        serde_yaml::Value::Number(n) => Document::Scalar(Scalar::Number(n.to_string())),
        serde_yaml::Value::String(s) => Document::Scalar(Scalar::String(s)),
        serde_yaml::Value::Sequence(items) => {
            Document::Sequence(items.into_iter().map(from_yaml).collect())
        }
        serde_yaml::Value::Mapping(mapping) => {
            let mut map = BTreeMap::new();
            for (key, value) in mapping {
                match yaml_key(&key) {
                    Some(key) => {
                        map.insert(key, from_yaml(value));
                    }
                    None => tracing::debug!("Skipping non-scalar YAML mapping key: {:?}", key),
                }
            }
            Document::Mapping(map)
        }
        serde_yaml::Value::Tagged(tagged) => from_yaml(tagged.value),
    }
}

fn yaml_key(key: &serde_yaml::Value) -> Option<String> {
    match key {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        serde_yaml::Value::Tagged(tagged) => yaml_key(&tagged.value),
        serde_yaml::Value::Null
        | serde_yaml::Value::Sequence(_)
        | serde_yaml::Value::Mapping(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(body: &str) -> RawPayload {
        RawPayload::new(body.as_bytes().to_vec(), "test".to_string(), Some(200))
    }

    #[test]
    fn test_parse_routing_json() {
        let parsed = parse(
            &payload(r#"{"http":{"routers":{"r1":{"rule":"Host(`a.com`)"}},"services":{}}}"#),
            &Dialect::Json,
        );

        assert_eq!(parsed.kind(), FormatKind::ParsedObject);
        if let ParsedDocument::ParsedObject(doc) = parsed {
            let rule = doc
                .get("http")
                .and_then(|h| h.get("routers"))
                .and_then(|r| r.get("r1"))
                .and_then(|r| r.get("rule"))
                .and_then(Document::as_str);
            assert_eq!(rule, Some("Host(`a.com`)"));
        }
    }

    #[test]
    fn test_whitespace_only_is_empty() {
        assert_eq!(parse(&payload("  \n\t "), &Dialect::Json).kind(), FormatKind::Empty);
    }

    #[test]
    fn test_html_error_page_is_non_parseable() {
        let parsed = parse(&payload("<html>Bad Gateway</html>"), &Dialect::Json);
        match parsed {
            ParsedDocument::NonParseable { dialect, message } => {
                assert_eq!(dialect, Dialect::Json);
                assert!(!message.is_empty());
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_top_level_array_is_non_object() {
        assert_eq!(
            parse(&payload("[1, 2, 3]"), &Dialect::Json),
            ParsedDocument::ParsedNonObject { found: "sequence" }
        );
        assert_eq!(
            parse(&payload("\"just text\""), &Dialect::Json),
            ParsedDocument::ParsedNonObject { found: "string" }
        );
    }

    #[test]
    fn test_mapping_without_http_is_missing_http() {
        assert_eq!(
            parse(&payload(r#"{"tcp":{"routers":{}}}"#), &Dialect::Json).kind(),
            FormatKind::MissingHttp
        );
        assert_eq!(
            parse(&payload(r#"{"http":{"middlewares":{}}}"#), &Dialect::Json).kind(),
            FormatKind::MissingHttp
        );
        assert_eq!(
            parse(&payload(r#"{"http":"nope"}"#), &Dialect::Json).kind(),
            FormatKind::MissingHttp
        );
    }

    #[test]
    fn test_routers_without_services_is_still_parsed() {
        assert_eq!(
            parse(&payload(r#"{"http":{"routers":{}}}"#), &Dialect::Json).kind(),
            FormatKind::ParsedObject
        );
    }

    #[test]
    fn test_yaml_dialect() {
        let yaml = r#"
http:
  routers:
    dashboard:
      rule: "Host(`dash.example.com`)"
      service: api@internal
  services:
    app:
      loadBalancer:
        servers:
          - url: "http://app:8080"
"#;
        let parsed = parse(&payload(yaml), &Dialect::Yaml);
        assert_eq!(parsed.kind(), FormatKind::ParsedObject);

        // YAML is not accepted where JSON was declared
        assert_eq!(parse(&payload(yaml), &Dialect::Json).kind(), FormatKind::NonParseable);
    }

    #[test]
    fn test_yaml_syntax_error_reports_message() {
        let parsed = parse(&payload("http:\n  routers: [unclosed\n"), &Dialect::Yaml);
        match parsed {
            ParsedDocument::NonParseable { dialect, message } => {
                assert_eq!(dialect, Dialect::Yaml);
                assert!(!message.is_empty());
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_yaml_non_string_keys_are_stringified() {
        let parsed = parse(&payload("http:\n  routers:\n    42:\n      rule: x\n"), &Dialect::Yaml);
        if let ParsedDocument::ParsedObject(doc) = parsed {
            assert!(doc.get("http").and_then(|h| h.get("routers")).and_then(|r| r.get("42")).is_some());
        } else {
            panic!("expected a parsed object");
        }
    }

    #[test]
    fn test_yaml_merge_keys_are_resolved() {
        let yaml = r#"
x-defaults: &defaults
  rule: "Host(`a.com`)"
  service: app
http:
  routers:
    r1:
      <<: *defaults
      priority: 10
  services:
    app: {}
"#;
        let doc = match parse(&payload(yaml), &Dialect::Yaml) {
            ParsedDocument::ParsedObject(doc) => doc,
            other => panic!("expected a parsed object, got {:?}", other),
        };
        let router = doc.get("http").and_then(|h| h.get("routers")).and_then(|r| r.get("r1"));

        assert_eq!(router.and_then(|r| r.get("service")).and_then(Document::as_str), Some("app"));
        assert!(router.and_then(|r| r.get("<<")).is_none());
    }

    #[test]
    fn test_unsupported_dialect_skips_parsing() {
        let parsed = parse(
            &payload("[http.routers]"),
            &Dialect::Unsupported("toml".to_string()),
        );
        assert_eq!(parsed.kind(), FormatKind::Unsupported);
    }
}
