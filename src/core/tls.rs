use crate::domain::model::{Finding, FindingCategory, Router};
use regex::Regex;
use std::sync::OnceLock;

/// Marker for subdomain pattern matching in a router rule.
pub const PATTERN_HOST_MARKER: &str = "HostRegexp(";

// HostRegexp(`{sub}.example.com`) and HostRegexp(`{sub:[a-z]{2,}}.example.com`);
// one level of braces is allowed inside the placeholder.
fn placeholder_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"HostRegexp\(\s*[`"']\{(?:[^{}]|\{[^{}]*\})*\}\.([^`"']+)[`"']"#)
            .expect("placeholder domain pattern is valid")
    })
}

// HostRegexp(`^.+\.example\.com$`)
fn escaped_regex_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"HostRegexp\(\s*[`"']\^?[^`"']*?\\\.((?:[A-Za-z0-9-]+\\\.)+[A-Za-z0-9-]+)\$?[`"']"#)
            .expect("escaped domain pattern is valid")
    })
}

pub fn uses_pattern_host(rule: &str) -> bool {
    rule.contains(PATTERN_HOST_MARKER)
}

/// Literal domain following the subdomain placeholder of the first
/// `HostRegexp` in `rule`.
pub fn extract_domain(rule: &str) -> Option<String> {
    if let Some(caps) = placeholder_pattern().captures(rule) {
        let domain = caps[1].trim_end_matches('.');
        if !domain.is_empty() {
            return Some(domain.to_string());
        }
    }

    escaped_regex_pattern()
        .captures(rule)
        .map(|caps| caps[1].replace("\\.", "."))
}

/// Warns about pattern-matched routers that declare no TLS domains.
pub fn validate(routers: &[Router]) -> Vec<Finding> {
    routers
        .iter()
        .filter(|router| uses_pattern_host(&router.rule))
        .filter(|router| {
            router
                .tls_domains
                .as_ref()
                .map(|domains| domains.is_empty())
                .unwrap_or(true)
        })
        .map(|router| {
            let domain = extract_domain(&router.rule).unwrap_or_else(|| "unknown".to_string());
            Finding::warning(
                FindingCategory::TlsDomainCoverage,
                format!(
                    "router `{}` uses pattern-based host matching without an explicit TLS domain declaration (rule: {}; suggested domain: {})",
                    router.name, router.rule, domain
                ),
                Some(router.name.clone()),
            )
        })
        .collect()
}
