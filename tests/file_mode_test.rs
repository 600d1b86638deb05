use anyhow::Result;
use tempfile::TempDir;
use traefik_doctor::core::{doctor, report};
use traefik_doctor::domain::model::{FindingCategory, FormatKind, OutputFormat, Severity};
use traefik_doctor::{DoctorError, TomlConfig};

fn write(dir: &TempDir, name: &str, content: &str) -> String {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path.to_str().unwrap().to_string()
}

fn file_config(path: &str) -> Result<TomlConfig> {
    let config = TomlConfig::from_toml_str(&format!(
        "[source]\nfile = \"{}\"\n",
        path.replace('\\', "/")
    ))?;
    Ok(config)
}

#[tokio::test]
async fn test_yaml_file_is_validated() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write(
        &dir,
        "dynamic.yml",
        r#"
http:
  routers:
    app:
      rule: "Host(`app.example.com`)"
      service: app-service
    wildcard:
      rule: "HostRegexp(`{sub}.example.com`)"
      service: app-service
      tls:
        certResolver: letsencrypt
    orphan:
      rule: "Host(`orphan.example.com`)"
      service: nowhere
    dashboard:
      rule: "Host(`traefik.example.com`)"
      service: api@internal
  services:
    app-service:
      loadBalancer:
        servers:
          - url: "http://app:8080"
"#,
    );

    let result = doctor::inspect(&file_config(&path)?).await;
    let inspection = result.as_ref().unwrap();

    assert_eq!(inspection.http_status, None);
    assert_eq!(inspection.report.router_count, 4);
    assert_eq!(inspection.report.service_count, 1);
    assert_eq!(inspection.report.critical_count(), 1);
    assert_eq!(inspection.report.warning_count(), 1);

    let (text, code) = report::conclude(&result, OutputFormat::Text);
    assert_eq!(code, 1);
    assert!(text.contains("[CRITICAL] router `orphan` references missing service `nowhere`"));
    assert!(text.contains("[WARNING] router `wildcard`"));
    assert!(text.ends_with("Summary: 1 critical, 1 warning(s)\n"));
    Ok(())
}

#[tokio::test]
async fn test_yaml_syntax_error_is_critical() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write(&dir, "broken.yaml", "http:\n  routers:\n    app: [unterminated\n");

    let result = doctor::inspect(&file_config(&path)?).await;
    let inspection = result.as_ref().unwrap();

    assert_eq!(inspection.format, FormatKind::NonParseable);
    assert_eq!(inspection.report.findings.len(), 1);
    assert_eq!(inspection.report.findings[0].severity, Severity::Critical);
    assert_eq!(inspection.report.findings[0].category, FindingCategory::ParseError);

    let (text, code) = report::conclude(&result, OutputFormat::Text);
    assert_eq!(code, 1);
    assert!(text.contains("[CRITICAL] config file YAML parse error: "));
    Ok(())
}

#[tokio::test]
async fn test_non_mapping_file_is_critical() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write(&dir, "list.yml", "- one\n- two\n");

    let result = doctor::inspect(&file_config(&path)?).await;
    let inspection = result.as_ref().unwrap();

    assert_eq!(inspection.format, FormatKind::ParsedNonObject);
    assert_eq!(
        inspection.report.findings[0].category,
        FindingCategory::UnexpectedShape
    );
    assert_eq!(inspection.report.exit_code(), 1);
    Ok(())
}

#[tokio::test]
async fn test_static_config_without_http_section_warns() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write(
        &dir,
        "traefik.yml",
        "entryPoints:\n  web:\n    address: \":80\"\nproviders:\n  http:\n    endpoint: \"http://pangolin:3001/api/v1/traefik-config\"\n",
    );

    let result = doctor::inspect(&file_config(&path)?).await;
    let inspection = result.as_ref().unwrap();

    assert_eq!(inspection.format, FormatKind::MissingHttp);
    assert_eq!(inspection.report.warning_count(), 1);
    assert_eq!(inspection.report.exit_code(), 0);
    Ok(())
}

#[tokio::test]
async fn test_unsupported_format_is_skipped() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write(
        &dir,
        "dynamic.toml",
        "[http.routers.app]\nrule = \"Host(`a.com`)\"\nservice = \"missing\"\n",
    );

    let result = doctor::inspect(&file_config(&path)?).await;
    let inspection = result.as_ref().unwrap();

    assert_eq!(inspection.format, FormatKind::Unsupported);
    assert_eq!(inspection.report.critical_count(), 0);
    assert_eq!(
        inspection.report.findings[0].category,
        FindingCategory::UnsupportedFormat
    );

    let (text, code) = report::conclude(&result, OutputFormat::Text);
    assert_eq!(code, 0);
    assert!(text.contains("[WARNING] unsupported configuration format `toml`"));
    Ok(())
}

#[tokio::test]
async fn test_json_file_is_accepted() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write(
        &dir,
        "dynamic.json",
        r#"{"http":{"routers":{"r1":{"rule":"Host(`a.com`)","service":"s1"}},"services":{"s1":{}}}}"#,
    );

    let result = doctor::inspect(&file_config(&path)?).await;
    assert_eq!(result.unwrap().report.exit_code(), 0);
    Ok(())
}

#[tokio::test]
async fn test_missing_file_is_fatal() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("absent.yml");

    let result = doctor::inspect(&file_config(path.to_str().unwrap())?).await;
    assert!(matches!(result, Err(DoctorError::FileNotFound { .. })));

    let (text, code) = report::conclude(&result, OutputFormat::Text);
    assert_eq!(code, 1);
    assert!(text.starts_with("[ERROR] read failed:"));
    Ok(())
}

#[tokio::test]
async fn test_empty_file_is_fatal() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write(&dir, "empty.yml", "");

    let result = doctor::inspect(&file_config(&path)?).await;
    assert!(matches!(result, Err(DoctorError::EmptyBody { .. })));
    Ok(())
}
