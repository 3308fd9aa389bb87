use hotfeed_config::{HotfeedConfigLoader, LogFormat, SourceDetails};
use serial_test::serial;
use std::{fs, path::PathBuf};
use tempfile::TempDir;

/// Helper to write a YAML file in a temp dir and return its path.
fn write_yaml(tmp: &TempDir, name: &str, yaml: &str) -> PathBuf {
    let p = tmp.path().join(name);
    fs::write(&p, yaml).expect("write yaml");
    p
}

#[test]
#[serial]
fn test_config_load() {
    let tmp = TempDir::new().unwrap();

    let file_yaml = r#"
version: "0.1"
logging:
  format: json
  emit_stderr: true
sources:
  - id: xhs
    kind: xiaohongshu
    enabled: true
    config:
      cookie: "${XHS_TEST_COOKIE}"
      timeout_secs: 8
  - id: xhs-mirror
    kind: xiaohongshu
    enabled: false
    config:
      base_url: "https://mirror.example.com"
  "#;
    let p = write_yaml(&tmp, "hotfeed.yaml", file_yaml);

    temp_env::with_var("XHS_TEST_COOKIE", Some("web_session=abc"), || {
        let config = HotfeedConfigLoader::new()
            .with_file(&p)
            .load()
            .expect("load system config");

        assert_eq!(config.version.as_deref(), Some("0.1"));
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(config.logging.emit_stderr);
        assert_eq!(config.sources.len(), 2);

        let SourceDetails::Xiaohongshu { config: xhs } = &config.sources[0].details;
        assert_eq!(xhs.cookie.as_deref(), Some("web_session=abc"));
        assert_eq!(xhs.timeout_secs, Some(8));
        assert_eq!(xhs.base_url, "https://www.xiaohongshu.com");

        assert!(!config.sources[1].is_enabled());
        let SourceDetails::Xiaohongshu { config: mirror } = &config.sources[1].details;
        assert_eq!(mirror.base_url, "https://mirror.example.com");
    });
}

#[test]
#[serial]
fn env_overrides_file_values() {
    let tmp = TempDir::new().unwrap();
    let p = write_yaml(
        &tmp,
        "hotfeed.yaml",
        "logging:\n  filter: info\nsources: []\n",
    );

    temp_env::with_var("HOTFEED__LOGGING__FILTER", Some("debug"), || {
        let config = HotfeedConfigLoader::new().with_file(&p).load().unwrap();
        assert_eq!(config.logging.filter, "debug");
    });
}

#[test]
#[serial]
fn missing_optional_file_is_skipped() {
    let tmp = TempDir::new().unwrap();
    let config = HotfeedConfigLoader::new()
        .with_optional_file(tmp.path().join("absent.yaml"))
        .load()
        .expect("env-only config");
    assert!(config.sources.is_empty());
    assert!(config.version.is_none());
}

#[test]
#[serial]
fn missing_required_file_fails() {
    let tmp = TempDir::new().unwrap();
    let res = HotfeedConfigLoader::new()
        .with_file(tmp.path().join("absent.yaml"))
        .load();
    assert!(res.is_err());
}
