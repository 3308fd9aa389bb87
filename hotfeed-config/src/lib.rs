//! Loader for workspace configuration with YAML + environment overlays.
//!
//! A `hotfeed.yaml` lists the sources to scrape and how to log:
//!
//! ```yaml
//! version: "1"
//! logging:
//!   format: json        # text | json
//!   emit_stderr: true
//!   filter: "info,hotfeed_http=debug"
//! sources:
//!   - id: xhs
//!     kind: xiaohongshu
//!     config:
//!       cookie: "${XHS_COOKIE}"
//!       timeout_secs: 10
//! ```
//!
//! `HOTFEED__`-prefixed environment variables override file values
//! (`HOTFEED__LOGGING__FILTER=debug`), and `${VAR}` placeholders in any string are
//! expanded after merging.
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

pub const DEFAULT_XIAOHONGSHU_BASE_URL: &str = "https://www.xiaohongshu.com";

#[derive(Debug, Deserialize)]
pub struct HotfeedConfig {
    pub version: Option<String>,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub sources: Vec<SourceSpec>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default)]
    pub emit_stderr: bool,
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_filter")]
    pub filter: String,
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            emit_stderr: false,
            filter: default_filter(),
            dir: None,
        }
    }
}

/// Shared fields + the per-kind “details”
#[derive(Debug, Deserialize)]
pub struct SourceSpec {
    pub id: String,
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(flatten)]
    pub details: SourceDetails,
}

impl SourceSpec {
    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }
}

/// The tag is `kind`; the payload lives in `config`
#[derive(Debug, Deserialize)]
#[serde(tag = "kind")]
pub enum SourceDetails {
    #[serde(rename = "xiaohongshu")]
    Xiaohongshu {
        #[serde(default)]
        config: XiaohongshuConfig,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct XiaohongshuConfig {
    #[serde(default = "default_xiaohongshu_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Raw `Cookie` header; the explore page serves fewer notes to anonymous visitors.
    #[serde(default)]
    pub cookie: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub retries: Option<usize>,
}

impl Default for XiaohongshuConfig {
    fn default() -> Self {
        Self {
            base_url: default_xiaohongshu_base_url(),
            user_agent: None,
            cookie: None,
            timeout_secs: None,
            retries: None,
        }
    }
}

fn default_filter() -> String {
    "info".into()
}
fn default_xiaohongshu_base_url() -> String {
    DEFAULT_XIAOHONGSHU_BASE_URL.into()
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hides the `config` crate wiring (YAML + env overrides).
pub struct HotfeedConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for HotfeedConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl HotfeedConfigLoader {
    /// Empty loader; add files or snippets, `HOTFEED__` env overrides apply on [`load`](Self::load).
    ///
    /// ```
    /// use hotfeed_config::HotfeedConfigLoader;
    ///
    /// let config = HotfeedConfigLoader::new()
    ///     .with_yaml_str("version: '1'\nsources: []")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.version.as_deref(), Some("1"));
    /// assert!(config.sources.is_empty());
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a YAML/TOML/JSON file; the `config` crate infers format by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Like [`with_file`](Self::with_file) but a missing file is skipped, for
    /// deployments configured purely through the environment.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Allow tests/CLI to merge inline YAML snippets.
    ///
    /// ```
    /// use hotfeed_config::{HotfeedConfigLoader, SourceDetails};
    ///
    /// let cfg = HotfeedConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// version: "test"
    /// sources:
    ///   - id: "xhs"
    ///     kind: "xiaohongshu"
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(cfg.sources.len(), 1);
    /// assert!(cfg.sources[0].is_enabled());
    /// let SourceDetails::Xiaohongshu { config } = &cfg.sources[0].details;
    /// assert_eq!(config.base_url, "https://www.xiaohongshu.com");
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources into strongly typed config.
    ///
    /// ```
    /// use hotfeed_config::{HotfeedConfigLoader, SourceDetails};
    ///
    /// unsafe { std::env::set_var("XHS_DOC_COOKIE", "web_session=from-env"); }
    ///
    /// let config = HotfeedConfigLoader::new()
    ///     .with_yaml_str(r#"
    /// sources:
    ///   - id: "xhs"
    ///     kind: "xiaohongshu"
    ///     config:
    ///       cookie: "${XHS_DOC_COOKIE}"
    ///       retries: 1
    /// "#)
    ///     .load()
    ///     .expect("valid configuration");
    ///
    /// let SourceDetails::Xiaohongshu { config: xhs } = &config.sources[0].details;
    /// assert_eq!(xhs.cookie.as_deref(), Some("web_session=from-env"));
    /// assert_eq!(xhs.retries, Some(1));
    ///
    /// unsafe { std::env::remove_var("XHS_DOC_COOKIE"); }
    /// ```
    pub fn load(self) -> Result<HotfeedConfig, ConfigError> {
        // env is added last so it wins over every file/snippet
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix("HOTFEED")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: HotfeedConfig =
            serde_json::from_value(v).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        Ok(typed)
    }
}
