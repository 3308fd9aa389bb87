//! Wires configured sources together and runs them once.
use anyhow::{Context, Result, bail};
use hotfeed_common::NewsItem;
use hotfeed_config::{HotfeedConfig, SourceDetails, SourceSpec, XiaohongshuConfig};
use hotfeed_http::HttpClient;
use hotfeed_social::{TrendingSource, XiaohongshuSource};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;

const DEFAULT_SOURCE_ID: &str = "xiaohongshu";

pub struct Tether {
    sources: Vec<(String, Box<dyn TrendingSource>)>,
}

/// Outcome of one pass over every source.
#[derive(Debug, Default, Serialize)]
pub struct RunReport {
    pub items: BTreeMap<String, Vec<NewsItem>>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub failures: BTreeMap<String, String>,
}

impl RunReport {
    pub fn all_failed(&self) -> bool {
        self.items.is_empty() && !self.failures.is_empty()
    }
}

impl Tether {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    pub fn add(&mut self, id: impl Into<String>, source: Box<dyn TrendingSource>) {
        self.sources.push((id.into(), source));
    }

    pub fn source_ids(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(|(id, _)| id.as_str())
    }

    /// Fetch every source in order. A failing source is recorded, not fatal.
    pub async fn run(self) -> RunReport {
        let mut report = RunReport::default();
        for (id, source) in self.sources {
            let started = std::time::Instant::now();
            match source.fetch().await {
                Ok(items) => {
                    tracing::info!(
                        source = %id,
                        platform = source.name(),
                        items = items.len(),
                        elapsed = ?started.elapsed(),
                        "hotfeed.source.ok"
                    );
                    report.items.insert(id, items);
                }
                Err(e) => {
                    tracing::warn!(
                        source = %id,
                        platform = source.name(),
                        error = %e,
                        "hotfeed.source.failed"
                    );
                    report.failures.insert(id, e.to_string());
                }
            }
        }
        report
    }
}

/// Register enabled sources (optionally only `only`). No configured sources means one
/// default Xiaohongshu source.
pub fn build_from_config(t: &mut Tether, cfg: &HotfeedConfig, only: Option<&str>) -> Result<()> {
    let default_spec;
    let specs: Vec<&SourceSpec> = if cfg.sources.is_empty() {
        default_spec = SourceSpec {
            id: DEFAULT_SOURCE_ID.to_string(),
            enabled: None,
            details: SourceDetails::Xiaohongshu {
                config: XiaohongshuConfig::default(),
            },
        };
        vec![&default_spec]
    } else {
        cfg.sources.iter().collect()
    };

    for spec in specs {
        if only.is_some_and(|id| id != spec.id) {
            continue;
        }
        if !spec.is_enabled() {
            tracing::debug!(source = %spec.id, "hotfeed.source.disabled");
            continue;
        }
        match &spec.details {
            SourceDetails::Xiaohongshu { config } => {
                let source = build_xiaohongshu(config)
                    .with_context(|| format!("building source `{}`", spec.id))?;
                t.add(spec.id.clone(), Box::new(source));
            }
        }
    }

    if let Some(id) = only {
        if t.sources.is_empty() {
            bail!("no enabled source with id `{id}`");
        }
    }
    Ok(())
}

fn build_xiaohongshu(cfg: &XiaohongshuConfig) -> Result<XiaohongshuSource<HttpClient>> {
    let mut http = HttpClient::new(&cfg.base_url)?;
    if let Some(secs) = cfg.timeout_secs {
        http = http.with_timeout(Duration::from_secs(secs));
    }
    if let Some(n) = cfg.retries {
        http = http.with_retries(n);
    }
    if let Some(ua) = &cfg.user_agent {
        http = http.with_header("user-agent", ua)?;
    }
    if let Some(cookie) = &cfg.cookie {
        http = http.with_header("cookie", cookie)?;
    }
    Ok(XiaohongshuSource::new(http, &cfg.base_url)?)
}
