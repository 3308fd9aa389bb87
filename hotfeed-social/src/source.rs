use async_trait::async_trait;
use hotfeed_common::NewsItem;
use hotfeed_http::HttpError;
use thiserror::Error;

use crate::xiaohongshu::extract::ExtractError;

/// Failure of one fetch-extract-map run. Terminal for that run; callers decide on retries.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("invalid base url `{url}`: {source}")]
    BaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("page fetch failed: {0}")]
    Fetch(#[from] HttpError),
    #[error(transparent)]
    Extract(#[from] ExtractError),
}

/// A platform that can produce its current list of trending items.
#[async_trait]
pub trait TrendingSource: Send + Sync {
    /// Stable platform name used in logs and output.
    fn name(&self) -> &'static str;

    async fn fetch(&self) -> Result<Vec<NewsItem>, SourceError>;
}
