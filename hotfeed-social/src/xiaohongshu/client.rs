//! Explore-feed source: fetch the page through an injected [`PageFetcher`], then
//! extract and map it.
use async_trait::async_trait;
use hotfeed_common::NewsItem;
use hotfeed_http::PageFetcher;
use url::Url;

use super::extract::{ExtractError, extract_initial_state};
use super::mapper::map_feed;
use crate::source::{SourceError, TrendingSource};

pub const DEFAULT_BASE_URL: &str = "https://www.xiaohongshu.com";

const EXPLORE_PATH: &str = "/explore";

/// Extract the state from an explore page and map it against `base`.
///
/// Pure; the whole pipeline minus the network.
pub fn parse_explore_page(html: &str, base: &Url) -> Result<Vec<NewsItem>, ExtractError> {
    let state = extract_initial_state(html)?;
    Ok(map_feed(&state, base))
}

#[derive(Debug, Clone)]
pub struct XiaohongshuSource<F> {
    fetcher: F,
    base: Url,
}

impl<F: PageFetcher> XiaohongshuSource<F> {
    pub fn new(fetcher: F, base_url: &str) -> Result<Self, SourceError> {
        let base = Url::parse(base_url).map_err(|source| SourceError::BaseUrl {
            url: base_url.to_string(),
            source,
        })?;
        Ok(Self { fetcher, base })
    }

    pub fn explore_url(&self) -> Result<Url, SourceError> {
        self.base
            .join(EXPLORE_PATH)
            .map_err(|source| SourceError::BaseUrl {
                url: self.base.to_string(),
                source,
            })
    }

    /// Fetch the explore page and return its trending notes.
    pub async fn fetch_items(&self) -> Result<Vec<NewsItem>, SourceError> {
        let page_url = self.explore_url()?;
        let html = self.fetcher.fetch_page(page_url.as_str()).await?;
        tracing::debug!(url = %page_url, bytes = html.len(), "xhs.page.fetched");

        let items = parse_explore_page(&html, &self.base).inspect_err(|e| {
            tracing::warn!(url = %page_url, error = %e, "xhs.page.extract_failed");
        })?;

        tracing::info!(url = %page_url, items = items.len(), "xhs.items");
        Ok(items)
    }
}

#[async_trait]
impl<F: PageFetcher> TrendingSource for XiaohongshuSource<F> {
    fn name(&self) -> &'static str {
        "xiaohongshu"
    }

    async fn fetch(&self) -> Result<Vec<NewsItem>, SourceError> {
        self.fetch_items().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hotfeed_http::HttpError;
    use std::sync::Mutex;

    #[derive(Debug)]
    struct CannedPage {
        body: Result<String, ()>,
        requested: Mutex<Vec<String>>,
    }

    impl CannedPage {
        fn ok(body: &str) -> Self {
            Self {
                body: Ok(body.to_string()),
                requested: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                body: Err(()),
                requested: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl PageFetcher for CannedPage {
        async fn fetch_page(&self, url: &str) -> Result<String, HttpError> {
            self.requested.lock().unwrap().push(url.to_string());
            self.body
                .clone()
                .map_err(|_| HttpError::Network("connection reset".into()))
        }
    }

    #[tokio::test]
    async fn fetches_explore_page_and_maps_items() {
        let html = r#"<script>window.__INITIAL_STATE__={"feed":{"feeds":[
            {"id":"abc","xsecToken":"tok","noteCard":{"displayTitle":"Hi","user":{"nickname":"Ann"},"interactInfo":{"likedCount":"42"}}},
            {"id":"def","noteCard":{"title":""}}
        ]},"user":undefined}</script>"#;
        let source = XiaohongshuSource::new(CannedPage::ok(html), DEFAULT_BASE_URL).unwrap();

        let items = source.fetch().await.unwrap();

        assert_eq!(
            source.fetcher.requested.lock().unwrap().as_slice(),
            ["https://www.xiaohongshu.com/explore"]
        );
        assert_eq!(
            items,
            vec![
                NewsItem::new(
                    "abc",
                    "Hi",
                    "https://www.xiaohongshu.com/explore/abc?xsec_token=tok&xsec_source=pc_feed"
                )
                .with_info("Ann · 42赞")
            ]
        );
    }

    #[tokio::test]
    async fn fetch_errors_pass_through() {
        let source = XiaohongshuSource::new(CannedPage::failing(), DEFAULT_BASE_URL).unwrap();
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, SourceError::Fetch(HttpError::Network(_))));
    }

    #[tokio::test]
    async fn login_wall_is_not_found() {
        let source =
            XiaohongshuSource::new(CannedPage::ok("<html>请登录</html>"), DEFAULT_BASE_URL)
                .unwrap();
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(
            err,
            SourceError::Extract(ExtractError::NotFound { .. })
        ));
    }

    #[test]
    fn rejects_relative_base() {
        let err = XiaohongshuSource::new(CannedPage::ok(""), "xiaohongshu.com").unwrap_err();
        assert!(matches!(err, SourceError::BaseUrl { .. }));
    }
}
