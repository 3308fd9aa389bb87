//! Xiaohongshu (小红书) explore feed.
//!
//! The explore page ships its Vue hydration state inline as
//! `window.__INITIAL_STATE__={...}`. [`extract`] carves that object out of the HTML,
//! [`mapper`] turns `feed.feeds` into normalized items, and [`client`] wires both behind
//! an injected [`hotfeed_http::PageFetcher`].
pub mod client;
pub mod extract;
pub mod mapper;
pub mod types;

pub use client::{XiaohongshuSource, DEFAULT_BASE_URL, parse_explore_page};
pub use extract::{ExtractError, INITIAL_STATE_MARKER, Malformed, extract_initial_state};
pub use mapper::map_feed;
