//! Social platform sources that turn trending pages into [`hotfeed_common::NewsItem`]s.
//!
//! Each platform lives in its own module and implements [`TrendingSource`]. Only the
//! Xiaohongshu explore feed is implemented; it scrapes the hydration state embedded in
//! the server-rendered page rather than calling a signed API.
pub mod source;
pub mod xiaohongshu;

pub use source::{SourceError, TrendingSource};
pub use xiaohongshu::XiaohongshuSource;
