//! Map the explore page state into normalized items.
//!
//! Never fails: missing optional data degrades the item (no info line, no token in the
//! link) and only entries without a card, id, or usable title are dropped.
use hotfeed_common::NewsItem;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use super::types::{FeedEntry, NoteCard};

/// `xsec_source` value the web client sends for notes opened from the explore feed.
pub const NOTE_SOURCE_TAG: &str = "pc_feed";

const FEEDS_POINTER: &str = "/feed/feeds";

/// Map `feed.feeds` to items, preserving order.
pub fn map_feed(state: &Value, base: &Url) -> Vec<NewsItem> {
    let Some(feeds) = state.pointer(FEEDS_POINTER).and_then(Value::as_array) else {
        tracing::debug!("xhs.map.no_feeds");
        return Vec::new();
    };

    let items: Vec<NewsItem> = feeds
        .iter()
        .enumerate()
        .filter_map(|(idx, raw)| map_entry(idx, raw, base))
        .collect();

    tracing::debug!(
        entries = feeds.len(),
        items = items.len(),
        dropped = feeds.len() - items.len(),
        "xhs.map.done"
    );
    items
}

fn map_entry(idx: usize, raw: &Value, base: &Url) -> Option<NewsItem> {
    let entry = match FeedEntry::deserialize(raw) {
        Ok(entry) => entry,
        Err(e) => {
            tracing::debug!(idx, error = %e, "xhs.map.skip.shape");
            return None;
        }
    };

    let Some(note) = entry.note_card.as_ref() else {
        tracing::trace!(idx, "xhs.map.skip.no_card");
        return None;
    };
    let Some(title) = note.title_text() else {
        tracing::trace!(idx, "xhs.map.skip.no_title");
        return None;
    };
    let Some(id) = entry.id.as_deref().filter(|id| !id.is_empty()) else {
        tracing::debug!(idx, "xhs.map.skip.no_id");
        return None;
    };

    let url = match note_url(base, id, entry.xsec_token.as_deref()) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!(idx, id, error = %e, "xhs.map.skip.bad_url");
            return None;
        }
    };

    let item = NewsItem::new(id, title, url.to_string());
    Some(match info_line(note) {
        Some(info) => item.with_info(info),
        None => item,
    })
}

/// `<base>/explore/<id>`, plus the access token query when one is present.
pub fn note_url(base: &Url, id: &str, token: Option<&str>) -> Result<Url, url::ParseError> {
    let mut url = base.join(&format!("/explore/{id}"))?;
    if let Some(token) = token.filter(|t| !t.is_empty()) {
        url.query_pairs_mut()
            .clear()
            .append_pair("xsec_token", token)
            .append_pair("xsec_source", NOTE_SOURCE_TAG);
    }
    Ok(url)
}

/// Author and like count joined by ` · `, e.g. `Ann · 42赞`.
pub fn info_line(note: &NoteCard) -> Option<String> {
    let mut parts = Vec::with_capacity(2);
    if let Some(nickname) = note.nickname() {
        parts.push(nickname.to_string());
    }
    if let Some(count) = note.liked_count() {
        parts.push(format!("{count}赞"));
    }
    (!parts.is_empty()).then(|| parts.join(" · "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base() -> Url {
        Url::parse("https://www.xiaohongshu.com").unwrap()
    }

    fn state(feeds: Value) -> Value {
        json!({"feed": {"feeds": feeds}})
    }

    #[test]
    fn title_falls_back_to_title() {
        let items = map_feed(
            &state(json!([{"id": "a", "noteCard": {"title": "X"}}])),
            &base(),
        );
        assert_eq!(items[0].title, "X");
    }

    #[test]
    fn display_title_is_preferred_and_trimmed() {
        let items = map_feed(
            &state(json!([{"id": "a", "noteCard": {"displayTitle": "  D  ", "title": "X"}}])),
            &base(),
        );
        assert_eq!(items[0].title, "D");
    }

    #[test]
    fn entries_without_title_or_card_are_dropped() {
        let items = map_feed(
            &state(json!([
                {"id": "a", "noteCard": {"title": "first"}},
                {"id": "b", "noteCard": {"displayTitle": "", "user": {"nickname": "n"}}},
                {"id": "c"},
                {"id": "d", "noteCard": {"title": "   "}},
                {"id": "e", "noteCard": {"title": "last"}}
            ])),
            &base(),
        );
        let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["a", "e"]);
        assert_eq!(items[1].title, "last");
    }

    #[test]
    fn entries_without_id_or_with_odd_shapes_are_dropped() {
        let items = map_feed(
            &state(json!([
                {"noteCard": {"title": "anon"}},
                "not-an-object",
                {"id": "ok", "noteCard": {"title": "kept"}}
            ])),
            &base(),
        );
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "ok");
    }

    #[test]
    fn misshapen_optional_fields_keep_the_entry() {
        let items = map_feed(
            &state(json!([
                {"id": "a", "noteCard": {"title": "keep me", "user": "anon"}},
                {"id": "b", "noteCard": {"title": "b", "interactInfo": "x"}},
                {"id": "c", "noteCard": {"title": "c", "user": {"nickname": "Ann"}, "interactInfo": 5}}
            ])),
            &base(),
        );
        let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
        assert_eq!(items[0].title, "keep me");
        assert!(items[0].extra.is_none());
        assert!(items[1].extra.is_none());
        assert_eq!(items[2].info(), Some("Ann"));
    }

    #[test]
    fn url_with_token() {
        let items = map_feed(
            &state(json!([{"id": "abc", "xsecToken": "tok", "noteCard": {"title": "t"}}])),
            &base(),
        );
        assert_eq!(
            items[0].url,
            "https://www.xiaohongshu.com/explore/abc?xsec_token=tok&xsec_source=pc_feed"
        );
    }

    #[test]
    fn url_without_token() {
        let items = map_feed(
            &state(json!([{"id": "abc", "noteCard": {"title": "t"}}])),
            &base(),
        );
        assert_eq!(items[0].url, "https://www.xiaohongshu.com/explore/abc");
    }

    #[test]
    fn token_is_form_encoded() {
        let url = note_url(&base(), "abc", Some("AB+c=")).unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.xiaohongshu.com/explore/abc?xsec_token=AB%2Bc%3D&xsec_source=pc_feed"
        );
    }

    #[test]
    fn note_path_replaces_base_path() {
        let base = Url::parse("https://www.xiaohongshu.com/explore?channel=homefeed").unwrap();
        let url = note_url(&base, "abc", None).unwrap();
        assert_eq!(url.as_str(), "https://www.xiaohongshu.com/explore/abc");
    }

    #[test]
    fn info_joins_present_parts() {
        let items = map_feed(
            &state(json!([
                {"id": "1", "noteCard": {"title": "t", "user": {"nickname": "Ann"}, "interactInfo": {"likedCount": "42"}}},
                {"id": "2", "noteCard": {"title": "t", "interactInfo": {"likedCount": "42"}}},
                {"id": "3", "noteCard": {"title": "t", "user": {"nickname": "Ann"}}},
                {"id": "4", "noteCard": {"title": "t"}},
                {"id": "5", "noteCard": {"title": "t", "user": {"nickname": ""}, "interactInfo": {"likedCount": ""}}}
            ])),
            &base(),
        );
        assert_eq!(items[0].info(), Some("Ann · 42赞"));
        assert_eq!(items[1].info(), Some("42赞"));
        assert_eq!(items[2].info(), Some("Ann"));
        assert!(items[3].extra.is_none());
        assert!(items[4].extra.is_none());
    }

    #[test]
    fn missing_path_links_yield_nothing() {
        assert!(map_feed(&json!({}), &base()).is_empty());
        assert!(map_feed(&json!({"feed": {}}), &base()).is_empty());
        assert!(map_feed(&json!({"feed": {"feeds": null}}), &base()).is_empty());
        assert!(map_feed(&json!({"feed": null}), &base()).is_empty());
    }
}
