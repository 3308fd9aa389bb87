use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// One entry of `feed.feeds` in the explore page state.
///
/// Every field is optional; the page is not a stable contract.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedEntry {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    /// Per-note access token the web client appends to note links.
    #[serde(default, deserialize_with = "lenient_string")]
    pub xsec_token: Option<String>,
    #[serde(default)]
    pub note_card: Option<NoteCard>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteCard {
    #[serde(default, deserialize_with = "lenient_string")]
    pub display_title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_object")]
    pub user: Option<NoteUser>,
    #[serde(default, deserialize_with = "lenient_object")]
    pub interact_info: Option<InteractInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NoteUser {
    #[serde(default, deserialize_with = "lenient_string")]
    pub nickname: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractInfo {
    /// Display string such as `"42"` or `"1.2万"`.
    #[serde(default, deserialize_with = "lenient_count")]
    pub liked_count: Option<String>,
}

impl NoteCard {
    /// `displayTitle`, else `title`, trimmed. `None` when the result is empty.
    ///
    /// A present-but-blank `displayTitle` does not fall back to `title`.
    pub fn title_text(&self) -> Option<&str> {
        let title = self
            .display_title
            .as_deref()
            .or(self.title.as_deref())
            .unwrap_or("")
            .trim();
        (!title.is_empty()).then_some(title)
    }

    pub fn nickname(&self) -> Option<&str> {
        self.user
            .as_ref()
            .and_then(|u| u.nickname.as_deref())
            .filter(|s| !s.is_empty())
    }

    pub fn liked_count(&self) -> Option<&str> {
        self.interact_info
            .as_ref()
            .and_then(|i| i.liked_count.as_deref())
            .filter(|s| !s.is_empty())
    }
}

/// Strings pass through, numbers are rendered, anything else reads as absent.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Like [`lenient_string`], but a numeric zero means "no likes yet" and reads as absent.
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    })
}

/// Nested objects that arrive in any other shape read as absent instead of failing the entry.
fn lenient_object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(v @ Value::Object(_)) => serde_json::from_value(v).ok(),
        _ => None,
    })
}
