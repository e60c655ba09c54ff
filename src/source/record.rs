//! The record types served by the two data endpoints.
//!
//! Every endpoint returns a JSON array.  Elements whose `id` is not a
//! well-formed non-negative integer are dropped while decoding; every other
//! field is an optional string, and empty strings are treated as absent so
//! the display fallbacks kick in for them too.
//!
//! ## For contributors
//!
//! A new collection type needs a struct here, an [`ItemKind`] variant and a
//! [`Record`] impl.  The filter, paginator and cache are generic over
//! [`Record`] and need no changes.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{FetchError, InvalidId};

/// Largest integer a JSON producer can represent exactly as a double.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// A record identifier: a non-negative integer, unique within its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u64> for ItemId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl TryFrom<i64> for ItemId {
    type Error = InvalidId;

    fn try_from(id: i64) -> Result<Self, Self::Error> {
        u64::try_from(id)
            .map(Self)
            .map_err(|_| InvalidId(id.to_string()))
    }
}

impl TryFrom<f64> for ItemId {
    type Error = InvalidId;

    fn try_from(id: f64) -> Result<Self, Self::Error> {
        // NaN and the infinities fail the `fract` test.
        if id >= 0.0 && id.fract() == 0.0 && id <= MAX_SAFE_INTEGER {
            Ok(Self(id as u64))
        } else {
            Err(InvalidId(id.to_string()))
        }
    }
}

impl TryFrom<&Value> for ItemId {
    type Error = InvalidId;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Number(n) => {
                if let Some(id) = n.as_u64() {
                    Ok(Self(id))
                } else if let Some(id) = n.as_i64() {
                    Self::try_from(id)
                } else {
                    n.as_f64()
                        .ok_or_else(|| InvalidId(n.to_string()))
                        .and_then(Self::try_from)
                }
            }
            other => Err(InvalidId(other.to_string())),
        }
    }
}

/// Which collection a record belongs to.
///
/// The serialized form doubles as the key of the favorites structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    SourceCodes,
    BlogPosts,
}

impl ItemKind {
    pub const ALL: [ItemKind; 2] = [ItemKind::SourceCodes, ItemKind::BlogPosts];

    /// Human-readable plural, as used in status and failure messages.
    pub fn label(self) -> &'static str {
        match self {
            ItemKind::SourceCodes => "source codes",
            ItemKind::BlogPosts => "blog posts",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ItemKind::SourceCodes => "source_codes",
            ItemKind::BlogPosts => "blog_posts",
        })
    }
}

/// A source-code listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SourceCode {
    #[serde(deserialize_with = "item_id")]
    pub id: ItemId,
    #[serde(default, deserialize_with = "text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub thumbnail: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub demo: Option<String>,
    /// Repository URL; the ZIP download link is derived from it.
    #[serde(default, rename = "github_repo", deserialize_with = "text")]
    pub repository: Option<String>,
}

/// A blog post.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BlogPost {
    #[serde(deserialize_with = "item_id")]
    pub id: ItemId,
    #[serde(default, deserialize_with = "text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub thumbnail: Option<String>,
}

/// The view of a record that filtering and favorites need.
pub trait Record: DeserializeOwned {
    const KIND: ItemKind;

    fn id(&self) -> ItemId;
    fn title(&self) -> Option<&str>;
    /// The searchable long text: description for listings, content for posts.
    fn body(&self) -> Option<&str>;
    fn category(&self) -> Option<&str>;
}

impl Record for SourceCode {
    const KIND: ItemKind = ItemKind::SourceCodes;

    fn id(&self) -> ItemId {
        self.id
    }
    fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }
    fn body(&self) -> Option<&str> {
        self.description.as_deref()
    }
    fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }
}

impl Record for BlogPost {
    const KIND: ItemKind = ItemKind::BlogPosts;

    fn id(&self) -> ItemId {
        self.id
    }
    fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }
    fn body(&self) -> Option<&str> {
        self.content.as_deref()
    }
    fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }
}

/// Decode an endpoint payload into records of type `T`.
///
/// A payload that is not an array is an error.  Individual elements that do
/// not decode (most often because of a missing or non-integer `id`) are
/// dropped silently.
pub fn decode_records<T: Record>(payload: Value) -> Result<Vec<T>, FetchError> {
    let elements = match payload {
        Value::Array(elements) => elements,
        other => return Err(FetchError::NotAnArray(json_type_name(&other))),
    };

    let total = elements.len();
    let records: Vec<T> = elements
        .into_iter()
        .filter_map(|element| serde_json::from_value(element).ok())
        .collect();

    if records.len() < total {
        tracing::debug!(
            kind = %T::KIND,
            dropped = total - records.len(),
            "dropped malformed records"
        );
    }
    Ok(records)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn item_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ItemId, D::Error> {
    let value = Value::deserialize(deserializer)?;
    ItemId::try_from(&value).map_err(serde::de::Error::custom)
}

/// Keep non-empty strings; anything else counts as absent.
fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) if !s.is_empty() => Some(s),
        _ => None,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
