//! `app.bsky.feed.post` records
//!
//! [`build`] turns [`PostParams`] into a [`PostRecord`] ready to be written to
//! a repo: defaults filled in, unresolved mentions dropped, empty optional
//! fields left out of the JSON entirely.

use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error};
use smol_str::SmolStr;
use weft_common::{AtUri, Collection, Datetime, Language};

use crate::richtext::{Facet, RichText};

/// A URI plus the CID of the exact record version it points at.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct StrongRef {
    /// Record location
    pub uri: AtUri,
    /// Content hash of the record
    pub cid: SmolStr,
}

impl StrongRef {
    /// Create a strong reference
    pub fn new(uri: AtUri, cid: impl Into<SmolStr>) -> Self {
        Self {
            uri,
            cid: cid.into(),
        }
    }
}

/// Where a reply sits in its thread
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReplyRef {
    /// First post of the thread
    pub root: StrongRef,
    /// Post being replied to directly
    pub parent: StrongRef,
}

impl ReplyRef {
    /// Reply to a top-level post, which is both root and parent
    pub fn to_root(post: StrongRef) -> Self {
        Self {
            root: post.clone(),
            parent: post,
        }
    }
}

/// An embed attached to a post.
///
/// Opaque apart from its `$type`; every other field passes through as-is.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Embed {
    /// Lexicon type of the embed, e.g. `app.bsky.embed.images`
    #[serde(rename = "$type")]
    pub r#type: SmolStr,
    /// Everything else
    #[serde(flatten)]
    pub data: serde_json::Map<String, serde_json::Value>,
}

impl Embed {
    /// An embed of the given type with arbitrary fields
    pub fn new(
        r#type: impl Into<SmolStr>,
        data: serde_json::Map<String, serde_json::Value>,
    ) -> Self {
        Self {
            r#type: r#type.into(),
            data,
        }
    }

    /// Quote another record (`app.bsky.embed.record`)
    pub fn record(record: &StrongRef) -> Self {
        let mut data = serde_json::Map::new();
        data.insert(
            "record".into(),
            serde_json::json!({ "uri": record.uri.to_string(), "cid": record.cid.as_str() }),
        );
        Self::new("app.bsky.embed.record", data)
    }

    /// Link card (`app.bsky.embed.external`)
    pub fn external(
        uri: impl AsRef<str>,
        title: impl AsRef<str>,
        description: impl AsRef<str>,
    ) -> Self {
        let mut data = serde_json::Map::new();
        data.insert(
            "external".into(),
            serde_json::json!({
                "uri": uri.as_ref(),
                "title": title.as_ref(),
                "description": description.as_ref(),
            }),
        );
        Self::new("app.bsky.embed.external", data)
    }
}

/// The `$type` field of a post. Always `app.bsky.feed.post`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PostType;

impl Serialize for PostType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(PostRecord::NSID)
    }
}

impl<'de> Deserialize<'de> for PostType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value: SmolStr = Deserialize::deserialize(deserializer)?;
        if value == PostRecord::NSID {
            Ok(PostType)
        } else {
            Err(D::Error::custom(format!(
                "expected `$type` {}, found {value}",
                PostRecord::NSID
            )))
        }
    }
}

/// Record containing a Bluesky post.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PostRecord {
    #[serde(rename = "$type", default)]
    record_type: PostType,
    /// Post text
    pub text: String,
    /// Client-declared creation time
    pub created_at: Datetime,
    /// Languages the text is written in
    pub langs: Vec<Language>,
    /// Rich text annotations, none of them unresolved mentions
    #[serde(skip_serializing_if = "std::option::Option::is_none", default)]
    pub facets: Option<Vec<Facet>>,
    /// Thread position if this is a reply
    #[serde(skip_serializing_if = "std::option::Option::is_none", default)]
    pub reply: Option<ReplyRef>,
    /// Attached media or record
    #[serde(skip_serializing_if = "std::option::Option::is_none", default)]
    pub embed: Option<Embed>,
}

impl Collection for PostRecord {
    const NSID: &'static str = "app.bsky.feed.post";
}

impl PostRecord {
    /// Wire JSON for the record
    pub fn to_json(&self) -> serde_json::Value {
        // Every field serializes to a string, array or map, so this can't fail.
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Everything that goes into a post. Only `text` is required.
///
/// ```
/// use weft::post::{self, PostParams};
///
/// let record = post::build(PostParams::new().text("hello").build());
/// assert_eq!(record.langs[0].as_str(), "en");
/// assert!(record.facets.is_none());
/// ```
#[derive(Debug, Clone, Default, bon::Builder)]
#[builder(start_fn = new)]
pub struct PostParams {
    /// Post text
    #[builder(into)]
    pub text: String,
    /// Facets, usually from [`crate::richtext::extract`]
    pub facets: Option<Vec<Facet>>,
    /// Creation time; now if absent
    pub created_at: Option<Datetime>,
    /// Languages; `["en"]` if absent or empty
    pub langs: Option<Vec<Language>>,
    /// Reply reference
    pub reply: Option<ReplyRef>,
    /// Embed
    pub embed: Option<Embed>,
}

impl From<RichText> for PostParams {
    fn from(rich: RichText) -> Self {
        Self {
            text: rich.text,
            facets: Some(rich.facets),
            ..Default::default()
        }
    }
}

impl From<PostParams> for PostRecord {
    fn from(params: PostParams) -> Self {
        build(params)
    }
}

/// Assemble a post record.
///
/// Facets containing a mention with an empty DID are dropped one by one; the
/// rest keep their order. If nothing is left the `facets` field is omitted.
/// Missing `reply`/`embed` are omitted too. Never fails.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(level = "debug", skip_all, fields(text_len = params.text.len()))
)]
pub fn build(params: PostParams) -> PostRecord {
    let facets = params
        .facets
        .map(|facets| {
            facets
                .into_iter()
                .filter(|facet| {
                    if facet.has_unresolved_mention() {
                        #[cfg(feature = "tracing")]
                        tracing::debug!(
                            handle = facet.unresolved_handle.as_deref(),
                            start = facet.index.byte_start,
                            "dropping unresolved mention"
                        );
                        return false;
                    }
                    true
                })
                .collect::<Vec<_>>()
        })
        .filter(|facets| !facets.is_empty());

    let langs = params
        .langs
        .filter(|langs| !langs.is_empty())
        .unwrap_or_else(|| vec![Language::default()]);

    PostRecord {
        record_type: PostType,
        text: params.text,
        created_at: params.created_at.unwrap_or_else(Datetime::now),
        langs,
        facets,
        reply: params.reply,
        embed: params.embed,
    }
}
