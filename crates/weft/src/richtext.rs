//! Rich text facets for Bluesky posts
//!
//! Scans post text for mentions, links and hashtags and turns each match into
//! a [`Facet`]: a byte range over the UTF-8 encoded text plus a typed feature.
//!
//! The three kinds are found by three independent passes over the same text.
//! A later pass can produce a facet overlapping one from an earlier pass (a
//! `#fragment` inside a URL, say); those are kept as-is. The combined list is
//! then sorted by start offset, ties keeping pass order (mentions, links,
//! hashtags).
//!
//! ```
//! use weft::richtext::{self, FacetFeature};
//!
//! let rich = richtext::extract("🎉 #hi");
//! assert_eq!(rich.facets.len(), 1);
//! assert_eq!(rich.facets[0].index.byte_start, 5);
//! assert_eq!(rich.facets[0].features[0], FacetFeature::Tag { tag: "hi".into() });
//! ```

use regex::{Match, Regex};
use serde::{Deserialize, Serialize};
use smol_str::{SmolStr, ToSmolStr};
use std::ops::Range;
use std::sync::LazyLock;
use weft_common::Did;

#[cfg(test)]
mod tests;

/// `$type` of a mention feature
pub const MENTION_TYPE: &str = "app.bsky.richtext.facet#mention";
/// `$type` of a link feature
pub const LINK_TYPE: &str = "app.bsky.richtext.facet#link";
/// `$type` of a hashtag feature
pub const TAG_TYPE: &str = "app.bsky.richtext.facet#tag";

// `@`, then one or more dot-terminated DNS labels, then a final label that
// starts with a letter.
static MENTION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"@(?:[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?\.)+[a-zA-Z](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?",
    )
    .unwrap()
});

// The last character can't be sentence punctuation, so "see https://a.com."
// links "https://a.com". A trailing `)` is settled by `trim_link`.
static URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://[a-zA-Z0-9\-._~:/?#\[\]@!$&'()*+,;=%]*[a-zA-Z0-9\-_~/#\[@$&(*+=%)]")
        .unwrap()
});

const LINK_TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', '\'', ']'];

static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#\p{L}[\p{L}\p{N}_]*").unwrap());

/// Specifies the sub-string range a facet feature applies to.
///
/// Start is inclusive, end is exclusive. Both count bytes of the UTF-8
/// encoded text, not chars, UTF-16 units or graphemes.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct ByteSlice {
    /// First byte covered
    pub byte_start: usize,
    /// One past the last byte covered
    pub byte_end: usize,
}

impl ByteSlice {
    /// The covered range, usable to index the original `str`
    pub fn range(&self) -> Range<usize> {
        self.byte_start..self.byte_end
    }

    /// Number of bytes covered
    pub fn len(&self) -> usize {
        self.byte_end.saturating_sub(self.byte_start)
    }

    /// True when the slice covers nothing
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether two slices share at least one byte
    pub fn overlaps(&self, other: &ByteSlice) -> bool {
        self.byte_start < other.byte_end && other.byte_start < self.byte_end
    }
}

impl From<Range<usize>> for ByteSlice {
    fn from(range: Range<usize>) -> Self {
        Self {
            byte_start: range.start,
            byte_end: range.end,
        }
    }
}

/// What a facet annotates
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(tag = "$type")]
pub enum FacetFeature {
    /// Mention of another account. The text is usually a handle; the
    /// reference is a DID, empty until resolved.
    #[serde(rename = "app.bsky.richtext.facet#mention")]
    Mention {
        /// DID of the mentioned account
        did: SmolStr,
    },
    /// A URL
    #[serde(rename = "app.bsky.richtext.facet#link")]
    Link {
        /// The full URL
        uri: SmolStr,
    },
    /// A hashtag, without the leading `#`
    #[serde(rename = "app.bsky.richtext.facet#tag")]
    Tag {
        /// Tag text
        tag: SmolStr,
    },
}

impl FacetFeature {
    /// The lexicon `$type` of this feature
    pub fn type_tag(&self) -> &'static str {
        match self {
            FacetFeature::Mention { .. } => MENTION_TYPE,
            FacetFeature::Link { .. } => LINK_TYPE,
            FacetFeature::Tag { .. } => TAG_TYPE,
        }
    }

    /// A mention whose DID hasn't been filled in
    pub fn is_unresolved_mention(&self) -> bool {
        matches!(self, FacetFeature::Mention { did } if did.is_empty())
    }
}

/// Annotation of a sub-string within rich text.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Facet {
    /// Where in the text
    pub index: ByteSlice,
    /// What it is
    pub features: Vec<FacetFeature>,
    /// Handle still waiting for a DID, for mentions found by [`extract`].
    ///
    /// Never serialized.
    #[serde(skip)]
    pub unresolved_handle: Option<SmolStr>,
}

impl Facet {
    /// A mention of an account whose DID is already known
    pub fn mention(index: impl Into<ByteSlice>, did: &Did) -> Self {
        Self {
            index: index.into(),
            features: vec![FacetFeature::Mention {
                did: did.as_str().to_smolstr(),
            }],
            unresolved_handle: None,
        }
    }

    /// A mention by handle, DID left empty
    pub fn unresolved_mention(index: impl Into<ByteSlice>, handle: impl AsRef<str>) -> Self {
        Self {
            index: index.into(),
            features: vec![FacetFeature::Mention { did: SmolStr::default() }],
            unresolved_handle: Some(handle.as_ref().to_smolstr()),
        }
    }

    /// A link
    pub fn link(index: impl Into<ByteSlice>, uri: impl AsRef<str>) -> Self {
        Self {
            index: index.into(),
            features: vec![FacetFeature::Link {
                uri: uri.as_ref().to_smolstr(),
            }],
            unresolved_handle: None,
        }
    }

    /// A hashtag; `tag` excludes the `#`
    pub fn tag(index: impl Into<ByteSlice>, tag: impl AsRef<str>) -> Self {
        Self {
            index: index.into(),
            features: vec![FacetFeature::Tag {
                tag: tag.as_ref().to_smolstr(),
            }],
            unresolved_handle: None,
        }
    }

    /// True if any feature is a mention with an empty DID
    pub fn has_unresolved_mention(&self) -> bool {
        self.features.iter().any(FacetFeature::is_unresolved_mention)
    }

    /// The annotated part of `text`, if the range fits it
    pub fn slice<'t>(&self, text: &'t str) -> Option<&'t str> {
        text.get(self.index.range())
    }
}

/// Text plus the facets found in it
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RichText {
    /// The original text, unchanged
    pub text: String,
    /// Facets sorted by `byte_start`
    pub facets: Vec<Facet>,
}

impl RichText {
    /// Handles of mentions that still have no DID
    pub fn unresolved_handles(&self) -> impl Iterator<Item = &str> {
        self.facets
            .iter()
            .filter(|f| f.has_unresolved_mention())
            .filter_map(|f| f.unresolved_handle.as_deref())
    }

    /// Fill in mention DIDs.
    ///
    /// `resolver` is asked once per unresolved mention, with the handle
    /// (no `@`). Mentions it returns `None` for stay unresolved and will be
    /// dropped when the post is built. Lookups are up to the caller; nothing
    /// here touches the network.
    pub fn resolve_mentions<F>(&mut self, mut resolver: F) -> usize
    where
        F: FnMut(&str) -> Option<Did>,
    {
        let mut resolved = 0;
        for facet in &mut self.facets {
            let Some(handle) = facet.unresolved_handle.as_deref() else {
                continue;
            };
            let Some(did) = resolver(handle) else {
                #[cfg(feature = "tracing")]
                tracing::debug!(handle, "mention left unresolved");
                continue;
            };
            for feature in &mut facet.features {
                if let FacetFeature::Mention { did: slot } = feature {
                    if slot.is_empty() {
                        *slot = did.as_str().to_smolstr();
                    }
                }
            }
            facet.unresolved_handle = None;
            resolved += 1;
        }
        resolved
    }

    /// User-perceived length of the text. See [`crate::graphemes`].
    pub fn grapheme_length(&self) -> usize {
        crate::graphemes::grapheme_length(&self.text)
    }
}

/// Next match of `pattern` starting at or after byte `from`.
///
/// The scan position lives with the caller, so each pass is an ordinary
/// iterator with no state shared between passes or threads.
fn next_match<'t>(pattern: &Regex, text: &'t str, from: usize) -> Option<Match<'t>> {
    if from > text.len() {
        return None;
    }
    pattern.find_at(text, from)
}

fn scan<'t>(pattern: &'t Regex, text: &'t str) -> impl Iterator<Item = Match<'t>> + 't {
    let mut from = 0;
    std::iter::from_fn(move || {
        let found = next_match(pattern, text, from)?;
        from = found.end();
        Some(found)
    })
}

// `str` offsets are already UTF-8 byte offsets, so match positions go
// straight into the facet index.
fn detect_mentions(text: &str) -> Vec<Facet> {
    scan(&MENTION_REGEX, text)
        .map(|m| Facet::unresolved_mention(m.range(), &m.as_str()[1..]))
        .collect()
}

/// Drop a `)` that closes a paren opened before the link, plus any
/// punctuation it uncovers. `wiki/Rust_(language)` keeps its paren.
fn trim_link(url: &str) -> &str {
    let mut url = url;
    loop {
        url = url.trim_end_matches(LINK_TRAILING_PUNCTUATION);
        let unbalanced = url.matches(')').count() > url.matches('(').count();
        match url.strip_suffix(')') {
            Some(rest) if unbalanced => url = rest,
            _ => return url,
        }
    }
}

fn detect_links(text: &str) -> Vec<Facet> {
    scan(&URL_REGEX, text)
        .filter_map(|m| {
            let url = trim_link(m.as_str());
            // "https://)" has nothing left after the scheme
            if url.ends_with("://") {
                return None;
            }
            Some(Facet::link(m.start()..m.start() + url.len(), url))
        })
        .collect()
}

/// Combine the three passes, ordered by start offset. The sort is stable,
/// so equal starts keep pass order: mentions, links, hashtags.
fn merge_passes(mentions: Vec<Facet>, links: Vec<Facet>, tags: Vec<Facet>) -> Vec<Facet> {
    let mut facets = mentions;
    facets.extend(links);
    facets.extend(tags);
    facets.sort_by_key(|f| f.index.byte_start);
    facets
}

fn detect_tags(text: &str) -> Vec<Facet> {
    scan(&TAG_REGEX, text)
        .map(|m| Facet::tag(m.range(), &m.as_str()[1..]))
        .collect()
}

/// Find every mention, link and hashtag in `text`.
///
/// Mentions come back unresolved: an empty DID and the handle in
/// [`Facet::unresolved_handle`]. Text without matches gives an empty list.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(level = "debug", skip(text), fields(len = text.len()))
)]
pub fn extract(text: &str) -> RichText {
    let facets = merge_passes(detect_mentions(text), detect_links(text), detect_tags(text));

    #[cfg(feature = "tracing")]
    tracing::debug!(facets = facets.len(), "extracted facets");

    RichText {
        text: text.to_string(),
        facets,
    }
}
