use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error};
use smol_str::{SmolStr, ToSmolStr};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::types::string::AtStrError;

/// Exactly three non-empty, slash-free segments after the scheme.
pub static AT_URI_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^at://([^/]+)/([^/]+)/([^/]+)$").unwrap());

/// The AT URI scheme prefix
pub const AT_URI_SCHEME: &str = "at://";

/// Compose `at://<authority>/<collection>/<rkey>`.
///
/// No validation happens here: the parts are expected to have already passed
/// their own validators, and none of them may contain `/` if the result is to
/// parse back.
pub fn compose(
    authority: impl AsRef<str>,
    collection: impl AsRef<str>,
    rkey: impl AsRef<str>,
) -> String {
    format!(
        "{AT_URI_SCHEME}{}/{}/{}",
        authority.as_ref(),
        collection.as_ref(),
        rkey.as_ref()
    )
}

/// An AT URI pointing at a single record.
///
/// ```
/// use weft_common::{AtUri, compose};
///
/// let uri = compose("did:plc:abc123", "app.bsky.feed.post", "3jzfcijpj2z2a");
/// let parsed = AtUri::parse(&uri).unwrap();
/// assert_eq!(parsed.collection(), "app.bsky.feed.post");
/// assert!(AtUri::parse("at://did:plc:abc123/app.bsky.feed.post").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AtUri {
    authority: SmolStr,
    collection: SmolStr,
    rkey: SmolStr,
}

impl AtUri {
    /// Build from parts without validation. See [`compose`].
    pub fn new(
        authority: impl AsRef<str>,
        collection: impl AsRef<str>,
        rkey: impl AsRef<str>,
    ) -> Self {
        Self {
            authority: authority.as_ref().to_smolstr(),
            collection: collection.as_ref().to_smolstr(),
            rkey: rkey.as_ref().to_smolstr(),
        }
    }

    /// Parse an AT URI. Returns `None` unless the input is exactly
    /// `at://` followed by three non-empty segments separated by single `/`.
    pub fn parse(uri: &str) -> Option<Self> {
        let caps = AT_URI_REGEX.captures(uri)?;
        Some(Self {
            authority: caps.get(1)?.as_str().to_smolstr(),
            collection: caps.get(2)?.as_str().to_smolstr(),
            rkey: caps.get(3)?.as_str().to_smolstr(),
        })
    }

    /// The repo the record lives in (a DID or handle)
    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// The collection NSID
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// The record key
    pub fn rkey(&self) -> &str {
        &self.rkey
    }
}

impl FromStr for AtUri {
    type Err = AtStrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Self::parse(s) {
            Some(uri) => Ok(uri),
            None if !s.starts_with(AT_URI_SCHEME) => Err(AtStrError::missing(
                "at-uri-scheme",
                s,
                AT_URI_SCHEME,
            )),
            None => Err(AtStrError::regex(
                "at-uri-scheme",
                s,
                SmolStr::new_static("expected at://<authority>/<collection>/<rkey>"),
            )),
        }
    }
}

impl fmt::Display for AtUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{AT_URI_SCHEME}{}/{}/{}",
            self.authority, self.collection, self.rkey
        )
    }
}

impl Serialize for AtUri {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AtUri {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value: SmolStr = Deserialize::deserialize(deserializer)?;
        value.parse().map_err(D::Error::custom)
    }
}

impl From<AtUri> for String {
    fn from(value: AtUri) -> Self {
        value.to_string()
    }
}
