use crate::types::string::AtStrError;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, de::Error};
use smol_str::{SmolStr, ToSmolStr};
use std::fmt;
use std::sync::LazyLock;
use std::{ops::Deref, str::FromStr};

/// Handle grammar: DNS labels (alphanumeric at both ends, hyphens allowed
/// inside, at most 63 characters) followed by an all-letter top-level label.
pub static HANDLE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-zA-Z0-9]([a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?\.)+[a-zA-Z]{1,63}$").unwrap()
});

/// Maximum length of a handle, in bytes (the DNS name limit).
pub const MAX_HANDLE_LEN: usize = 253;

/// Returns true if `s` is a syntactically valid handle.
///
/// ```
/// use weft_common::is_valid_handle;
///
/// assert!(is_valid_handle("alice.bsky.social"));
/// assert!(!is_valid_handle("alice"));
/// ```
pub fn is_valid_handle(s: &str) -> bool {
    s.len() <= MAX_HANDLE_LEN && HANDLE_REGEX.is_match(s)
}

/// A domain-name-shaped alias for a [`Did`](crate::Did).
///
/// Stored without the leading `@`; `Display` adds it back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Hash)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Handle(SmolStr);

impl Handle {
    /// Fallible constructor, validates
    ///
    /// Accepts (and strips) preceding '@' if present. Handles are
    /// case-insensitive and are normalized to lowercase.
    pub fn new(handle: impl AsRef<str>) -> Result<Self, AtStrError> {
        let handle = handle.as_ref();
        let handle = handle.strip_prefix('@').unwrap_or(handle);
        if handle.len() > MAX_HANDLE_LEN {
            Err(AtStrError::too_long(
                "handle",
                handle,
                MAX_HANDLE_LEN,
                handle.len(),
            ))
        } else if !HANDLE_REGEX.is_match(handle) {
            Err(AtStrError::regex(
                "handle",
                handle,
                SmolStr::new_static("invalid"),
            ))
        } else {
            Ok(Self(handle.to_ascii_lowercase().to_smolstr()))
        }
    }

    /// The top-level label, e.g. `social` for `alice.bsky.social`
    pub fn tld(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or_default()
    }

    /// Returns the handle as a string slice, without the `@`.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Handle {
    type Err = AtStrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl<'de> Deserialize<'de> for Handle {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value: SmolStr = Deserialize::deserialize(deserializer)?;
        Self::new(&value).map_err(D::Error::custom)
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

impl From<Handle> for String {
    fn from(value: Handle) -> Self {
        value.0.to_string()
    }
}

impl AsRef<str> for Handle {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Deref for Handle {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}
