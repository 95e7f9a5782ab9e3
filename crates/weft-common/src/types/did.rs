use crate::types::string::AtStrError;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, de::Error};
use smol_str::{SmolStr, ToSmolStr};
use std::fmt;
use std::sync::LazyLock;
use std::{ops::Deref, str::FromStr};

/// Regex for DID validation.
///
/// The method is lowercase ASCII letters. The method-specific identifier allows
/// `%` but does not check that percent-encoding is well-formed.
pub static DID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^did:[a-z]+:[a-zA-Z0-9._:%-]+$").unwrap());

/// Maximum length of a DID, in bytes.
pub const MAX_DID_LEN: usize = 2048;

/// Returns true if `s` is a syntactically valid DID (`did:<method>:<identifier>`).
///
/// ```
/// use weft_common::is_valid_did;
///
/// assert!(is_valid_did("did:plc:abc123"));
/// assert!(!is_valid_did("plc:abc123"));
/// ```
pub fn is_valid_did(s: &str) -> bool {
    s.len() <= MAX_DID_LEN && DID_REGEX.is_match(s)
}

/// A [Decentralized Identifier].
///
/// [Decentralized Identifier]: https://atproto.com/specs/did
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Hash)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Did(SmolStr);

impl Did {
    /// Fallible constructor, validates
    pub fn new(did: impl AsRef<str>) -> Result<Self, AtStrError> {
        let did = did.as_ref();
        if did.len() > MAX_DID_LEN {
            Err(AtStrError::too_long("did", did, MAX_DID_LEN, did.len()))
        } else if !DID_REGEX.is_match(did) {
            Err(AtStrError::regex("did", did, SmolStr::new_static("invalid")))
        } else {
            Ok(Self(did.to_smolstr()))
        }
    }

    /// Fallible constructor, validates, doesn't allocate
    pub fn new_static(did: &'static str) -> Result<Self, AtStrError> {
        if did.len() > MAX_DID_LEN {
            Err(AtStrError::too_long("did", did, MAX_DID_LEN, did.len()))
        } else if !DID_REGEX.is_match(did) {
            Err(AtStrError::regex("did", did, SmolStr::new_static("invalid")))
        } else {
            Ok(Self(SmolStr::new_static(did)))
        }
    }

    /// The DID method, e.g. `plc` for `did:plc:...`
    pub fn method(&self) -> &str {
        self.0.split(':').nth(1).unwrap_or_default()
    }

    /// Returns the DID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Did {
    type Err = AtStrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl<'de> Deserialize<'de> for Did {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value: SmolStr = Deserialize::deserialize(deserializer)?;
        Self::new(&value).map_err(D::Error::custom)
    }
}

impl fmt::Display for Did {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Did {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl From<Did> for String {
    fn from(value: Did) -> Self {
        value.0.to_string()
    }
}

impl From<Did> for SmolStr {
    fn from(value: Did) -> Self {
        value.0
    }
}

impl AsRef<str> for Did {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Deref for Did {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}
