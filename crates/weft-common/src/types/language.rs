use serde::{Deserialize, Deserializer, Serialize, de::Error};
use smol_str::SmolStr;
use std::fmt;
use std::{ops::Deref, str::FromStr};

use crate::types::string::AtStrError;

/// Language posts are tagged with when the caller doesn't say otherwise.
pub const DEFAULT_LANGUAGE: &str = "en";

/// An IETF language tag.
///
/// Uses langtag crate for validation, but is stored as a SmolStr for size/avoiding allocations
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Hash)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Language(SmolStr);

impl Language {
    /// Parses an IETF language tag from the given string.
    pub fn new(lang: &str) -> Result<Self, AtStrError> {
        match langtag::LangTag::new(lang) {
            Ok(tag) => Ok(Language(SmolStr::new(tag.as_str()))),
            Err(_) => Err(AtStrError::regex(
                "lexicon#language",
                lang,
                SmolStr::new_static("not a BCP 47 language tag"),
            )),
        }
    }

    /// Returns the LANG as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Language {
    fn default() -> Self {
        Language(SmolStr::new_static(DEFAULT_LANGUAGE))
    }
}

impl FromStr for Language {
    type Err = AtStrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl<'de> Deserialize<'de> for Language {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value: SmolStr = Deserialize::deserialize(deserializer)?;
        Self::new(&value).map_err(D::Error::custom)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Language {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Deref for Language {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}
