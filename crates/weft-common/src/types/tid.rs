use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, de::Error};
use smol_str::{SmolStr, ToSmolStr};
use std::fmt;
use std::sync::LazyLock;
use std::{ops::Deref, str::FromStr};

use crate::types::string::AtStrError;

/// The sortable base32 alphabet TIDs are written in. Symbols are in ascending
/// ASCII order, so lexicographic order on TIDs matches numeric order.
pub const S32_CHAR: &[u8; 32] = b"234567abcdefghijklmnopqrstuvwxyz";

/// Length of every TID, in characters.
pub const TID_LEN: usize = 13;

const CLOCK_ID_MASK: u64 = 0x3FF;

fn s32_encode(mut i: u64) -> SmolStr {
    let mut buf = [0u8; TID_LEN];
    for slot in buf.iter_mut().rev() {
        *slot = S32_CHAR[(i & 0x1F) as usize];
        i >>= 5;
    }
    buf.iter().map(|&b| char::from(b)).collect()
}

fn s32_decode(s: &str) -> u64 {
    s.bytes().fold(0u64, |acc, b| {
        let digit = S32_CHAR.iter().position(|&c| c == b).unwrap_or(0) as u64;
        (acc << 5) | digit
    })
}

static TID_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[234567abcdefghij][234567abcdefghijklmnopqrstuvwxyz]{12}$").unwrap()
});

/// Generate a fresh [`Tid`] for the current time with a random clock identifier.
///
/// Two TIDs generated in the same microsecond (or by concurrent callers) may
/// compare in either order, and may in rare cases collide. Callers that need a
/// strict total order have to add their own coordination.
#[cfg_attr(feature = "tracing", tracing::instrument(level = "trace", ret))]
pub fn generate() -> Tid {
    Tid::now()
}

/// A [Timestamp Identifier].
///
/// 64 bits, written as 13 sortable base32 characters: the top bit is always
/// zero, then 53 bits of microseconds since the Unix epoch, then a 10-bit
/// clock identifier.
///
/// [Timestamp Identifier]: https://atproto.com/specs/tid
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Hash)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Tid(SmolStr);

impl Tid {
    /// Parses a `TID` from the given string.
    pub fn new(tid: impl AsRef<str>) -> Result<Self, AtStrError> {
        let tid = tid.as_ref();
        if tid.len() > TID_LEN {
            Err(AtStrError::too_long("tid", tid, TID_LEN, tid.len()))
        } else if tid.len() < TID_LEN {
            Err(AtStrError::too_short("tid", tid, TID_LEN, tid.len()))
        } else if !TID_REGEX.is_match(tid) {
            Err(AtStrError::regex(
                "tid",
                tid,
                SmolStr::new_static("didn't match schema"),
            ))
        } else {
            Ok(Self(tid.to_smolstr()))
        }
    }

    /// Construct a TID for the given time with the specified clock ID.
    ///
    /// Only the low 10 bits of `clock_id` are used. Times before the Unix
    /// epoch are clamped to it.
    pub fn from_datetime(clock_id: u16, time: DateTime<Utc>) -> Self {
        let time = time.timestamp_micros().max(0) as u64;

        // The TID is laid out as follows:
        // 0TTTTTTTTTTTTTTT TTTTTTTTTTTTTTTT TTTTTTTTTTTTTTTT TTTTTTCCCCCCCCCC
        let tid = (time << 10) & 0x7FFF_FFFF_FFFF_FC00 | (u64::from(clock_id) & CLOCK_ID_MASK);
        Self(s32_encode(tid))
    }

    /// Construct a new [Tid] for the current time, with a uniformly random clock ID.
    pub fn now() -> Self {
        Self::from_datetime(rand::random::<u16>(), Utc::now())
    }

    /// Microseconds since the Unix epoch encoded in this TID.
    pub fn timestamp_micros(&self) -> i64 {
        (s32_decode(&self.0) >> 10) as i64
    }

    /// The encoded time, if it is representable.
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_micros(self.timestamp_micros())
    }

    /// The 10-bit clock identifier.
    pub fn clock_id(&self) -> u16 {
        (s32_decode(&self.0) & CLOCK_ID_MASK) as u16
    }

    /// Returns the TID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Tid {
    type Err = AtStrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl<'de> Deserialize<'de> for Tid {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value: SmolStr = Deserialize::deserialize(deserializer)?;
        Self::new(&value).map_err(D::Error::custom)
    }
}

impl fmt::Display for Tid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Tid> for String {
    fn from(value: Tid) -> Self {
        value.0.to_string()
    }
}

impl From<Tid> for SmolStr {
    fn from(value: Tid) -> Self {
        value.0
    }
}

impl AsRef<str> for Tid {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Deref for Tid {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}
