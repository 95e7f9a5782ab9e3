use chrono::DurationRound;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error};
use smol_str::{SmolStr, ToSmolStr};
use std::fmt;
use std::sync::LazyLock;
use std::{cmp, str::FromStr};

use crate::types::string::AtStrError;

/// Regex for ISO 8601 datetime validation per AT Protocol spec
pub static ISO8601_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-9]{2}(\.[0-9]+)?(Z|(\+[0-9]{2}|\-(0[1-9]|[1-9][0-9])):[0-9]{2})$").unwrap()
});

/// AT Protocol datetime (ISO 8601 with specific requirements)
///
/// Values created locally are always written in UTC with millisecond
/// precision and a `Z` suffix, e.g. `"2024-05-01T12:00:00.000Z"`. Parsed values
/// keep their original serialized form so they round-trip exactly.
#[derive(Clone, Debug, Eq)]
pub struct Datetime {
    serialized: SmolStr,
    dt: chrono::DateTime<chrono::FixedOffset>,
}

impl PartialEq for Datetime {
    fn eq(&self, other: &Self) -> bool {
        self.dt == other.dt
    }
}

impl std::hash::Hash for Datetime {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.dt.hash(state);
    }
}

impl Ord for Datetime {
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        self.dt.cmp(&other.dt)
    }
}

impl PartialOrd for Datetime {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Datetime {
    /// The current date and time in UTC.
    pub fn now() -> Self {
        Self::new(chrono::Utc::now())
    }

    /// Constructs a new record timestamp, truncated to millisecond precision.
    pub fn new<Tz: chrono::TimeZone>(dt: chrono::DateTime<Tz>) -> Self {
        let dt = dt.with_timezone(&chrono::Utc);
        let dt = dt
            .duration_trunc(chrono::Duration::milliseconds(1))
            .unwrap_or(dt);
        let serialized = dt
            .to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
            .to_smolstr();
        Self {
            serialized,
            dt: dt.fixed_offset(),
        }
    }

    /// The parsed value
    pub fn as_chrono(&self) -> &chrono::DateTime<chrono::FixedOffset> {
        &self.dt
    }

    /// Extracts a string slice containing the entire `Datetime`.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.serialized
    }
}

impl FromStr for Datetime {
    type Err = AtStrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // chrono only parses RFC 3339, and Lexicon datetimes are the subset
        // that is also valid ISO 8601. The regex narrows to that subset.
        if !ISO8601_REGEX.is_match(s) {
            return Err(AtStrError::regex(
                "lexicon#datetime",
                s,
                SmolStr::new_static("not an ISO 8601 datetime with timezone"),
            ));
        }
        let dt = chrono::DateTime::parse_from_rfc3339(s).map_err(|e| {
            AtStrError::regex("lexicon#datetime", s, e.to_smolstr())
        })?;
        Ok(Self {
            serialized: s.to_smolstr(),
            dt,
        })
    }
}

impl Serialize for Datetime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Datetime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value: SmolStr = Deserialize::deserialize(deserializer)?;
        value.parse().map_err(D::Error::custom)
    }
}

impl fmt::Display for Datetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<chrono::DateTime<chrono::Utc>> for Datetime {
    fn from(dt: chrono::DateTime<chrono::Utc>) -> Self {
        Self::new(dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn fixed_format() {
        let dt = chrono::Utc
            .with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
            .unwrap()
            + chrono::Duration::microseconds(123_456);
        assert_eq!(Datetime::new(dt).as_str(), "2024-05-01T12:00:00.123Z");
    }

    #[test]
    fn offsets_normalize_to_utc() {
        let tz = chrono::FixedOffset::east_opt(2 * 3600).unwrap();
        let dt = tz.with_ymd_and_hms(2024, 5, 1, 14, 0, 0).unwrap();
        assert_eq!(Datetime::new(dt).as_str(), "2024-05-01T12:00:00.000Z");
    }

    #[test]
    fn now_matches_regex() {
        let now = Datetime::now();
        assert!(ISO8601_REGEX.is_match(now.as_str()));
        assert!(now.as_str().ends_with('Z'));
    }

    #[test]
    fn parse_round_trips_serialized_form() {
        let s = "1985-04-12T23:20:50.123456+00:00";
        let dt: Datetime = s.parse().unwrap();
        assert_eq!(dt.as_str(), s);
        assert_eq!(serde_json::to_string(&dt).unwrap(), format!("\"{s}\""));

        for s in ["2024-05-01T02:00:00.000-10:00", "2024-05-01T02:00:00.000-05:00"] {
            let dt: Datetime = s.parse().unwrap();
            assert_eq!(dt.as_str(), s);
        }
        let hawaii: Datetime = "2024-05-01T02:00:00.000-10:00".parse().unwrap();
        let utc: Datetime = "2024-05-01T12:00:00.000Z".parse().unwrap();
        assert_eq!(hawaii, utc);
    }

    #[test]
    fn parse_rejects_invalid() {
        assert!("1985-04-12".parse::<Datetime>().is_err());
        assert!("1985-04-12T23:20:50".parse::<Datetime>().is_err());
        assert!("1985-04-12 23:20:50Z".parse::<Datetime>().is_err());
        assert!("1985-13-12T23:20:50Z".parse::<Datetime>().is_err());
        // negative zero offset
        assert!("1985-04-12T23:20:50.000-00:00".parse::<Datetime>().is_err());
    }
}
