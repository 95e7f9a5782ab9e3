use core::fmt;

use serde::Serialize;

use crate::types::aturi::AtUri;

/// Trait for a collection of records that can be stored in a repository.
///
/// The records all have the same Lexicon schema.
///
/// Implemented on the record type itself.
pub trait Collection: fmt::Debug + Serialize {
    /// The NSID for the Lexicon that defines the schema of records in this collection.
    const NSID: &'static str;

    /// The AT URI of a record in this collection.
    ///
    /// `rkey` is usually a [`Tid`](crate::Tid).
    fn record_uri(authority: impl AsRef<str>, rkey: impl AsRef<str>) -> AtUri {
        AtUri::new(authority, Self::NSID, rkey)
    }
}
