//! Common types for the weft implementation of atproto record encoding
//!
//! Everything in here is a leaf: string newtypes for the identifiers that show
//! up in records (DIDs, handles, TIDs, AT URIs, datetimes, language tags),
//! plus the grammar predicates that back them.

#![warn(missing_docs)]
pub use smol_str;

/// Baseline fundamental AT Protocol data types.
pub mod types;

pub use types::aturi::{AtUri, compose};
pub use types::collection::Collection;
pub use types::datetime::Datetime;
pub use types::did::{Did, is_valid_did};
pub use types::handle::{Handle, is_valid_handle};
pub use types::language::{DEFAULT_LANGUAGE, Language};
pub use types::string::{AtStrError, StrParseKind};
pub use types::tid::{Tid, generate};
