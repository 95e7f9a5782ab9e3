/// AT URIs (`at://<authority>/<collection>/<rkey>`)
pub mod aturi;
/// Record collections and their NSIDs
pub mod collection;
/// Lexicon datetimes
pub mod datetime;
/// Decentralized identifiers
pub mod did;
/// Domain-name-shaped account handles
pub mod handle;
/// IETF language tags
pub mod language;
/// Parse errors shared by the string types
pub mod string;
/// Timestamp identifiers
pub mod tid;
