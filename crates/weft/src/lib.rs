//! # weft
//!
//! AT Protocol record encoding without the network: timestamp identifiers,
//! AT URIs, rich text facets and `app.bsky.feed.post` records.
//!
//! ```
//! use weft::{Collection, generate, richtext};
//! use weft::post::{self, PostParams, PostRecord};
//!
//! let rich = richtext::extract("reading https://atproto.com #atproto");
//! let record = post::build(PostParams::from(rich));
//! assert_eq!(record.facets.as_ref().map(Vec::len), Some(2));
//!
//! let uri = PostRecord::record_uri("did:plc:abc123", generate());
//! assert_eq!(uri.collection(), "app.bsky.feed.post");
//! ```
//!
//! Everything here is synchronous and pure apart from reading the clock and
//! the random source for TIDs, so all of it is safe to call from any thread.

#![warn(missing_docs)]

pub mod graphemes;
pub mod post;
pub mod richtext;

pub use weft_common as common;
pub use weft_common::*;

pub use graphemes::grapheme_length;
pub use post::{PostParams, PostRecord};
pub use richtext::{Facet, FacetFeature, RichText, extract};
