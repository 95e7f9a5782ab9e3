//! Post length as users see it
//!
//! Length limits on posts (300 for `app.bsky.feed.post` text) count grapheme
//! clusters, not bytes or chars. With the default `graphemes` feature this is
//! exact, using extended grapheme clusters from `unicode-segmentation`.
//!
//! Without the feature, [`grapheme_length`] counts code points instead, which
//! is **not** a grapheme count. Every multi-code-point grapheme (emoji with
//! skin-tone modifiers, ZWJ families, flags, letters with combining marks)
//! counts as several characters, so the result can be larger than what the
//! user sees and text near a limit may be reported as too long. Check
//! [`GRAPHEME_AWARE`] if the difference matters.

/// True when [`grapheme_length`] counts real grapheme clusters
pub const GRAPHEME_AWARE: bool = cfg!(feature = "graphemes");

/// Number of user-perceived characters in `text`.
#[cfg(feature = "graphemes")]
pub fn grapheme_length(text: &str) -> usize {
    use unicode_segmentation::UnicodeSegmentation;
    text.graphemes(true).count()
}

/// Number of code points in `text`.
///
/// Fallback without the `graphemes` feature; see the module docs for how it
/// differs from a grapheme count.
#[cfg(not(feature = "graphemes"))]
pub fn grapheme_length(text: &str) -> usize {
    text.chars().count()
}
