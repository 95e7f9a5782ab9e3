use miette::SourceSpan;
use smol_str::SmolStr;

/// Parsing error for atproto string types.
///
/// `spec` refers to the final url path segment on atproto.com/specs,
/// detailing the specification for the type
/// `source` is the source string, or part of it
/// `kind` is the type of parsing error: `[StrParseKind]`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, miette::Diagnostic)]
#[error("error in `{source}`: {kind}")]
#[diagnostic(
    url("https://atproto.com/specs/{spec}"),
    help("if something doesn't match the spec, contact the crate author")
)]
pub struct AtStrError {
    /// The atproto spec page the string type is defined on
    pub spec: SmolStr,
    /// The offending input
    #[source_code]
    pub source: String,
    /// What went wrong
    #[source]
    #[diagnostic_source]
    pub kind: StrParseKind,
}

impl AtStrError {
    /// Create an error from its parts
    pub fn new(spec: &'static str, source: impl Into<String>, kind: StrParseKind) -> Self {
        Self {
            spec: SmolStr::new_static(spec),
            source: source.into(),
            kind,
        }
    }

    /// Input longer than the type allows
    pub fn too_long(spec: &'static str, source: &str, max: usize, actual: usize) -> Self {
        Self::new(spec, source, StrParseKind::TooLong { max, actual })
    }

    /// Input shorter than the type allows
    pub fn too_short(spec: &'static str, source: &str, min: usize, actual: usize) -> Self {
        Self::new(spec, source, StrParseKind::TooShort { min, actual })
    }

    /// missing component, with what was expected to be found
    pub fn missing(spec: &'static str, source: &str, expected: &str) -> Self {
        Self::new(
            spec,
            source,
            StrParseKind::MissingComponent {
                span: None,
                message: SmolStr::new(expected),
            },
        )
    }

    /// Input didn't match the type's grammar
    pub fn regex(spec: &'static str, source: &str, message: SmolStr) -> Self {
        Self::new(
            spec,
            source,
            StrParseKind::RegexFail {
                span: None,
                message,
            },
        )
    }
}

/// The kinds of failure an atproto string type can report
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, miette::Diagnostic)]
pub enum StrParseKind {
    /// Input didn't match the grammar
    #[error("regex failure - {message}")]
    #[diagnostic(code(weft::types::string::regex_fail))]
    RegexFail {
        /// Where in the input, if known
        #[label]
        span: Option<SourceSpan>,
        /// Details
        #[help]
        message: SmolStr,
    },
    /// Input too long
    #[error("string too long (allowed: {max}, actual: {actual})")]
    #[diagnostic(code(weft::types::string::wrong_length))]
    TooLong {
        /// Maximum length in bytes
        max: usize,
        /// Actual length in bytes
        actual: usize,
    },
    /// Input too short
    #[error("string too short (allowed: {min}, actual: {actual})")]
    #[diagnostic(code(weft::types::string::wrong_length))]
    TooShort {
        /// Minimum length in bytes
        min: usize,
        /// Actual length in bytes
        actual: usize,
    },
    /// A required piece of the string is missing
    #[error("missing - {message}")]
    #[diagnostic(code(weft::types::string::missing_component))]
    MissingComponent {
        /// Where it was expected, if known
        #[label]
        span: Option<SourceSpan>,
        /// What was expected
        #[help]
        message: SmolStr,
    },
}
