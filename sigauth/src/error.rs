//! Error types for the canonicalizer, header codec, and verifier.
//!
//! Hand rolled enums with `Display` + `std::error::Error`, no `thiserror`.

use std::fmt;

/// Non-OK outcome of the canonicalizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanonicalError {
    /// The request carries a body but no `Content-Type` header.
    MissingContentType,
    /// The `Content-Type` is not one of the recognized media types.
    UnsupportedContentType(String),
    /// The body could not be interpreted under its declared `Content-Type`.
    InvalidRequestBody(String),
}

impl fmt::Display for CanonicalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingContentType => write!(f, "missing Content-Type"),
            Self::UnsupportedContentType(ct) => write!(f, "unsupported Content-Type: {ct}"),
            Self::InvalidRequestBody(detail) => write!(f, "invalid request body: {detail}"),
        }
    }
}

impl std::error::Error for CanonicalError {}

/// Failure to parse an `Authorization` credential, from either the header
/// or the `~auth` query-parameter fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationError {
    /// Neither the header nor the `~auth` query parameter was present.
    Missing,
    /// The `Authorization` header occurred more than once.
    TooManyHeaders,
    /// No whitespace separating scheme from the parameter list.
    SchemeError,
    /// The scheme token did not match the configured expected scheme.
    SchemeMatchError { expected: String, found: String },
    /// `Timestamp=` was present but not a valid signed 64-bit integer.
    TimestampError,
    /// `Version=` was present but not a valid integer.
    VersionError,
}

impl fmt::Display for AuthorizationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "Authorization missing: no header and no ~auth query parameter"),
            Self::TooManyHeaders => write!(f, "Authorization header present more than one time"),
            Self::SchemeError => write!(f, "Authorization scheme error: missing space after scheme"),
            Self::SchemeMatchError { expected, found } => {
                write!(f, "Authorization scheme match error: expected {expected}, found {found}")
            }
            Self::TimestampError => write!(f, "Authorization timestamp error"),
            Self::VersionError => write!(f, "Authorization version error"),
        }
    }
}

impl std::error::Error for AuthorizationError {}

/// A timestamp was rejected by the configured [`crate::timestamp::TimeChecker`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampError(pub String);

impl fmt::Display for TimestampError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for TimestampError {}

/// The closed verdict taxonomy surfaced by [`crate::verifier::Verifier::verify`].
///
/// `Display` renders a stable, minimal message with no internal diagnostics.
/// The underlying cause (when any) is reachable only through
/// [`std::error::Error::source`], for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    InvalidAuthorization(AuthorizationError),
    UnsupportedVersion,
    UnknownKey,
    MissingContentType,
    UnsupportedContentType(String),
    InvalidRequestBody(String),
    Timestamp(TimestampError),
    SignatureMismatch { want: String, got: String },
}

impl fmt::Display for VerifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidAuthorization(_) => write!(f, "invalid Authorization"),
            Self::UnsupportedVersion => write!(f, "unsupported signature version"),
            Self::UnknownKey => write!(f, "unknown key"),
            Self::MissingContentType => write!(f, "missing Content-Type"),
            Self::UnsupportedContentType(_) => write!(f, "unsupported Content-Type"),
            Self::InvalidRequestBody(_) => write!(f, "invalid request body"),
            Self::Timestamp(_) => write!(f, "timestamp error"),
            Self::SignatureMismatch { want, got } => {
                write!(f, "signature mismatch, want {want}, got {got}")
            }
        }
    }
}

impl std::error::Error for VerifyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidAuthorization(e) => Some(e),
            Self::Timestamp(e) => Some(e),
            _ => None,
        }
    }
}

impl From<AuthorizationError> for VerifyError {
    fn from(e: AuthorizationError) -> Self {
        Self::InvalidAuthorization(e)
    }
}

impl From<CanonicalError> for VerifyError {
    fn from(e: CanonicalError) -> Self {
        match e {
            CanonicalError::MissingContentType => Self::MissingContentType,
            CanonicalError::UnsupportedContentType(ct) => Self::UnsupportedContentType(ct),
            CanonicalError::InvalidRequestBody(detail) => Self::InvalidRequestBody(detail),
        }
    }
}

impl From<TimestampError> for VerifyError {
    fn from(e: TimestampError) -> Self {
        Self::Timestamp(e)
    }
}
