//! The `Authorization` header codec: structured credential, parser, and
//! emitter, plus the `~auth` query-parameter fallback channel.

use http::header::AUTHORIZATION;

use crate::error::AuthorizationError;
use crate::request::RequestView;

/// Reserved query parameter carrying a URL-encoded Authorization line, used
/// only when no `Authorization` header is present. Stripped before
/// canonicalization and otherwise invisible to the signature.
pub const META_AUTH_PARAM: &str = "~auth";

const DEFAULT_SCHEME: &str = "SIG-AUTH";

/// The structured credential a client presents and a server parses back out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authorization {
    pub scheme: String,
    pub key: String,
    pub sign: String,
    pub timestamp: i64,
    pub version: i32,
}

impl Authorization {
    /// Builds a version-1 credential under the default scheme.
    #[must_use]
    pub fn new(key: impl Into<String>, sign: impl Into<String>, timestamp: i64) -> Self {
        Self {
            scheme: DEFAULT_SCHEME.to_string(),
            key: key.into(),
            sign: sign.into(),
            timestamp,
            version: 1,
        }
    }

    #[must_use]
    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    /// Renders `"<scheme> Key=<k>, Sign=<s>, Timestamp=<t>[, Version=<v>]"`.
    /// `Version` is emitted only when non-zero; a parser that sees it absent
    /// defaults to 1, so version 1 is conventionally left unwritten.
    #[must_use]
    pub fn to_header_value(&self) -> String {
        let mut out = format!("{} Key={}, Sign={}, Timestamp={}", self.scheme, self.key, self.sign, self.timestamp);
        if self.version != 0 {
            out.push_str(&format!(", Version={}", self.version));
        }
        out
    }
}

/// Decodes a single `application/x-www-form-urlencoded`-style value (`%XX`
/// escapes and `+` as space) using the same decoder the crate already
/// depends on for form bodies, by parsing it as the value half of one pair.
fn url_decode(raw: &str) -> String {
    let wrapped = format!("v={raw}");
    form_urlencoded::parse(wrapped.as_bytes())
        .next()
        .map(|(_, v)| v.into_owned())
        .unwrap_or_default()
}

/// Parses the parameter-list half of an auth line (everything after the
/// scheme and the separating space) into an [`Authorization`].
fn parse_params(scheme: &str, params: &str) -> Result<Authorization, AuthorizationError> {
    let mut key = String::new();
    let mut sign = String::new();
    let mut timestamp: i64 = 0;
    let mut version: i32 = 1;

    for item in params.split(", ") {
        if item.is_empty() {
            continue;
        }
        let Some((name, value)) = item.split_once('=') else {
            continue;
        };
        match name {
            "Key" => key = value.to_string(),
            "Sign" => sign = value.to_string(),
            "Timestamp" => {
                timestamp = value.parse().map_err(|_| AuthorizationError::TimestampError)?;
            }
            "Version" => {
                version = value.parse().map_err(|_| AuthorizationError::VersionError)?;
            }
            _ => {}
        }
    }

    Ok(Authorization {
        scheme: scheme.to_string(),
        key,
        sign,
        timestamp,
        version,
    })
}

/// Splits `"<scheme> <params>"` on the first whitespace and validates the
/// scheme against `expected_scheme`.
fn parse_auth_line(line: &str, expected_scheme: &str) -> Result<Authorization, AuthorizationError> {
    let (scheme, rest) = line.split_once(' ').ok_or(AuthorizationError::SchemeError)?;
    if scheme != expected_scheme {
        return Err(AuthorizationError::SchemeMatchError {
            expected: expected_scheme.to_string(),
            found: scheme.to_string(),
        });
    }
    parse_params(scheme, rest)
}

/// Parses the Authorization credential out of `req`.
///
/// Consults the `Authorization` header first (exactly one occurrence is
/// required when present); falls back to the URL-decoded `~auth` query
/// parameter when no header is present at all.
pub fn parse_authorization(req: &RequestView, expected_scheme: &str) -> Result<Authorization, AuthorizationError> {
    let mut headers = req.headers.get_all(AUTHORIZATION).iter();
    if let Some(first) = headers.next() {
        if headers.next().is_some() {
            return Err(AuthorizationError::TooManyHeaders);
        }
        let line = first.to_str().map_err(|_| AuthorizationError::SchemeError)?;
        return parse_auth_line(line, expected_scheme);
    }

    let Some(raw) = req.query.first(META_AUTH_PARAM) else {
        return Err(AuthorizationError::Missing);
    };
    let decoded = url_decode(raw);
    parse_auth_line(&decoded, expected_scheme)
}
