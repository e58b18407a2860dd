//! Canonical-form builder: turns a [`RequestView`] + timestamp into the
//! exact byte string that gets HMAC'd.
//!
//! Builds the newline-joined components onto a growing byte buffer and
//! splits `Content-Type` into media type and optional charset without
//! pulling in a MIME-parsing dependency.

use crate::authorization::META_AUTH_PARAM;
use crate::error::CanonicalError;
use crate::request::{QueryParams, RequestView};

const CONTENT_TYPE_FORM: &str = "application/x-www-form-urlencoded";
const CONTENT_TYPE_JSON: &str = "application/json";

/// Splits a `Content-Type` header value into its media type and optional
/// charset parameter. Only the media type ever affects the canonical form;
/// the charset is returned for embedders that want it (e.g. to choose a
/// decoder) but never changes the signature.
#[must_use]
pub fn get_content_type_and_charset(content_type: &str) -> (&str, Option<&str>) {
    let mut parts = content_type.split(';');
    let media_type = parts.next().unwrap_or("").trim();
    let charset = parts.find_map(|param| {
        let (name, value) = param.split_once('=')?;
        (name.trim().eq_ignore_ascii_case("charset")).then(|| value.trim())
    });
    (media_type, charset)
}

/// Decodes a `%XX`-escaped, `+`-as-space string. Returns an error on a
/// truncated or non-hex escape sequence — the one way form-body
/// canonicalization can fail.
fn percent_decode(s: &str) -> Result<String, String> {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' => {
                let hex = bytes.get(i + 1..i + 3).ok_or_else(|| format!("truncated percent-escape at byte {i}"))?;
                let hex_str = std::str::from_utf8(hex).map_err(|_| format!("invalid percent-escape at byte {i}"))?;
                let value = u8::from_str_radix(hex_str, 16).map_err(|_| format!("invalid percent-escape at byte {i}"))?;
                out.push(value);
                i += 3;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8(out).map_err(|_| "percent-decoded body is not valid UTF-8".to_string())
}

/// Sorts `params` by key (byte-wise ASCII, stable so duplicate keys keep
/// their insertion order) and concatenates the values with no separator.
///
/// A parameter whose value is the empty string — whether because it had no
/// `=` at all or an `=` with nothing after it — contributes its *key*
/// instead of an empty string.
fn canonical_concat<'a>(params: impl Iterator<Item = (&'a str, &'a str)>) -> String {
    let mut pairs: Vec<(&str, String)> = params
        .filter(|(k, _)| *k != META_AUTH_PARAM)
        .map(|(k, v)| (k, if v.is_empty() { k.to_string() } else { v.to_string() }))
        .collect();
    pairs.sort_by(|a, b| a.0.cmp(b.0));
    pairs.into_iter().map(|(_, v)| v).collect()
}

fn canonical_query_line(query: &QueryParams) -> String {
    canonical_concat(query.iter())
}

/// Parses a form body the same way a query string is parsed, then applies
/// the query canonicalization rule to it. Percent-decodes keys and values;
/// a malformed escape is the one genuine parse failure for this body mode.
fn canonical_form_line(body: &str) -> Result<String, CanonicalError> {
    let raw = QueryParams::parse(body);
    let mut decoded = QueryParams::new();
    for (k, v) in raw.iter() {
        let key = percent_decode(k).map_err(CanonicalError::InvalidRequestBody)?;
        let value = percent_decode(v).map_err(CanonicalError::InvalidRequestBody)?;
        decoded.push(key, value);
    }
    Ok(canonical_concat(decoded.iter()))
}

fn canonical_path(path: &str) -> &str {
    if path.is_empty() || path == "/" {
        "/"
    } else {
        path
    }
}

/// Builds the exact byte string to be signed for `req` at `timestamp`.
///
/// An empty query segment on a GET still produces a blank line before
/// `END`, and this function never inspects `Sign` — it only ever builds
/// bytes to be hashed.
pub fn build_data_to_sign(req: &RequestView, timestamp: i64) -> Result<Vec<u8>, CanonicalError> {
    let method = req.method.to_uppercase();
    let path = canonical_path(&req.path);
    let query_line = canonical_query_line(&req.query);

    let mut out = Vec::with_capacity(64 + req.body.len());
    out.extend_from_slice(timestamp.to_string().as_bytes());
    out.push(b'\n');
    out.extend_from_slice(method.as_bytes());
    out.push(b'\n');
    out.extend_from_slice(path.as_bytes());
    out.push(b'\n');
    out.extend_from_slice(query_line.as_bytes());

    match req.content_type() {
        None => {
            if !req.body.is_empty() {
                return Err(CanonicalError::MissingContentType);
            }
        }
        Some(content_type) => {
            let (media_type, _charset) = get_content_type_and_charset(content_type);
            match media_type {
                CONTENT_TYPE_FORM => {
                    if req.body.is_empty() {
                        return Err(CanonicalError::InvalidRequestBody("missing body".to_string()));
                    }
                    let body_str = std::str::from_utf8(&req.body)
                        .map_err(|_| CanonicalError::InvalidRequestBody("form body is not valid UTF-8".to_string()))?;
                    let form_line = canonical_form_line(body_str)?;
                    out.push(b'\n');
                    out.extend_from_slice(form_line.as_bytes());
                }
                CONTENT_TYPE_JSON => {
                    if req.body.is_empty() {
                        return Err(CanonicalError::InvalidRequestBody("missing body".to_string()));
                    }
                    out.push(b'\n');
                    out.extend_from_slice(&req.body);
                }
                other => return Err(CanonicalError::UnsupportedContentType(other.to_string())),
            }
        }
    }

    out.extend_from_slice(b"\nEND");
    Ok(out)
}
