//! Client-side signing: canonicalize, HMAC, attach `Authorization`.

use http::header::AUTHORIZATION;

use crate::authorization::Authorization;
use crate::canonical::build_data_to_sign;
use crate::error::CanonicalError;
use crate::hmac_util::hmac_sha256_hex;
use crate::request::RequestView;

/// Canonicalizes `req` at `timestamp` and computes its HMAC-SHA256 under
/// `secret`, returning the lowercase hex signature. Does not touch
/// `req`'s headers — the verifier calls this directly as its hashing step.
pub fn sign(req: &RequestView, secret: &[u8], timestamp: i64) -> Result<String, CanonicalError> {
    let data = build_data_to_sign(req, timestamp)?;
    Ok(hmac_sha256_hex(secret, &data))
}

/// Signs `req` and attaches the resulting `Authorization` header in place.
///
/// Leaves `req` untouched on failure — a caller that gets an `Err` has a
/// request with no `Authorization` header set.
pub fn append_sign(
    req: &mut RequestView,
    key: &str,
    secret: &[u8],
    scheme: &str,
    timestamp: i64,
) -> Result<(), CanonicalError> {
    let computed = sign(req, secret, timestamp)?;
    let auth = Authorization::new(key, computed, timestamp).with_scheme(scheme);
    let value = http::HeaderValue::from_str(&auth.to_header_value())
        .expect("scheme, key, sign, and decimal timestamp are all valid header-value bytes");
    req.headers.insert(AUTHORIZATION, value);
    Ok(())
}
