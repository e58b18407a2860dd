//! Keyed SHA-256 digest primitive.
//!
//! Standard HMAC-SHA256, lowercase hex output. No salt, no alternate
//! encoding.

use hmac::{Hmac, Mac};
use sha2::Sha256;

/// Computes HMAC-SHA256 over `message` keyed by `key` and returns 64
/// lowercase hex characters.
///
/// Never panics: `Hmac::<Sha256>::new_from_slice` accepts any key length.
#[must_use]
pub fn hmac_sha256_hex(key: &[u8], message: &[u8]) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(message);
    hex::encode(mac.finalize().into_bytes())
}
