//! The verification pipeline: parse Authorization, resolve the secret,
//! recompute the signature, and check the timestamp, in that order.

use std::sync::Arc;

use subtle::ConstantTimeEq;

use crate::authorization::parse_authorization;
use crate::error::VerifyError;
use crate::request::RequestView;
use crate::signer::sign;
use crate::timestamp::{BoundedSkewTimeChecker, TimeChecker};

const DEFAULT_SCHEME: &str = "SIG-AUTH";

/// Resolves an access key to its shared secret. A `None` return means the
/// key is unknown. Implementations are called concurrently from multiple
/// in-flight verifications and must not block on exclusive state.
pub trait SecretFinder: Send + Sync {
    fn find(&self, key: &str) -> Option<Vec<u8>>;
}

impl<F> SecretFinder for F
where
    F: Fn(&str) -> Option<Vec<u8>> + Send + Sync,
{
    fn find(&self, key: &str) -> Option<Vec<u8>> {
        self(key)
    }
}

/// A verifier configured for one scheme, secret store, and timestamp
/// policy. Immutable and safe to share across threads (holds only `Arc`s
/// and a scheme string) — construct once per configuration with
/// [`VerifierBuilder`].
#[derive(derive_builder::Builder)]
#[builder(pattern = "owned")]
pub struct Verifier {
    #[builder(default = "DEFAULT_SCHEME.to_string()")]
    scheme: String,
    secret_finder: Arc<dyn SecretFinder>,
    #[builder(default = "Arc::new(BoundedSkewTimeChecker::default())")]
    time_checker: Arc<dyn TimeChecker>,
}

impl Verifier {
    #[must_use]
    pub fn builder() -> VerifierBuilder {
        VerifierBuilder::default()
    }

    /// Runs the full pipeline against an already-drained request view.
    ///
    /// Parse → version check → key lookup → canonicalize+hash →
    /// timestamp check → constant-time compare. Secret lookup happens
    /// before hashing so the cost of hashing is paid only for known keys;
    /// the timestamp check happens after hashing but before the final
    /// compare, so a stale-but-correctly-signed request reports a
    /// timestamp error rather than a signature mismatch.
    pub fn verify(&self, req: &RequestView) -> Result<(), VerifyError> {
        let auth = parse_authorization(req, &self.scheme)?;

        if auth.version != 1 {
            log::debug!("rejecting key {}: unsupported version {}", auth.key, auth.version);
            return Err(VerifyError::UnsupportedVersion);
        }

        let secret = match self.secret_finder.find(&auth.key) {
            Some(s) => s,
            None => {
                log::debug!("rejecting unknown key {}", auth.key);
                return Err(VerifyError::UnknownKey);
            }
        };

        let computed = sign(req, &secret, auth.timestamp)?;

        self.time_checker.check(auth.timestamp)?;

        if computed.as_bytes().ct_eq(auth.sign.as_bytes()).into() {
            Ok(())
        } else {
            log::warn!("signature mismatch for key {}", auth.key);
            Err(VerifyError::SignatureMismatch {
                want: computed,
                got: auth.sign,
            })
        }
    }
}
