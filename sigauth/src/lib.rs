//! HMAC-based HTTP request authentication.
//!
//! A client canonicalizes a request into a deterministic byte string, signs
//! it with a shared secret via HMAC-SHA256, and attaches the result as an
//! `Authorization` header (or a `~auth` query parameter, for transports that
//! can't set headers). A server holding the same secret recomputes the
//! signature and compares.
//!
//! The core is transport-agnostic: [`request::RequestView`] is the only
//! thing [`canonical`], [`signer`], and [`verifier`] touch. Integration
//! with a particular HTTP stack ([`axum`], [`tower`]) is additive and
//! feature-gated.
//!
//! ```
//! use sigauth::request::RequestView;
//! use sigauth::signer::{append_sign, sign};
//!
//! let mut req = RequestView::new("GET", "/widgets?id=7");
//! append_sign(&mut req, "myKey", b"mySecret", "SIG-AUTH", 1_700_000_000).unwrap();
//! assert!(req.headers.get(http::header::AUTHORIZATION).is_some());
//! ```

pub mod authorization;
pub mod canonical;
pub mod error;
pub mod hmac_util;
pub mod request;
pub mod signer;
pub mod timestamp;
pub mod verifier;

#[cfg(feature = "envelope")]
pub mod envelope;

#[cfg(feature = "tower")]
pub mod tower;

#[cfg(feature = "axum")]
pub mod axum;

pub use authorization::Authorization;
pub use error::VerifyError;
pub use request::RequestView;
pub use verifier::{SecretFinder, Verifier, VerifierBuilder};
