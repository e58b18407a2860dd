//! Optional `{Code, Message, Data}` response envelope for embedders that
//! want a ready-made JSON shape instead of wiring `VerifyError` themselves.
//!
//! This is scaffolding, not routing: it has no opinion on what HTTP
//! framework carries it, and nothing else in this crate depends on it.

use serde::Serialize;

use crate::error::VerifyError;

/// `{"Code": 400, "Message": "<verdict>", "Data": null}`.
///
/// Every verifier rejection maps to HTTP 400 here: the verdict taxonomy has
/// no notion of server-side failure, only malformed or untrusted requests.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorEnvelope {
    #[serde(rename = "Code")]
    pub code: u16,
    #[serde(rename = "Message")]
    pub message: String,
    #[serde(rename = "Data")]
    pub data: Option<()>,
}

impl From<&VerifyError> for ErrorEnvelope {
    fn from(err: &VerifyError) -> Self {
        Self {
            code: 400,
            message: err.to_string(),
            data: None,
        }
    }
}

impl ErrorEnvelope {
    /// Serializes the envelope to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
