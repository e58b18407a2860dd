//! An axum extractor that verifies a request's signature before a handler
//! ever sees it, plus the rejection type it produces on failure.

use std::fmt;

use axum::extract::{FromRef, FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::error::VerifyError;
use crate::request::{drain_request, RequestView};
use crate::verifier::Verifier;

/// Extracting `Verified` runs signature verification; a handler that takes
/// it as an argument cannot be reached by a request that failed it.
pub struct Verified(pub RequestView);

/// Why a request was rejected before reaching the handler: verification
/// failed, or the body could not be drained at all.
#[derive(Debug)]
pub enum SigAuthRejection {
    Unauthorized(VerifyError),
    BodyRead(String),
}

impl fmt::Display for SigAuthRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthorized(e) => write!(f, "{e}"),
            Self::BodyRead(detail) => write!(f, "error reading request body: {detail}"),
        }
    }
}

impl IntoResponse for SigAuthRejection {
    fn into_response(self) -> Response {
        let message = self.to_string();

        #[cfg(feature = "envelope")]
        {
            let envelope = match &self {
                Self::Unauthorized(e) => crate::envelope::ErrorEnvelope::from(e),
                Self::BodyRead(_) => crate::envelope::ErrorEnvelope {
                    code: 400,
                    message: message.clone(),
                    data: None,
                },
            };
            let body = envelope.to_json().unwrap_or_else(|_| message.clone());
            return (StatusCode::BAD_REQUEST, [(axum::http::header::CONTENT_TYPE, "application/json")], body).into_response();
        }

        #[cfg(not(feature = "envelope"))]
        {
            (StatusCode::BAD_REQUEST, message).into_response()
        }
    }
}

impl<S> FromRequest<S> for Verified
where
    std::sync::Arc<Verifier>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = SigAuthRejection;

    async fn from_request(mut req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let verifier = std::sync::Arc::<Verifier>::from_ref(state);
        let view = drain_request(&mut req).await.map_err(|e| SigAuthRejection::BodyRead(e.to_string()))?;
        verifier.verify(&view).map_err(SigAuthRejection::Unauthorized)?;
        Ok(Verified(view))
    }
}
