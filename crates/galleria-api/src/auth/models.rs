use crate::error::ErrorResponse;
use axum::extract::FromRequestParts;
use axum::http::{request::Parts, StatusCode};
use axum::Json;
use serde::{Deserialize, Serialize};

/// The authenticated caller, resolved once per request by the auth middleware
/// and passed explicitly into every protected handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    #[serde(rename = "id")]
    pub user_id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// `GET /api/v0/auth/registration` body
#[derive(Debug, Serialize, Deserialize)]
pub struct RegistrationStatus {
    pub registered: bool,
}

// Read from extensions directly so the extractor also works next to Multipart
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Principal>().cloned().ok_or_else(|| {
            (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse::new(
                    "Missing authenticated user",
                    "UNAUTHORIZED",
                )),
            )
        })
    }
}
