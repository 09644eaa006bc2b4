use crate::auth::models::Principal;
use crate::constants::DOWNLOAD_PREFIX;
use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{
    extract::{Query, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use galleria_core::AppError;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct AccessTokenQuery {
    access_token: Option<String>,
}

fn bearer_token(headers: &HeaderMap) -> Result<Option<String>, AppError> {
    let Some(header) = headers.get("Authorization") else {
        return Ok(None);
    };

    let value = header
        .to_str()
        .map_err(|_| AppError::Unauthorized("Invalid authorization header".to_string()))?;

    match value.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(Some(token.trim().to_string())),
        _ => Err(AppError::Unauthorized(
            "Invalid authorization header format. Expected: Bearer <token>".to_string(),
        )),
    }
}

/// Media elements cannot attach headers, so downloads also take the token from the query.
fn query_token(request: &Request) -> Option<String> {
    if !request.uri().path().starts_with(DOWNLOAD_PREFIX) {
        return None;
    }

    Query::<AccessTokenQuery>::try_from_uri(request.uri())
        .ok()
        .and_then(|Query(q)| q.access_token)
        .filter(|t| !t.is_empty())
}

fn request_token(request: &Request) -> Result<String, AppError> {
    if let Some(token) = bearer_token(request.headers())? {
        return Ok(token);
    }

    query_token(request)
        .ok_or_else(|| AppError::Unauthorized("Missing authorization header".to_string()))
}

/// Resolve the caller and attach the [`Principal`] to the request.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = match request_token(&request) {
        Ok(token) => token,
        Err(err) => return HttpAppError(err).into_response(),
    };

    let principal = match state.auth.verify_token(&token).await {
        Ok(principal) => principal,
        Err(err) => {
            tracing::debug!(error = %err, "Authentication failed");
            return HttpAppError(err).into_response();
        }
    };

    tracing::debug!(user_id = %principal.user_id, "Authenticated request");
    request.extensions_mut().insert::<Principal>(principal);
    next.run(request).await
}
