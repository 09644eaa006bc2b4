use crate::auth::models::RegistrationStatus;
use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;

/// Public: whether the single owner account already exists.
#[tracing::instrument(skip(state))]
pub async fn registration_status(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let registered = state.auth.is_registered().await?;
    Ok(Json(RegistrationStatus { registered }))
}
