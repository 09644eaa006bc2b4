use crate::auth::Principal;
use crate::error::HttpAppError;
use crate::services::AccountingService;
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;

/// Remote bytes plus, when the role may read it, the database size.
#[tracing::instrument(skip(state, principal), fields(user_id = %principal.user_id))]
pub async fn storage_summary(
    State(state): State<Arc<AppState>>,
    principal: Principal,
) -> Result<impl IntoResponse, HttpAppError> {
    let summary = AccountingService::summary(state.metrics.as_ref()).await?;
    Ok(Json(summary))
}
