use axum::{extract::State, http::StatusCode};

use crate::error::RecipeboxError;
use crate::infra::db::ping;
use crate::state::AppState;

/// Handler for `GET /healthz`: the process is up.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Handler for `GET /readyz`: 200 once the database answers.
pub async fn readyz(State(state): State<AppState>) -> Result<StatusCode, RecipeboxError> {
    ping(&state.db).await?;
    Ok(StatusCode::OK)
}
