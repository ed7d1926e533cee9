use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use recipebox_core::error::FieldErrors;

use crate::error::RecipeboxError;
use crate::extract::{JsonBody, required};
use crate::state::AppState;
use crate::usecase::token::{IssueTokenInput, IssueTokenUseCase};

// ── POST /users/token ────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateTokenRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub token: String,
}

pub async fn create_token(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreateTokenRequest>,
) -> Result<Json<TokenResponse>, RecipeboxError> {
    let mut errors = FieldErrors::new();
    let email = required(&mut errors, "email", body.email);
    let password = required(&mut errors, "password", body.password);
    errors.into_result()?;

    let usecase = IssueTokenUseCase {
        users: state.user_repo(),
        tokens: state.token_repo(),
        hasher: state.hasher,
    };
    let token = usecase.execute(IssueTokenInput { email, password }).await?;
    Ok(Json(TokenResponse { token: token.key }))
}
