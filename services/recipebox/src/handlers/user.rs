use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use recipebox_core::error::FieldErrors;

use crate::auth::CurrentUser;
use crate::domain::types::User;
use crate::error::RecipeboxError;
use crate::extract::{JsonBody, required};
use crate::state::AppState;
use crate::usecase::user::{CreateUserInput, CreateUserUseCase, UpdateMeInput, UpdateMeUseCase};

#[derive(Serialize)]
pub struct UserResponse {
    pub email: String,
    pub name: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            email: user.email,
            name: user.name,
        }
    }
}

// ── POST /users/create ───────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

pub async fn create_user(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), RecipeboxError> {
    let mut errors = FieldErrors::new();
    let email = required(&mut errors, "email", body.email);
    let password = required(&mut errors, "password", body.password);
    let name = required(&mut errors, "name", body.name);
    errors.into_result()?;

    let usecase = CreateUserUseCase {
        repo: state.user_repo(),
        hasher: state.hasher,
    };
    let user = usecase
        .execute(CreateUserInput {
            email,
            password,
            name,
        })
        .await?;
    tracing::info!(user_id = %user.id, "user created");
    Ok((StatusCode::CREATED, Json(user.into())))
}

// ── GET /users/me ────────────────────────────────────────────────────────────

pub async fn get_me(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(user.into())
}

// ── PATCH /users/me ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateMeRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

pub async fn update_me(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    JsonBody(body): JsonBody<UpdateMeRequest>,
) -> Result<Json<UserResponse>, RecipeboxError> {
    let usecase = UpdateMeUseCase {
        repo: state.user_repo(),
        hasher: state.hasher,
    };
    let user = usecase
        .execute(
            user,
            UpdateMeInput {
                email: body.email,
                password: body.password,
                name: body.name,
            },
        )
        .await?;
    Ok(Json(user.into()))
}
