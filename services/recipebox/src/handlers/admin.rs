//! Staff-only account management.

use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use recipebox_core::error::FieldErrors;

use crate::auth::CurrentUser;
use crate::domain::types::User;
use crate::error::RecipeboxError;
use crate::extract::{IdPath, JsonBody, required};
use crate::state::AppState;
use crate::usecase::user::{
    AdminCreateUserInput, AdminCreateUserUseCase, GetUserUseCase, ListUsersUseCase,
};

#[derive(Serialize)]
pub struct AdminUserResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for AdminUserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            is_active: user.is_active,
            is_staff: user.is_staff,
            is_superuser: user.is_superuser,
            created_at: user.created_at,
        }
    }
}

// ── GET /admin/users ─────────────────────────────────────────────────────────

pub async fn list_users(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<AdminUserResponse>>, RecipeboxError> {
    let usecase = ListUsersUseCase {
        repo: state.user_repo(),
    };
    let users = usecase.execute(&actor).await?;
    Ok(Json(users.into_iter().map(Into::into).collect()))
}

// ── GET /admin/users/{id} ────────────────────────────────────────────────────

pub async fn get_user(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
    IdPath(id): IdPath<Uuid>,
) -> Result<Json<AdminUserResponse>, RecipeboxError> {
    let usecase = GetUserUseCase {
        repo: state.user_repo(),
    };
    let user = usecase.execute(&actor, id).await?;
    Ok(Json(user.into()))
}

// ── POST /admin/users ────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct AdminCreateUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default)]
    pub is_superuser: bool,
}

pub async fn create_user_as_admin(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
    JsonBody(body): JsonBody<AdminCreateUserRequest>,
) -> Result<(StatusCode, Json<AdminUserResponse>), RecipeboxError> {
    let mut errors = FieldErrors::new();
    let email = required(&mut errors, "email", body.email);
    let password = required(&mut errors, "password", body.password);
    errors.into_result()?;

    let usecase = AdminCreateUserUseCase {
        repo: state.user_repo(),
        hasher: state.hasher,
    };
    let user = usecase
        .execute(
            &actor,
            AdminCreateUserInput {
                email,
                password,
                name: body.name,
                is_staff: body.is_staff,
                is_superuser: body.is_superuser,
            },
        )
        .await?;
    tracing::info!(user_id = %user.id, created_by = %actor.id, "user created by staff");
    Ok((StatusCode::CREATED, Json(user.into())))
}
