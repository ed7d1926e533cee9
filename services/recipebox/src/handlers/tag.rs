use axum::{
    Json,
    extract::{RawQuery, State},
    http::StatusCode,
};

use crate::auth::CurrentUser;
use crate::error::RecipeboxError;
use crate::extract::{IdPath, JsonBody};
use crate::handlers::attr::{self, AttrRequest, AttrResponse};
use crate::state::AppState;

// ── GET /recipe/tags ─────────────────────────────────────────────────────────

pub async fn list_tags(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<Vec<AttrResponse>>, RecipeboxError> {
    attr::list(state.tag_repo(), user.id, raw_query.as_deref()).await
}

// ── POST /recipe/tags ────────────────────────────────────────────────────────

pub async fn create_tag(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    JsonBody(body): JsonBody<AttrRequest>,
) -> Result<(StatusCode, Json<AttrResponse>), RecipeboxError> {
    attr::create(state.tag_repo(), user.id, body).await
}

// ── GET /recipe/tags/{id} ────────────────────────────────────────────────────

pub async fn get_tag(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    IdPath(id): IdPath<i32>,
) -> Result<Json<AttrResponse>, RecipeboxError> {
    attr::get(state.tag_repo(), user.id, id).await
}

// ── PUT /recipe/tags/{id} ────────────────────────────────────────────────────

pub async fn replace_tag(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    IdPath(id): IdPath<i32>,
    JsonBody(body): JsonBody<AttrRequest>,
) -> Result<Json<AttrResponse>, RecipeboxError> {
    attr::update(state.tag_repo(), user.id, id, body, false).await
}

// ── PATCH /recipe/tags/{id} ──────────────────────────────────────────────────

pub async fn patch_tag(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    IdPath(id): IdPath<i32>,
    JsonBody(body): JsonBody<AttrRequest>,
) -> Result<Json<AttrResponse>, RecipeboxError> {
    attr::update(state.tag_repo(), user.id, id, body, true).await
}

// ── DELETE /recipe/tags/{id} ─────────────────────────────────────────────────

pub async fn delete_tag(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    IdPath(id): IdPath<i32>,
) -> Result<StatusCode, RecipeboxError> {
    attr::delete(state.tag_repo(), user.id, id).await
}
