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

// ── GET /recipe/ingredients ──────────────────────────────────────────────────

pub async fn list_ingredients(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<Vec<AttrResponse>>, RecipeboxError> {
    attr::list(state.ingredient_repo(), user.id, raw_query.as_deref()).await
}

// ── POST /recipe/ingredients ─────────────────────────────────────────────────

pub async fn create_ingredient(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    JsonBody(body): JsonBody<AttrRequest>,
) -> Result<(StatusCode, Json<AttrResponse>), RecipeboxError> {
    attr::create(state.ingredient_repo(), user.id, body).await
}

// ── GET /recipe/ingredients/{id} ─────────────────────────────────────────────

pub async fn get_ingredient(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    IdPath(id): IdPath<i32>,
) -> Result<Json<AttrResponse>, RecipeboxError> {
    attr::get(state.ingredient_repo(), user.id, id).await
}

// ── PUT /recipe/ingredients/{id} ─────────────────────────────────────────────

pub async fn replace_ingredient(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    IdPath(id): IdPath<i32>,
    JsonBody(body): JsonBody<AttrRequest>,
) -> Result<Json<AttrResponse>, RecipeboxError> {
    attr::update(state.ingredient_repo(), user.id, id, body, false).await
}

// ── PATCH /recipe/ingredients/{id} ───────────────────────────────────────────

pub async fn patch_ingredient(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    IdPath(id): IdPath<i32>,
    JsonBody(body): JsonBody<AttrRequest>,
) -> Result<Json<AttrResponse>, RecipeboxError> {
    attr::update(state.ingredient_repo(), user.id, id, body, true).await
}

// ── DELETE /recipe/ingredients/{id} ──────────────────────────────────────────

pub async fn delete_ingredient(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    IdPath(id): IdPath<i32>,
) -> Result<StatusCode, RecipeboxError> {
    attr::delete(state.ingredient_repo(), user.id, id).await
}
