//! Request/response types and handler bodies shared by tags and ingredients.

use axum::{Json, http::StatusCode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use recipebox_domain::filter::parse_flag;

use crate::domain::repository::AttrRepository;
use crate::domain::types::Attr;
use crate::error::RecipeboxError;
use crate::extract::parse_query;
use crate::usecase::attr::{
    CreateAttrUseCase, DeleteAttrUseCase, GetAttrUseCase, ListAttrsUseCase, UpdateAttrUseCase,
};

#[derive(Debug, Serialize)]
pub struct AttrResponse {
    pub id: i32,
    pub name: String,
}

impl From<Attr> for AttrResponse {
    fn from(attr: Attr) -> Self {
        Self {
            id: attr.id,
            name: attr.name,
        }
    }
}

#[derive(Deserialize, Default)]
pub struct AttrListQuery {
    pub assigned_only: Option<String>,
}

#[derive(Deserialize)]
pub struct AttrRequest {
    pub name: Option<String>,
}

pub async fn list<R: AttrRepository>(
    repo: R,
    user_id: Uuid,
    raw_query: Option<&str>,
) -> Result<Json<Vec<AttrResponse>>, RecipeboxError> {
    let query: AttrListQuery = parse_query(raw_query)?;
    let assigned_only = match query.assigned_only.as_deref() {
        Some(raw) => parse_flag(raw)
            .map_err(|e| RecipeboxError::MalformedRequest(format!("assigned_only: {e}")))?,
        None => false,
    };
    let items = ListAttrsUseCase { repo }
        .execute(user_id, assigned_only)
        .await?;
    Ok(Json(items.into_iter().map(Into::into).collect()))
}

pub async fn create<R: AttrRepository>(
    repo: R,
    user_id: Uuid,
    body: AttrRequest,
) -> Result<(StatusCode, Json<AttrResponse>), RecipeboxError> {
    let name = body
        .name
        .ok_or_else(|| RecipeboxError::field("name", "this field is required"))?;
    let attr = CreateAttrUseCase { repo }.execute(user_id, &name).await?;
    Ok((StatusCode::CREATED, Json(attr.into())))
}

pub async fn get<R: AttrRepository>(
    repo: R,
    user_id: Uuid,
    id: i32,
) -> Result<Json<AttrResponse>, RecipeboxError> {
    let attr = GetAttrUseCase { repo }.execute(user_id, id).await?;
    Ok(Json(attr.into()))
}

pub async fn update<R: AttrRepository>(
    repo: R,
    user_id: Uuid,
    id: i32,
    body: AttrRequest,
    partial: bool,
) -> Result<Json<AttrResponse>, RecipeboxError> {
    let attr = UpdateAttrUseCase { repo }
        .execute(user_id, id, body.name.as_deref(), partial)
        .await?;
    Ok(Json(attr.into()))
}

pub async fn delete<R: AttrRepository>(
    repo: R,
    user_id: Uuid,
    id: i32,
) -> Result<StatusCode, RecipeboxError> {
    DeleteAttrUseCase { repo }.execute(user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
