use std::str::FromStr;

use axum::{
    Json,
    extract::{Multipart, RawQuery, State, multipart::MultipartRejection},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use recipebox_core::error::FieldErrors;
use recipebox_domain::filter::parse_id_list;

use crate::auth::CurrentUser;
use crate::domain::types::{Recipe, RecipeFilter};
use crate::error::RecipeboxError;
use crate::extract::{IdPath, JsonBody, nullable, parse_query};
use crate::handlers::attr::AttrResponse;
use crate::state::AppState;
use crate::usecase::image::UploadRecipeImageUseCase;
use crate::usecase::recipe::{
    CreateRecipeUseCase, DeleteRecipeUseCase, GetRecipeUseCase, ListRecipesUseCase,
    RecipeInput, UpdateRecipeUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

fn price_string(price: Decimal) -> String {
    let mut price = price;
    price.rescale(2);
    price.to_string()
}

/// List/create/update shape: relations as id lists.
#[derive(Debug, Serialize)]
pub struct RecipeResponse {
    pub id: i32,
    pub title: String,
    pub ingredients: Vec<i32>,
    pub tags: Vec<i32>,
    pub time_minutes: i32,
    pub price: String,
    pub link: Option<String>,
}

impl From<Recipe> for RecipeResponse {
    fn from(recipe: Recipe) -> Self {
        Self {
            id: recipe.id,
            ingredients: recipe.ingredient_ids(),
            tags: recipe.tag_ids(),
            title: recipe.title,
            time_minutes: recipe.time_minutes,
            price: price_string(recipe.price),
            link: recipe.link,
        }
    }
}

/// Detail shape: nested relations plus the image URL.
#[derive(Debug, Serialize)]
pub struct RecipeDetailResponse {
    pub id: i32,
    pub title: String,
    pub ingredients: Vec<AttrResponse>,
    pub tags: Vec<AttrResponse>,
    pub time_minutes: i32,
    pub price: String,
    pub link: Option<String>,
    pub image: Option<String>,
}

impl RecipeDetailResponse {
    fn new(recipe: Recipe, state: &AppState) -> Self {
        Self {
            id: recipe.id,
            title: recipe.title,
            ingredients: recipe.ingredients.into_iter().map(Into::into).collect(),
            tags: recipe.tags.into_iter().map(Into::into).collect(),
            time_minutes: recipe.time_minutes,
            price: price_string(recipe.price),
            link: recipe.link,
            image: recipe.image.as_deref().map(|p| state.media_url_for(p)),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecipeImageResponse {
    pub id: i32,
    pub image: Option<String>,
}

impl RecipeImageResponse {
    fn new(recipe: &Recipe, state: &AppState) -> Self {
        Self {
            id: recipe.id,
            image: recipe.image.as_deref().map(|p| state.media_url_for(p)),
        }
    }
}

// ── Request types ────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct RecipeListQuery {
    pub tags: Option<String>,
    pub ingredients: Option<String>,
}

impl RecipeListQuery {
    /// A non-integer id is a malformed query, not a field validation failure.
    fn into_filter(self) -> Result<RecipeFilter, RecipeboxError> {
        let parse = |field: &str, raw: Option<String>| match raw {
            Some(raw) => parse_id_list(&raw)
                .map_err(|e| RecipeboxError::MalformedRequest(format!("{field}: {e}"))),
            None => Ok(vec![]),
        };
        let tag_ids = parse("tags", self.tags)?;
        let ingredient_ids = parse("ingredients", self.ingredients)?;
        Ok(RecipeFilter {
            tag_ids,
            ingredient_ids,
        })
    }
}

/// Numbers may arrive as JSON numbers or numeric strings.
#[derive(Deserialize)]
pub struct RecipeRequest {
    pub title: Option<String>,
    pub time_minutes: Option<Value>,
    pub price: Option<Value>,
    #[serde(default, deserialize_with = "nullable")]
    pub link: Option<Option<String>>,
    pub tags: Option<Vec<i32>>,
    pub ingredients: Option<Vec<i32>>,
}

fn parse_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < 1e15)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn parse_decimal(value: &Value) -> Option<Decimal> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_owned(),
        _ => return None,
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

impl RecipeRequest {
    fn into_input(self) -> Result<RecipeInput, FieldErrors> {
        let mut errors = FieldErrors::new();
        let time_minutes = self.time_minutes.as_ref().and_then(|v| {
            let parsed = parse_integer(v);
            if parsed.is_none() {
                errors.add("time_minutes", "a valid integer is required");
            }
            parsed
        });
        let price = self.price.as_ref().and_then(|v| {
            let parsed = parse_decimal(v);
            if parsed.is_none() {
                errors.add("price", "a valid number is required");
            }
            parsed
        });
        errors.into_result()?;
        Ok(RecipeInput {
            title: self.title,
            time_minutes,
            price,
            link: self.link,
            tags: self.tags,
            ingredients: self.ingredients,
        })
    }
}

// ── GET /recipe/recipes ──────────────────────────────────────────────────────

pub async fn list_recipes(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<Vec<RecipeResponse>>, RecipeboxError> {
    let query: RecipeListQuery = parse_query(raw_query.as_deref())?;
    let filter = query.into_filter()?;
    let usecase = ListRecipesUseCase {
        repo: state.recipe_repo(),
    };
    let recipes = usecase.execute(user.id, &filter).await?;
    Ok(Json(recipes.into_iter().map(Into::into).collect()))
}

// ── POST /recipe/recipes ─────────────────────────────────────────────────────

pub async fn create_recipe(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    JsonBody(body): JsonBody<RecipeRequest>,
) -> Result<(StatusCode, Json<RecipeResponse>), RecipeboxError> {
    let input = body.into_input()?;
    let usecase = CreateRecipeUseCase {
        recipes: state.recipe_repo(),
        tags: state.tag_repo(),
        ingredients: state.ingredient_repo(),
    };
    let recipe = usecase.execute(user.id, input).await?;
    Ok((StatusCode::CREATED, Json(recipe.into())))
}

// ── GET /recipe/recipes/{id} ─────────────────────────────────────────────────

pub async fn get_recipe(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    IdPath(id): IdPath<i32>,
) -> Result<Json<RecipeDetailResponse>, RecipeboxError> {
    let usecase = GetRecipeUseCase {
        repo: state.recipe_repo(),
    };
    let recipe = usecase.execute(user.id, id).await?;
    Ok(Json(RecipeDetailResponse::new(recipe, &state)))
}

// ── PUT / PATCH /recipe/recipes/{id} ─────────────────────────────────────────

async fn update_recipe(
    state: AppState,
    user_id: uuid::Uuid,
    id: i32,
    body: RecipeRequest,
    partial: bool,
) -> Result<Json<RecipeResponse>, RecipeboxError> {
    let input = body.into_input()?;
    let usecase = UpdateRecipeUseCase {
        recipes: state.recipe_repo(),
        tags: state.tag_repo(),
        ingredients: state.ingredient_repo(),
    };
    let recipe = usecase.execute(user_id, id, input, partial).await?;
    Ok(Json(recipe.into()))
}

pub async fn replace_recipe(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    IdPath(id): IdPath<i32>,
    JsonBody(body): JsonBody<RecipeRequest>,
) -> Result<Json<RecipeResponse>, RecipeboxError> {
    update_recipe(state, user.id, id, body, false).await
}

pub async fn patch_recipe(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    IdPath(id): IdPath<i32>,
    JsonBody(body): JsonBody<RecipeRequest>,
) -> Result<Json<RecipeResponse>, RecipeboxError> {
    update_recipe(state, user.id, id, body, true).await
}

// ── DELETE /recipe/recipes/{id} ──────────────────────────────────────────────

pub async fn delete_recipe(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    IdPath(id): IdPath<i32>,
) -> Result<StatusCode, RecipeboxError> {
    let usecase = DeleteRecipeUseCase {
        recipes: state.recipe_repo(),
        media: state.media_store(),
    };
    usecase.execute(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST /recipe/recipes/{id}/upload-image ───────────────────────────────────

pub async fn upload_recipe_image(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    IdPath(id): IdPath<i32>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<RecipeImageResponse>, RecipeboxError> {
    let mut multipart = multipart?;
    let mut upload = None;
    while let Some(field) = multipart.next_field().await.map_err(upload_error)? {
        if field.name() == Some("image") {
            upload = Some(field.bytes().await.map_err(upload_error)?);
            break;
        }
    }

    let usecase = UploadRecipeImageUseCase {
        recipes: state.recipe_repo(),
        media: state.media_store(),
    };
    let recipe = usecase.execute(user.id, id, upload).await?;
    Ok(Json(RecipeImageResponse::new(&recipe, &state)))
}

fn upload_error(error: axum::extract::multipart::MultipartError) -> RecipeboxError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return RecipeboxError::field("image", "the submitted file is too large");
    }
    error.into()
}
