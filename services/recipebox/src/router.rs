use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::services::ServeDir;

use recipebox_core::middleware::{propagate_request_id_layer, request_id_layer, trace_layer};

use crate::error::RecipeboxError;
use crate::handlers::{
    admin::{create_user_as_admin, get_user, list_users},
    health::{healthz, readyz},
    ingredient::{
        create_ingredient, delete_ingredient, get_ingredient, list_ingredients, patch_ingredient,
        replace_ingredient,
    },
    recipe::{
        create_recipe, delete_recipe, get_recipe, list_recipes, patch_recipe, replace_recipe,
        upload_recipe_image,
    },
    tag::{create_tag, delete_tag, get_tag, list_tags, patch_tag, replace_tag},
    token::create_token,
    user::{create_user, get_me, update_me},
};
use crate::state::AppState;

async fn method_not_allowed() -> RecipeboxError {
    RecipeboxError::MethodNotAllowed
}

pub fn build_router(state: AppState) -> Router {
    let media = ServeDir::new(&state.media_root);
    let upload_limit = DefaultBodyLimit::max(state.max_upload_bytes);

    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Users
        .route("/users/create", post(create_user))
        .route("/users/token", post(create_token))
        .route("/users/me", get(get_me).patch(update_me))
        // Staff
        .route("/admin/users", get(list_users).post(create_user_as_admin))
        .route("/admin/users/{id}", get(get_user))
        // Tags
        .route("/recipe/tags", get(list_tags).post(create_tag))
        .route(
            "/recipe/tags/{id}",
            get(get_tag)
                .put(replace_tag)
                .patch(patch_tag)
                .delete(delete_tag),
        )
        // Ingredients
        .route(
            "/recipe/ingredients",
            get(list_ingredients).post(create_ingredient),
        )
        .route(
            "/recipe/ingredients/{id}",
            get(get_ingredient)
                .put(replace_ingredient)
                .patch(patch_ingredient)
                .delete(delete_ingredient),
        )
        // Recipes
        .route("/recipe/recipes", get(list_recipes).post(create_recipe))
        .route(
            "/recipe/recipes/{id}",
            get(get_recipe)
                .put(replace_recipe)
                .patch(patch_recipe)
                .delete(delete_recipe),
        )
        .route(
            "/recipe/recipes/{id}/upload-image",
            post(upload_recipe_image).layer(upload_limit),
        )
        // Uploaded files
        .nest_service("/media", media)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(propagate_request_id_layer())
        .layer(trace_layer())
        .layer(request_id_layer())
        .with_state(state)
}
