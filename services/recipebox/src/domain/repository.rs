#![allow(async_fn_in_trait)]

use uuid::Uuid;

use crate::domain::types::{
    Attr, AttrKind, AuthToken, NewRecipe, Recipe, RecipeChanges, RecipeFilter, User,
};
use crate::error::RecipeboxError;

/// Repository for accounts.
pub trait UserRepository: Send + Sync {
    /// Every account, oldest first.
    async fn list(&self) -> Result<Vec<User>, RecipeboxError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RecipeboxError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RecipeboxError>;
    /// Fails with `UserAlreadyExists` when the email is taken.
    async fn create(&self, user: &User) -> Result<(), RecipeboxError>;
    /// Persist email, name, password and `updated_at` of an existing user.
    async fn update_profile(&self, user: &User) -> Result<(), RecipeboxError>;
}

/// Repository for API tokens.
pub trait TokenRepository: Send + Sync {
    async fn find_by_key(&self, key: &str) -> Result<Option<AuthToken>, RecipeboxError>;
    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<AuthToken>, RecipeboxError>;
    /// Returns `false` when the user already has a token.
    async fn create(&self, token: &AuthToken) -> Result<bool, RecipeboxError>;
}

/// Repository for tags or ingredients. Every call is scoped to one owner.
pub trait AttrRepository: Send + Sync {
    fn kind(&self) -> AttrKind;

    /// Owner's records by name descending. With `assigned_only`, only those
    /// attached to at least one recipe, each listed once.
    async fn list(&self, user_id: Uuid, assigned_only: bool) -> Result<Vec<Attr>, RecipeboxError>;
    async fn get(&self, user_id: Uuid, id: i32) -> Result<Option<Attr>, RecipeboxError>;
    async fn create(&self, user_id: Uuid, name: &str) -> Result<Attr, RecipeboxError>;
    /// Returns `None` when no such record belongs to the owner.
    async fn rename(
        &self,
        user_id: Uuid,
        id: i32,
        name: &str,
    ) -> Result<Option<Attr>, RecipeboxError>;
    /// Returns `true` if a row was deleted.
    async fn delete(&self, user_id: Uuid, id: i32) -> Result<bool, RecipeboxError>;
    /// The subset of `ids` that exist and belong to the owner.
    async fn find_owned_ids(&self, user_id: Uuid, ids: &[i32]) -> Result<Vec<i32>, RecipeboxError>;
}

/// Repository for recipes and their tag/ingredient links.
pub trait RecipeRepository: Send + Sync {
    /// Owner's recipes by id descending.
    async fn list(
        &self,
        user_id: Uuid,
        filter: &RecipeFilter,
    ) -> Result<Vec<Recipe>, RecipeboxError>;
    async fn get(&self, user_id: Uuid, id: i32) -> Result<Option<Recipe>, RecipeboxError>;
    /// Insert the recipe and its links in one transaction.
    async fn create(&self, recipe: &NewRecipe) -> Result<Recipe, RecipeboxError>;
    /// Apply changes in one transaction. `None` when the recipe is not the owner's.
    async fn update(
        &self,
        user_id: Uuid,
        id: i32,
        changes: &RecipeChanges,
    ) -> Result<Option<Recipe>, RecipeboxError>;
    /// Replace the image path and return the one it replaced, read under the
    /// same row lock. Fails with `RecipeNotFound` when the recipe is not the owner's.
    async fn set_image(
        &self,
        user_id: Uuid,
        id: i32,
        image: Option<&str>,
    ) -> Result<Option<String>, RecipeboxError>;
    /// Delete and return the removed recipe, if it was the owner's.
    async fn delete(&self, user_id: Uuid, id: i32) -> Result<Option<Recipe>, RecipeboxError>;
}

/// Storage for uploaded files, addressed by path relative to the media root.
pub trait MediaStore: Send + Sync {
    async fn save(&self, path: &str, bytes: &[u8]) -> Result<(), RecipeboxError>;
    /// Removing a missing file is not an error.
    async fn remove(&self, path: &str) -> Result<(), RecipeboxError>;
}
