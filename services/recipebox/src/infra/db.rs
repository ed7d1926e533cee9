use std::collections::HashMap;

use anyhow::Context as _;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ActiveValue::Set, ColumnTrait, ConnectionTrait,
    DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait, IntoActiveModel as _,
    QueryFilter, QueryOrder, QuerySelect, Select, SqlErr, TransactionTrait,
    sea_query::{OnConflict, Query},
};
use uuid::Uuid;

use recipebox_schema::{
    auth_tokens, ingredients, recipe_ingredients, recipe_tags, recipes, tags, users,
};

use crate::domain::repository::{
    AttrRepository, RecipeRepository, TokenRepository, UserRepository,
};
use crate::domain::types::{
    Attr, AttrKind, AuthToken, NewRecipe, Recipe, RecipeChanges, RecipeFilter, User,
};
use crate::error::RecipeboxError;

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn list(&self) -> Result<Vec<User>, RecipeboxError> {
        let models = users::Entity::find()
            .order_by_asc(users::Column::CreatedAt)
            .order_by_asc(users::Column::Id)
            .all(&self.db)
            .await
            .context("list users")?;
        Ok(models.into_iter().map(user_from_model).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RecipeboxError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RecipeboxError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        Ok(model.map(user_from_model))
    }

    async fn create(&self, user: &User) -> Result<(), RecipeboxError> {
        let result = users::ActiveModel {
            id: Set(user.id),
            email: Set(user.email.clone()),
            password: Set(user.password.clone()),
            name: Set(user.name.clone()),
            is_active: Set(user.is_active),
            is_staff: Set(user.is_staff),
            is_superuser: Set(user.is_superuser),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        }
        .insert(&self.db)
        .await;
        match result {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(RecipeboxError::UserAlreadyExists),
            Err(e) => Err(anyhow::Error::new(e).context("create user").into()),
        }
    }

    async fn update_profile(&self, user: &User) -> Result<(), RecipeboxError> {
        let result = users::ActiveModel {
            id: Set(user.id),
            email: Set(user.email.clone()),
            password: Set(user.password.clone()),
            name: Set(user.name.clone()),
            updated_at: Set(user.updated_at),
            ..Default::default()
        }
        .update(&self.db)
        .await;
        match result {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(RecipeboxError::UserAlreadyExists),
            Err(DbErr::RecordNotUpdated) => Err(RecipeboxError::UserNotFound),
            Err(e) => Err(anyhow::Error::new(e).context("update user profile").into()),
        }
    }
}

fn user_from_model(model: users::Model) -> User {
    User {
        id: model.id,
        email: model.email,
        password: model.password,
        name: model.name,
        is_active: model.is_active,
        is_staff: model.is_staff,
        is_superuser: model.is_superuser,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Token repository ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbTokenRepository {
    pub db: DatabaseConnection,
}

impl TokenRepository for DbTokenRepository {
    async fn find_by_key(&self, key: &str) -> Result<Option<AuthToken>, RecipeboxError> {
        let model = auth_tokens::Entity::find_by_id(key.to_owned())
            .one(&self.db)
            .await
            .context("find token by key")?;
        Ok(model.map(token_from_model))
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<AuthToken>, RecipeboxError> {
        let model = auth_tokens::Entity::find()
            .filter(auth_tokens::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .context("find token by user")?;
        Ok(model.map(token_from_model))
    }

    async fn create(&self, token: &AuthToken) -> Result<bool, RecipeboxError> {
        let inserted = auth_tokens::Entity::insert(auth_tokens::ActiveModel {
            key: Set(token.key.clone()),
            user_id: Set(token.user_id),
            created_at: Set(token.created_at),
        })
        .on_conflict(
            OnConflict::column(auth_tokens::Column::UserId)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(&self.db)
        .await
        .context("create token")?;
        Ok(inserted > 0)
    }
}

fn token_from_model(model: auth_tokens::Model) -> AuthToken {
    AuthToken {
        key: model.key,
        user_id: model.user_id,
        created_at: model.created_at,
    }
}

// ── Tag repository ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbTagRepository {
    pub db: DatabaseConnection,
}

/// Owner's tags by name descending, optionally only those used by a recipe.
pub fn tag_list_query(user_id: Uuid, assigned_only: bool) -> Select<tags::Entity> {
    let mut query = tags::Entity::find().filter(tags::Column::UserId.eq(user_id));
    if assigned_only {
        query = query.filter(
            tags::Column::Id.in_subquery(
                Query::select()
                    .column(recipe_tags::Column::TagId)
                    .from(recipe_tags::Entity)
                    .to_owned(),
            ),
        );
    }
    query
        .order_by_desc(tags::Column::Name)
        .order_by_desc(tags::Column::Id)
}

impl AttrRepository for DbTagRepository {
    fn kind(&self) -> AttrKind {
        AttrKind::Tag
    }

    async fn list(&self, user_id: Uuid, assigned_only: bool) -> Result<Vec<Attr>, RecipeboxError> {
        let models = tag_list_query(user_id, assigned_only)
            .all(&self.db)
            .await
            .context("list tags")?;
        Ok(models.into_iter().map(tag_from_model).collect())
    }

    async fn get(&self, user_id: Uuid, id: i32) -> Result<Option<Attr>, RecipeboxError> {
        let model = tags::Entity::find_by_id(id)
            .filter(tags::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .context("get tag")?;
        Ok(model.map(tag_from_model))
    }

    async fn create(&self, user_id: Uuid, name: &str) -> Result<Attr, RecipeboxError> {
        let model = tags::ActiveModel {
            id: NotSet,
            user_id: Set(user_id),
            name: Set(name.to_owned()),
        }
        .insert(&self.db)
        .await
        .context("create tag")?;
        Ok(tag_from_model(model))
    }

    async fn rename(
        &self,
        user_id: Uuid,
        id: i32,
        name: &str,
    ) -> Result<Option<Attr>, RecipeboxError> {
        let Some(model) = tags::Entity::find_by_id(id)
            .filter(tags::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .context("find tag to rename")?
        else {
            return Ok(None);
        };
        let mut am = model.into_active_model();
        am.name = Set(name.to_owned());
        let model = am.update(&self.db).await.context("rename tag")?;
        Ok(Some(tag_from_model(model)))
    }

    async fn delete(&self, user_id: Uuid, id: i32) -> Result<bool, RecipeboxError> {
        let result = tags::Entity::delete_many()
            .filter(tags::Column::Id.eq(id))
            .filter(tags::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .context("delete tag")?;
        Ok(result.rows_affected > 0)
    }

    async fn find_owned_ids(&self, user_id: Uuid, ids: &[i32]) -> Result<Vec<i32>, RecipeboxError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let found = tags::Entity::find()
            .select_only()
            .column(tags::Column::Id)
            .filter(tags::Column::UserId.eq(user_id))
            .filter(tags::Column::Id.is_in(ids.iter().copied()))
            .into_tuple::<i32>()
            .all(&self.db)
            .await
            .context("find owned tag ids")?;
        Ok(found)
    }
}

fn tag_from_model(model: tags::Model) -> Attr {
    Attr {
        id: model.id,
        user_id: model.user_id,
        name: model.name,
    }
}

// ── Ingredient repository ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbIngredientRepository {
    pub db: DatabaseConnection,
}

/// Owner's ingredients by name descending, optionally only those used by a recipe.
pub fn ingredient_list_query(user_id: Uuid, assigned_only: bool) -> Select<ingredients::Entity> {
    let mut query = ingredients::Entity::find().filter(ingredients::Column::UserId.eq(user_id));
    if assigned_only {
        query = query.filter(
            ingredients::Column::Id.in_subquery(
                Query::select()
                    .column(recipe_ingredients::Column::IngredientId)
                    .from(recipe_ingredients::Entity)
                    .to_owned(),
            ),
        );
    }
    query
        .order_by_desc(ingredients::Column::Name)
        .order_by_desc(ingredients::Column::Id)
}

impl AttrRepository for DbIngredientRepository {
    fn kind(&self) -> AttrKind {
        AttrKind::Ingredient
    }

    async fn list(&self, user_id: Uuid, assigned_only: bool) -> Result<Vec<Attr>, RecipeboxError> {
        let models = ingredient_list_query(user_id, assigned_only)
            .all(&self.db)
            .await
            .context("list ingredients")?;
        Ok(models.into_iter().map(ingredient_from_model).collect())
    }

    async fn get(&self, user_id: Uuid, id: i32) -> Result<Option<Attr>, RecipeboxError> {
        let model = ingredients::Entity::find_by_id(id)
            .filter(ingredients::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .context("get ingredient")?;
        Ok(model.map(ingredient_from_model))
    }

    async fn create(&self, user_id: Uuid, name: &str) -> Result<Attr, RecipeboxError> {
        let model = ingredients::ActiveModel {
            id: NotSet,
            user_id: Set(user_id),
            name: Set(name.to_owned()),
        }
        .insert(&self.db)
        .await
        .context("create ingredient")?;
        Ok(ingredient_from_model(model))
    }

    async fn rename(
        &self,
        user_id: Uuid,
        id: i32,
        name: &str,
    ) -> Result<Option<Attr>, RecipeboxError> {
        let Some(model) = ingredients::Entity::find_by_id(id)
            .filter(ingredients::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .context("find ingredient to rename")?
        else {
            return Ok(None);
        };
        let mut am = model.into_active_model();
        am.name = Set(name.to_owned());
        let model = am.update(&self.db).await.context("rename ingredient")?;
        Ok(Some(ingredient_from_model(model)))
    }

    async fn delete(&self, user_id: Uuid, id: i32) -> Result<bool, RecipeboxError> {
        let result = ingredients::Entity::delete_many()
            .filter(ingredients::Column::Id.eq(id))
            .filter(ingredients::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .context("delete ingredient")?;
        Ok(result.rows_affected > 0)
    }

    async fn find_owned_ids(&self, user_id: Uuid, ids: &[i32]) -> Result<Vec<i32>, RecipeboxError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let found = ingredients::Entity::find()
            .select_only()
            .column(ingredients::Column::Id)
            .filter(ingredients::Column::UserId.eq(user_id))
            .filter(ingredients::Column::Id.is_in(ids.iter().copied()))
            .into_tuple::<i32>()
            .all(&self.db)
            .await
            .context("find owned ingredient ids")?;
        Ok(found)
    }
}

fn ingredient_from_model(model: ingredients::Model) -> Attr {
    Attr {
        id: model.id,
        user_id: model.user_id,
        name: model.name,
    }
}

// ── Recipe repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbRecipeRepository {
    pub db: DatabaseConnection,
}

/// Owner's recipes by id descending. Each non-empty id list keeps recipes
/// linked to at least one of its ids; both lists must match.
pub fn recipe_list_query(user_id: Uuid, filter: &RecipeFilter) -> Select<recipes::Entity> {
    let mut query = recipes::Entity::find().filter(recipes::Column::UserId.eq(user_id));
    if !filter.tag_ids.is_empty() {
        query = query.filter(
            recipes::Column::Id.in_subquery(
                Query::select()
                    .column(recipe_tags::Column::RecipeId)
                    .from(recipe_tags::Entity)
                    .and_where(recipe_tags::Column::TagId.is_in(filter.tag_ids.iter().copied()))
                    .to_owned(),
            ),
        );
    }
    if !filter.ingredient_ids.is_empty() {
        query = query.filter(
            recipes::Column::Id.in_subquery(
                Query::select()
                    .column(recipe_ingredients::Column::RecipeId)
                    .from(recipe_ingredients::Entity)
                    .and_where(
                        recipe_ingredients::Column::IngredientId
                            .is_in(filter.ingredient_ids.iter().copied()),
                    )
                    .to_owned(),
            ),
        );
    }
    query.order_by_desc(recipes::Column::Id)
}

impl DbRecipeRepository {
    /// Attach tags and ingredients to recipe rows with two batched queries.
    async fn hydrate(&self, models: Vec<recipes::Model>) -> Result<Vec<Recipe>, RecipeboxError> {
        if models.is_empty() {
            return Ok(vec![]);
        }
        let ids: Vec<i32> = models.iter().map(|m| m.id).collect();

        let tag_rows = recipe_tags::Entity::find()
            .filter(recipe_tags::Column::RecipeId.is_in(ids.iter().copied()))
            .find_also_related(tags::Entity)
            .order_by_asc(recipe_tags::Column::TagId)
            .all(&self.db)
            .await
            .context("load recipe tags")?;
        let mut tags_by_recipe: HashMap<i32, Vec<Attr>> = HashMap::new();
        for (link, tag) in tag_rows {
            if let Some(tag) = tag {
                tags_by_recipe
                    .entry(link.recipe_id)
                    .or_default()
                    .push(tag_from_model(tag));
            }
        }

        let ingredient_rows = recipe_ingredients::Entity::find()
            .filter(recipe_ingredients::Column::RecipeId.is_in(ids.iter().copied()))
            .find_also_related(ingredients::Entity)
            .order_by_asc(recipe_ingredients::Column::IngredientId)
            .all(&self.db)
            .await
            .context("load recipe ingredients")?;
        let mut ingredients_by_recipe: HashMap<i32, Vec<Attr>> = HashMap::new();
        for (link, ingredient) in ingredient_rows {
            if let Some(ingredient) = ingredient {
                ingredients_by_recipe
                    .entry(link.recipe_id)
                    .or_default()
                    .push(ingredient_from_model(ingredient));
            }
        }

        Ok(models
            .into_iter()
            .map(|model| {
                let tags = tags_by_recipe.remove(&model.id).unwrap_or_default();
                let ingredients = ingredients_by_recipe.remove(&model.id).unwrap_or_default();
                recipe_from_model(model, tags, ingredients)
            })
            .collect())
    }

    async fn hydrate_one(&self, model: recipes::Model) -> Result<Recipe, RecipeboxError> {
        let mut recipes = self.hydrate(vec![model]).await?;
        recipes
            .pop()
            .ok_or_else(|| anyhow::anyhow!("hydrated recipe vanished").into())
    }
}

impl RecipeRepository for DbRecipeRepository {
    async fn list(
        &self,
        user_id: Uuid,
        filter: &RecipeFilter,
    ) -> Result<Vec<Recipe>, RecipeboxError> {
        let models = recipe_list_query(user_id, filter)
            .all(&self.db)
            .await
            .context("list recipes")?;
        self.hydrate(models).await
    }

    async fn get(&self, user_id: Uuid, id: i32) -> Result<Option<Recipe>, RecipeboxError> {
        let model = recipes::Entity::find_by_id(id)
            .filter(recipes::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .context("get recipe")?;
        match model {
            Some(model) => Ok(Some(self.hydrate_one(model).await?)),
            None => Ok(None),
        }
    }

    async fn create(&self, recipe: &NewRecipe) -> Result<Recipe, RecipeboxError> {
        let model = self
            .db
            .transaction::<_, recipes::Model, DbErr>(|txn| {
                let recipe = recipe.clone();
                Box::pin(async move {
                    let model = recipes::ActiveModel {
                        id: NotSet,
                        user_id: Set(recipe.user_id),
                        title: Set(recipe.title),
                        time_minutes: Set(recipe.time_minutes),
                        price: Set(recipe.price),
                        link: Set(recipe.link),
                        image: Set(None),
                    }
                    .insert(txn)
                    .await?;
                    replace_recipe_tags(txn, model.id, &recipe.tag_ids).await?;
                    replace_recipe_ingredients(txn, model.id, &recipe.ingredient_ids).await?;
                    Ok(model)
                })
            })
            .await
            .context("create recipe")?;
        self.hydrate_one(model).await
    }

    async fn update(
        &self,
        user_id: Uuid,
        id: i32,
        changes: &RecipeChanges,
    ) -> Result<Option<Recipe>, RecipeboxError> {
        let model = self
            .db
            .transaction::<_, Option<recipes::Model>, DbErr>(|txn| {
                let changes = changes.clone();
                Box::pin(async move {
                    let Some(model) = recipes::Entity::find_by_id(id)
                        .filter(recipes::Column::UserId.eq(user_id))
                        .lock_exclusive()
                        .one(txn)
                        .await?
                    else {
                        return Ok(None);
                    };
                    let mut am = model.clone().into_active_model();
                    if let Some(title) = changes.title {
                        am.title = Set(title);
                    }
                    if let Some(time_minutes) = changes.time_minutes {
                        am.time_minutes = Set(time_minutes);
                    }
                    if let Some(price) = changes.price {
                        am.price = Set(price);
                    }
                    if let Some(link) = changes.link {
                        am.link = Set(link);
                    }
                    let model = if am.is_changed() {
                        am.update(txn).await?
                    } else {
                        model
                    };
                    if let Some(tag_ids) = &changes.tag_ids {
                        replace_recipe_tags(txn, model.id, tag_ids).await?;
                    }
                    if let Some(ingredient_ids) = &changes.ingredient_ids {
                        replace_recipe_ingredients(txn, model.id, ingredient_ids).await?;
                    }
                    Ok(Some(model))
                })
            })
            .await
            .context("update recipe")?;
        match model {
            Some(model) => Ok(Some(self.hydrate_one(model).await?)),
            None => Ok(None),
        }
    }

    async fn set_image(
        &self,
        user_id: Uuid,
        id: i32,
        image: Option<&str>,
    ) -> Result<Option<String>, RecipeboxError> {
        let image = image.map(str::to_owned);
        let previous = self
            .db
            .transaction::<_, Option<Option<String>>, DbErr>(|txn| {
                let image = image.clone();
                Box::pin(async move {
                    let Some(model) = recipes::Entity::find_by_id(id)
                        .filter(recipes::Column::UserId.eq(user_id))
                        .lock_exclusive()
                        .one(txn)
                        .await?
                    else {
                        return Ok(None);
                    };
                    let previous = model.image.clone();
                    let mut am = model.into_active_model();
                    am.image = Set(image);
                    am.update(txn).await?;
                    Ok(Some(previous))
                })
            })
            .await
            .context("set recipe image")?;
        previous.ok_or(RecipeboxError::RecipeNotFound)
    }

    async fn delete(&self, user_id: Uuid, id: i32) -> Result<Option<Recipe>, RecipeboxError> {
        let Some(recipe) = self.get(user_id, id).await? else {
            return Ok(None);
        };
        // Join rows go with the recipe via ON DELETE CASCADE.
        let result = recipes::Entity::delete_many()
            .filter(recipes::Column::Id.eq(id))
            .filter(recipes::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .context("delete recipe")?;
        if result.rows_affected == 0 {
            return Ok(None);
        }
        Ok(Some(recipe))
    }
}

async fn replace_recipe_tags(
    txn: &DatabaseTransaction,
    recipe_id: i32,
    tag_ids: &[i32],
) -> Result<(), DbErr> {
    recipe_tags::Entity::delete_many()
        .filter(recipe_tags::Column::RecipeId.eq(recipe_id))
        .exec(txn)
        .await?;
    if tag_ids.is_empty() {
        return Ok(());
    }
    recipe_tags::Entity::insert_many(tag_ids.iter().map(|&tag_id| recipe_tags::ActiveModel {
        recipe_id: Set(recipe_id),
        tag_id: Set(tag_id),
    }))
    .exec_without_returning(txn)
    .await?;
    Ok(())
}

async fn replace_recipe_ingredients(
    txn: &DatabaseTransaction,
    recipe_id: i32,
    ingredient_ids: &[i32],
) -> Result<(), DbErr> {
    recipe_ingredients::Entity::delete_many()
        .filter(recipe_ingredients::Column::RecipeId.eq(recipe_id))
        .exec(txn)
        .await?;
    if ingredient_ids.is_empty() {
        return Ok(());
    }
    recipe_ingredients::Entity::insert_many(ingredient_ids.iter().map(|&ingredient_id| {
        recipe_ingredients::ActiveModel {
            recipe_id: Set(recipe_id),
            ingredient_id: Set(ingredient_id),
        }
    }))
    .exec_without_returning(txn)
    .await?;
    Ok(())
}

fn recipe_from_model(model: recipes::Model, tags: Vec<Attr>, ingredients: Vec<Attr>) -> Recipe {
    Recipe {
        id: model.id,
        user_id: model.user_id,
        title: model.title,
        time_minutes: model.time_minutes,
        price: model.price,
        link: model.link,
        image: model.image,
        tags,
        ingredients,
    }
}

/// Readiness check: one round-trip to the database.
pub async fn ping<C: ConnectionTrait>(db: &C) -> Result<(), RecipeboxError> {
    db.execute_unprepared("SELECT 1")
        .await
        .context("database ping")?;
    Ok(())
}
