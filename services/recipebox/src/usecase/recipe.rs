use rust_decimal::Decimal;
use uuid::Uuid;

use recipebox_core::error::FieldErrors;
use recipebox_domain::text::{optional_text, required_text};

use crate::domain::repository::{AttrRepository, MediaStore, RecipeRepository};
use crate::domain::types::{NewRecipe, Recipe, RecipeChanges, RecipeFilter};
use crate::error::RecipeboxError;

const REQUIRED: &str = "this field is required";

/// Largest storable price: five digits, two of them decimals.
const MAX_PRICE: Decimal = Decimal::from_parts(99999, 0, 0, false, 2);

/// Recipe fields as received. `None` means the field was absent; for `link`,
/// `Some(None)` is an explicit null.
#[derive(Debug, Clone, Default)]
pub struct RecipeInput {
    pub title: Option<String>,
    pub time_minutes: Option<i64>,
    pub price: Option<Decimal>,
    pub link: Option<Option<String>>,
    pub tags: Option<Vec<i32>>,
    pub ingredients: Option<Vec<i32>>,
}

/// Check a price and normalize it to two decimal places.
pub fn validate_price(price: Decimal) -> Result<Decimal, &'static str> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err("ensure this value is greater than or equal to 0");
    }
    if price.normalize().scale() > 2 {
        return Err("ensure that there are no more than 2 decimal places");
    }
    if price > MAX_PRICE {
        return Err("ensure that there are no more than 5 digits in total");
    }
    let mut price = price.abs();
    price.rescale(2);
    Ok(price)
}

fn validate_time_minutes(minutes: i64) -> Result<i32, &'static str> {
    if minutes < 0 {
        return Err("ensure this value is greater than or equal to 0");
    }
    i32::try_from(minutes).map_err(|_| "ensure this value is less than or equal to 2147483647")
}

fn dedup(ids: Vec<i32>) -> Vec<i32> {
    let mut out = Vec::with_capacity(ids.len());
    for id in ids {
        if !out.contains(&id) {
            out.push(id);
        }
    }
    out
}

/// Validate field shapes. A full write (`partial == false`) requires title,
/// time and price, and resets absent link and relations.
pub fn validate_recipe_input(
    input: RecipeInput,
    partial: bool,
) -> Result<RecipeChanges, FieldErrors> {
    let mut errors = FieldErrors::new();
    let mut changes = RecipeChanges::default();

    match input.title {
        Some(title) => match required_text(&title) {
            Ok(title) => changes.title = Some(title),
            Err(e) => errors.add("title", e.to_string()),
        },
        None if !partial => errors.add("title", REQUIRED),
        None => {}
    }
    match input.time_minutes {
        Some(minutes) => match validate_time_minutes(minutes) {
            Ok(minutes) => changes.time_minutes = Some(minutes),
            Err(msg) => errors.add("time_minutes", msg),
        },
        None if !partial => errors.add("time_minutes", REQUIRED),
        None => {}
    }
    match input.price {
        Some(price) => match validate_price(price) {
            Ok(price) => changes.price = Some(price),
            Err(msg) => errors.add("price", msg),
        },
        None if !partial => errors.add("price", REQUIRED),
        None => {}
    }
    match input.link {
        Some(link) => match optional_text(link.as_deref()) {
            Ok(link) => changes.link = Some(link),
            Err(e) => errors.add("link", e.to_string()),
        },
        None if !partial => changes.link = Some(None),
        None => {}
    }
    changes.tag_ids = match input.tags {
        Some(ids) => Some(dedup(ids)),
        None if !partial => Some(vec![]),
        None => None,
    };
    changes.ingredient_ids = match input.ingredients {
        Some(ids) => Some(dedup(ids)),
        None if !partial => Some(vec![]),
        None => None,
    };

    errors.into_result()?;
    Ok(changes)
}

/// Every id must name a record the user owns. Returns one error per unknown id.
async fn check_owned<A: AttrRepository>(
    repo: &A,
    user_id: Uuid,
    ids: Option<&Vec<i32>>,
) -> Result<FieldErrors, RecipeboxError> {
    let mut errors = FieldErrors::new();
    let Some(ids) = ids.filter(|ids| !ids.is_empty()) else {
        return Ok(errors);
    };
    let owned = repo.find_owned_ids(user_id, ids).await?;
    for id in ids {
        if !owned.contains(id) {
            errors.add(
                repo.kind().field(),
                format!("invalid pk \"{id}\" - object does not exist"),
            );
        }
    }
    Ok(errors)
}

async fn check_relations<T, I>(
    tags: &T,
    ingredients: &I,
    user_id: Uuid,
    changes: &RecipeChanges,
) -> Result<(), RecipeboxError>
where
    T: AttrRepository,
    I: AttrRepository,
{
    let mut errors = check_owned(tags, user_id, changes.tag_ids.as_ref()).await?;
    errors.extend(check_owned(ingredients, user_id, changes.ingredient_ids.as_ref()).await?);
    errors.into_result()?;
    Ok(())
}

// ── ListRecipes ──────────────────────────────────────────────────────────────

pub struct ListRecipesUseCase<R: RecipeRepository> {
    pub repo: R,
}

impl<R: RecipeRepository> ListRecipesUseCase<R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        filter: &RecipeFilter,
    ) -> Result<Vec<Recipe>, RecipeboxError> {
        self.repo.list(user_id, filter).await
    }
}

// ── GetRecipe ────────────────────────────────────────────────────────────────

pub struct GetRecipeUseCase<R: RecipeRepository> {
    pub repo: R,
}

impl<R: RecipeRepository> GetRecipeUseCase<R> {
    pub async fn execute(&self, user_id: Uuid, id: i32) -> Result<Recipe, RecipeboxError> {
        self.repo
            .get(user_id, id)
            .await?
            .ok_or(RecipeboxError::RecipeNotFound)
    }
}

// ── CreateRecipe ─────────────────────────────────────────────────────────────

pub struct CreateRecipeUseCase<R, T, I>
where
    R: RecipeRepository,
    T: AttrRepository,
    I: AttrRepository,
{
    pub recipes: R,
    pub tags: T,
    pub ingredients: I,
}

impl<R, T, I> CreateRecipeUseCase<R, T, I>
where
    R: RecipeRepository,
    T: AttrRepository,
    I: AttrRepository,
{
    pub async fn execute(&self, user_id: Uuid, input: RecipeInput) -> Result<Recipe, RecipeboxError> {
        let changes = validate_recipe_input(input, false)?;
        check_relations(&self.tags, &self.ingredients, user_id, &changes).await?;

        // Full validation guarantees the required fields are present.
        let (Some(title), Some(time_minutes), Some(price)) =
            (changes.title, changes.time_minutes, changes.price)
        else {
            return Err(anyhow::anyhow!("validated recipe is missing required fields").into());
        };
        let recipe = NewRecipe {
            user_id,
            title,
            time_minutes,
            price,
            link: changes.link.flatten(),
            tag_ids: changes.tag_ids.unwrap_or_default(),
            ingredient_ids: changes.ingredient_ids.unwrap_or_default(),
        };
        self.recipes.create(&recipe).await
    }
}

// ── UpdateRecipe ─────────────────────────────────────────────────────────────

pub struct UpdateRecipeUseCase<R, T, I>
where
    R: RecipeRepository,
    T: AttrRepository,
    I: AttrRepository,
{
    pub recipes: R,
    pub tags: T,
    pub ingredients: I,
}

impl<R, T, I> UpdateRecipeUseCase<R, T, I>
where
    R: RecipeRepository,
    T: AttrRepository,
    I: AttrRepository,
{
    /// PUT when `partial` is false, PATCH otherwise.
    pub async fn execute(
        &self,
        user_id: Uuid,
        id: i32,
        input: RecipeInput,
        partial: bool,
    ) -> Result<Recipe, RecipeboxError> {
        if self.recipes.get(user_id, id).await?.is_none() {
            return Err(RecipeboxError::RecipeNotFound);
        }
        let changes = validate_recipe_input(input, partial)?;
        check_relations(&self.tags, &self.ingredients, user_id, &changes).await?;
        self.recipes
            .update(user_id, id, &changes)
            .await?
            .ok_or(RecipeboxError::RecipeNotFound)
    }
}

// ── DeleteRecipe ─────────────────────────────────────────────────────────────

pub struct DeleteRecipeUseCase<R, M>
where
    R: RecipeRepository,
    M: MediaStore,
{
    pub recipes: R,
    pub media: M,
}

impl<R, M> DeleteRecipeUseCase<R, M>
where
    R: RecipeRepository,
    M: MediaStore,
{
    /// Delete the recipe, then its stored image. A failed file removal is
    /// logged; the recipe stays deleted.
    pub async fn execute(&self, user_id: Uuid, id: i32) -> Result<(), RecipeboxError> {
        let recipe = self
            .recipes
            .delete(user_id, id)
            .await?
            .ok_or(RecipeboxError::RecipeNotFound)?;
        if let Some(image) = recipe.image {
            if let Err(e) = self.media.remove(&image).await {
                tracing::warn!(recipe_id = id, image = %image, error = %e, "failed to remove recipe image");
            }
        }
        Ok(())
    }
}
