use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::RecipeboxError;

/// Account as seen by the service. `password` is the bcrypt hash.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password: String,
    pub name: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Opaque API token; one per user.
#[derive(Debug, Clone)]
pub struct AuthToken {
    pub key: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Which attribute table a tag-like record lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrKind {
    Tag,
    Ingredient,
}

impl AttrKind {
    pub fn not_found(self) -> RecipeboxError {
        match self {
            Self::Tag => RecipeboxError::TagNotFound,
            Self::Ingredient => RecipeboxError::IngredientNotFound,
        }
    }

    /// Request/response field that carries ids of this kind on a recipe.
    pub fn field(self) -> &'static str {
        match self {
            Self::Tag => "tags",
            Self::Ingredient => "ingredients",
        }
    }
}

/// A tag or an ingredient. Both are a user-owned name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    pub id: i32,
    pub user_id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct Recipe {
    pub id: i32,
    pub user_id: Uuid,
    pub title: String,
    pub time_minutes: i32,
    pub price: Decimal,
    pub link: Option<String>,
    /// Path relative to the media root.
    pub image: Option<String>,
    pub tags: Vec<Attr>,
    pub ingredients: Vec<Attr>,
}

impl Recipe {
    pub fn tag_ids(&self) -> Vec<i32> {
        self.tags.iter().map(|t| t.id).collect()
    }

    pub fn ingredient_ids(&self) -> Vec<i32> {
        self.ingredients.iter().map(|i| i.id).collect()
    }
}

/// A validated recipe ready to insert.
#[derive(Debug, Clone)]
pub struct NewRecipe {
    pub user_id: Uuid,
    pub title: String,
    pub time_minutes: i32,
    pub price: Decimal,
    pub link: Option<String>,
    pub tag_ids: Vec<i32>,
    pub ingredient_ids: Vec<i32>,
}

/// Validated changes to a recipe. `None` leaves a field as is; for `link`,
/// `Some(None)` clears it. Relation sets are replaced wholesale.
#[derive(Debug, Clone, Default)]
pub struct RecipeChanges {
    pub title: Option<String>,
    pub time_minutes: Option<i32>,
    pub price: Option<Decimal>,
    pub link: Option<Option<String>>,
    pub tag_ids: Option<Vec<i32>>,
    pub ingredient_ids: Option<Vec<i32>>,
}

/// Recipe list filters. Empty lists do not filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    pub tag_ids: Vec<i32>,
    pub ingredient_ids: Vec<i32>,
}
