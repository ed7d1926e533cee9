use std::path::PathBuf;

use sea_orm::DatabaseConnection;

use recipebox_auth_types::password::PasswordHasher;

use crate::infra::db::{
    DbIngredientRepository, DbRecipeRepository, DbTagRepository, DbTokenRepository,
    DbUserRepository,
};
use crate::infra::media::LocalMediaStore;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub hasher: PasswordHasher,
    pub media_root: PathBuf,
    /// Public prefix for stored media, with a trailing slash.
    pub media_url: String,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn token_repo(&self) -> DbTokenRepository {
        DbTokenRepository {
            db: self.db.clone(),
        }
    }

    pub fn tag_repo(&self) -> DbTagRepository {
        DbTagRepository {
            db: self.db.clone(),
        }
    }

    pub fn ingredient_repo(&self) -> DbIngredientRepository {
        DbIngredientRepository {
            db: self.db.clone(),
        }
    }

    pub fn recipe_repo(&self) -> DbRecipeRepository {
        DbRecipeRepository {
            db: self.db.clone(),
        }
    }

    pub fn media_store(&self) -> LocalMediaStore {
        LocalMediaStore {
            root: self.media_root.clone(),
        }
    }

    /// Public URL of a stored media path.
    pub fn media_url_for(&self, path: &str) -> String {
        if self.media_url.ends_with('/') {
            format!("{}{path}", self.media_url)
        } else {
            format!("{}/{path}", self.media_url)
        }
    }
}
