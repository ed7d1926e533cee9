//! Tag and ingredient use cases. Both share one repository shape, so each
//! use case is generic over `AttrRepository` and reports not-found per kind.

use uuid::Uuid;

use recipebox_domain::text::required_text;

use crate::domain::repository::AttrRepository;
use crate::domain::types::Attr;
use crate::error::RecipeboxError;

fn check_name(name: &str) -> Result<String, RecipeboxError> {
    required_text(name).map_err(|e| RecipeboxError::field("name", e.to_string()))
}

// ── ListAttrs ────────────────────────────────────────────────────────────────

pub struct ListAttrsUseCase<R: AttrRepository> {
    pub repo: R,
}

impl<R: AttrRepository> ListAttrsUseCase<R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        assigned_only: bool,
    ) -> Result<Vec<Attr>, RecipeboxError> {
        self.repo.list(user_id, assigned_only).await
    }
}

// ── GetAttr ──────────────────────────────────────────────────────────────────

pub struct GetAttrUseCase<R: AttrRepository> {
    pub repo: R,
}

impl<R: AttrRepository> GetAttrUseCase<R> {
    pub async fn execute(&self, user_id: Uuid, id: i32) -> Result<Attr, RecipeboxError> {
        self.repo
            .get(user_id, id)
            .await?
            .ok_or_else(|| self.repo.kind().not_found())
    }
}

// ── CreateAttr ───────────────────────────────────────────────────────────────

pub struct CreateAttrUseCase<R: AttrRepository> {
    pub repo: R,
}

impl<R: AttrRepository> CreateAttrUseCase<R> {
    pub async fn execute(&self, user_id: Uuid, name: &str) -> Result<Attr, RecipeboxError> {
        let name = check_name(name)?;
        self.repo.create(user_id, &name).await
    }
}

// ── UpdateAttr ───────────────────────────────────────────────────────────────

pub struct UpdateAttrUseCase<R: AttrRepository> {
    pub repo: R,
}

impl<R: AttrRepository> UpdateAttrUseCase<R> {
    /// Rename a record. A full update requires `name`; a partial one without
    /// it returns the record unchanged.
    pub async fn execute(
        &self,
        user_id: Uuid,
        id: i32,
        name: Option<&str>,
        partial: bool,
    ) -> Result<Attr, RecipeboxError> {
        let not_found = || self.repo.kind().not_found();
        let current = self.repo.get(user_id, id).await?.ok_or_else(not_found)?;
        let Some(name) = name else {
            if partial {
                return Ok(current);
            }
            return Err(RecipeboxError::field("name", "this field is required"));
        };
        let name = check_name(name)?;
        self.repo
            .rename(user_id, current.id, &name)
            .await?
            .ok_or_else(not_found)
    }
}

// ── DeleteAttr ───────────────────────────────────────────────────────────────

pub struct DeleteAttrUseCase<R: AttrRepository> {
    pub repo: R,
}

impl<R: AttrRepository> DeleteAttrUseCase<R> {
    pub async fn execute(&self, user_id: Uuid, id: i32) -> Result<(), RecipeboxError> {
        if self.repo.delete(user_id, id).await? {
            Ok(())
        } else {
            Err(self.repo.kind().not_found())
        }
    }
}
