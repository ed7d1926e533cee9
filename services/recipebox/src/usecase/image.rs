use anyhow::Context as _;
use bytes::Bytes;
use image::ImageFormat;
use uuid::Uuid;

use crate::domain::repository::{MediaStore, RecipeRepository};
use crate::domain::types::Recipe;
use crate::error::RecipeboxError;

/// Directory, relative to the media root, that recipe images are stored in.
pub const RECIPE_IMAGE_DIR: &str = "uploads/recipe";

const INVALID_IMAGE: &str =
    "upload a valid image. the file you uploaded was either not an image or a corrupted image";

/// Sniff and fully decode `bytes`. Returns the detected format.
pub fn detect_image(bytes: &[u8]) -> Result<ImageFormat, RecipeboxError> {
    let format = image::guess_format(bytes).map_err(|_| RecipeboxError::field("image", INVALID_IMAGE))?;
    image::load_from_memory_with_format(bytes, format)
        .map_err(|_| RecipeboxError::field("image", INVALID_IMAGE))?;
    Ok(format)
}

/// Storage path for a new recipe image. A fresh UUID keeps old URLs from
/// being reused for different content.
pub fn recipe_image_path(format: ImageFormat) -> String {
    let ext = format.extensions_str().first().copied().unwrap_or("img");
    format!("{RECIPE_IMAGE_DIR}/{}.{ext}", Uuid::new_v4())
}

// ── UploadRecipeImage ────────────────────────────────────────────────────────

pub struct UploadRecipeImageUseCase<R, M>
where
    R: RecipeRepository,
    M: MediaStore,
{
    pub recipes: R,
    pub media: M,
}

impl<R, M> UploadRecipeImageUseCase<R, M>
where
    R: RecipeRepository,
    M: MediaStore,
{
    /// Validate and store `upload` as the recipe's image, replacing any
    /// previous file. `None` means the multipart form had no `image` part.
    pub async fn execute(
        &self,
        user_id: Uuid,
        recipe_id: i32,
        upload: Option<Bytes>,
    ) -> Result<Recipe, RecipeboxError> {
        let mut recipe = self
            .recipes
            .get(user_id, recipe_id)
            .await?
            .ok_or(RecipeboxError::RecipeNotFound)?;

        let Some(bytes) = upload else {
            return Err(RecipeboxError::field("image", "no file was submitted"));
        };
        if bytes.is_empty() {
            return Err(RecipeboxError::field("image", "the submitted file is empty"));
        }
        let decoded = bytes.clone();
        let format = tokio::task::spawn_blocking(move || detect_image(&decoded))
            .await
            .context("join image decoding task")??;

        let path = recipe_image_path(format);
        self.media.save(&path, &bytes).await?;
        let previous = match self.recipes.set_image(user_id, recipe_id, Some(&path)).await {
            Ok(previous) => previous,
            Err(e) => {
                if let Err(cleanup) = self.media.remove(&path).await {
                    tracing::warn!(
                        recipe_id,
                        image = %path,
                        error = %cleanup,
                        "failed to remove orphaned recipe image"
                    );
                }
                return Err(e);
            }
        };

        // The path read under the row lock, not the snapshot above.
        if let Some(old) = previous {
            if let Err(e) = self.media.remove(&old).await {
                tracing::warn!(recipe_id, image = %old, error = %e, "failed to remove replaced recipe image");
            }
        }
        recipe.image = Some(path);
        Ok(recipe)
    }
}
