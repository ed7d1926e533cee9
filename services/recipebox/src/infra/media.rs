use std::path::{Component, Path, PathBuf};

use anyhow::Context as _;

use crate::domain::repository::MediaStore;
use crate::error::RecipeboxError;

/// Media files on the local file system under `root`.
#[derive(Clone)]
pub struct LocalMediaStore {
    pub root: PathBuf,
}

impl LocalMediaStore {
    /// Resolve a stored relative path. Absolute paths and `..` are refused.
    fn resolve(&self, path: &str) -> Result<PathBuf, RecipeboxError> {
        let relative = Path::new(path);
        let is_plain = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if !is_plain {
            return Err(anyhow::anyhow!("refusing media path {path:?}").into());
        }
        Ok(self.root.join(relative))
    }
}

impl MediaStore for LocalMediaStore {
    async fn save(&self, path: &str, bytes: &[u8]) -> Result<(), RecipeboxError> {
        let full = self.resolve(path)?;
        if let Some(parent) = full.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("create media dir {}", parent.display()))?;
        }
        tokio::fs::write(&full, bytes)
            .await
            .with_context(|| format!("write media file {}", full.display()))?;
        Ok(())
    }

    async fn remove(&self, path: &str) -> Result<(), RecipeboxError> {
        let full = self.resolve(path)?;
        match tokio::fs::remove_file(&full).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(anyhow::Error::new(e)
                .context(format!("remove media file {}", full.display()))
                .into()),
        }
    }
}
