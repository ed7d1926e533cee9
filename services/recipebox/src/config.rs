use std::path::PathBuf;

use serde::Deserialize;

use recipebox_core::config::Config;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct RecipeboxConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// TCP port for the HTTP server. Env var: `RECIPEBOX_PORT`.
    #[serde(default = "default_port")]
    pub recipebox_port: u16,
    /// Directory uploaded files are written under.
    #[serde(default = "default_media_root")]
    pub media_root: PathBuf,
    /// Public URL prefix for uploaded files.
    #[serde(default = "default_media_url")]
    pub media_url: String,
    /// Body limit for the image upload endpoint.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
    /// Apply pending migrations before serving.
    #[serde(default)]
    pub run_migrations: bool,
}

impl Config for RecipeboxConfig {}

fn default_port() -> u16 {
    3120
}

fn default_media_root() -> PathBuf {
    PathBuf::from("./media")
}

fn default_media_url() -> String {
    "/media/".to_owned()
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_bcrypt_cost() -> u32 {
    recipebox_auth_types::password::DEFAULT_COST
}
