//! Extractor wrappers whose rejections render as `RecipeboxError`.

use axum::extract::{FromRequest, FromRequestParts};
use serde::de::DeserializeOwned;

use recipebox_core::error::FieldErrors;

use crate::error::RecipeboxError;

/// `axum::Json` with the JSON error envelope on rejection.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(RecipeboxError))]
pub struct JsonBody<T>(pub T);

/// `axum::extract::Path` with the JSON error envelope on rejection.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(RecipeboxError))]
pub struct IdPath<T>(pub T);

/// Parse a raw query string with `serde_qs`. A missing query yields `T::default()`.
pub fn parse_query<T>(raw: Option<&str>) -> Result<T, RecipeboxError>
where
    T: DeserializeOwned + Default,
{
    raw.map(serde_qs::from_str)
        .transpose()
        .map_err(|e| RecipeboxError::MalformedRequest(format!("invalid query string: {e}")))
        .map(Option::unwrap_or_default)
}

/// Unwrap a required request field, recording "this field is required" when absent.
pub fn required(errors: &mut FieldErrors, field: &str, value: Option<String>) -> String {
    value.unwrap_or_else(|| {
        errors.add(field, "this field is required");
        String::new()
    })
}

/// Deserialize a field so that `null` becomes `Some(None)` and absence stays `None`.
/// Pair with `#[serde(default)]`.
pub fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    serde::Deserialize::deserialize(deserializer).map(Some)
}
