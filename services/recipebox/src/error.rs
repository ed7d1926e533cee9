use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use recipebox_core::error::{FieldErrors, error_response};

/// Recipebox service error variants.
#[derive(Debug, thiserror::Error)]
pub enum RecipeboxError {
    #[error("authentication credentials were not provided or are invalid")]
    Unauthorized,
    #[error("you do not have permission to perform this action")]
    Forbidden,
    #[error("unable to authenticate with provided credentials")]
    InvalidCredentials,
    #[error("user with this email already exists")]
    UserAlreadyExists,
    #[error("invalid input: {0}")]
    Validation(FieldErrors),
    #[error("malformed request: {0}")]
    MalformedRequest(String),
    #[error("user not found")]
    UserNotFound,
    #[error("tag not found")]
    TagNotFound,
    #[error("ingredient not found")]
    IngredientNotFound,
    #[error("recipe not found")]
    RecipeNotFound,
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl RecipeboxError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::UserAlreadyExists => "USER_ALREADY_EXISTS",
            Self::Validation(_) => "VALIDATION",
            Self::MalformedRequest(_) => "MALFORMED_REQUEST",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::TagNotFound => "TAG_NOT_FOUND",
            Self::IngredientNotFound => "INGREDIENT_NOT_FOUND",
            Self::RecipeNotFound => "RECIPE_NOT_FOUND",
            Self::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Validation failure on a single field.
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        Self::Validation(FieldErrors::single(field, message))
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::InvalidCredentials
            | Self::UserAlreadyExists
            | Self::Validation(_)
            | Self::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            Self::UserNotFound
            | Self::TagNotFound
            | Self::IngredientNotFound
            | Self::RecipeNotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<FieldErrors> for RecipeboxError {
    fn from(errors: FieldErrors) -> Self {
        Self::Validation(errors)
    }
}

impl From<JsonRejection> for RecipeboxError {
    fn from(rejection: JsonRejection) -> Self {
        Self::MalformedRequest(rejection.body_text())
    }
}

impl From<PathRejection> for RecipeboxError {
    fn from(rejection: PathRejection) -> Self {
        Self::MalformedRequest(rejection.body_text())
    }
}

impl From<MultipartRejection> for RecipeboxError {
    fn from(rejection: MultipartRejection) -> Self {
        Self::MalformedRequest(rejection.body_text())
    }
}

impl From<MultipartError> for RecipeboxError {
    fn from(error: MultipartError) -> Self {
        Self::MalformedRequest(error.body_text())
    }
}

impl IntoResponse for RecipeboxError {
    fn into_response(self) -> Response {
        let status = self.status();
        // Log 500s only. TraceLayer already records method/uri/status for every request.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %format!("{e:#}"), kind = "INTERNAL", "internal error");
        }
        match self {
            Self::Validation(ref fields) => {
                error_response(status, self.kind(), "invalid input".to_owned(), Some(fields))
            }
            _ => error_response(status, self.kind(), self.to_string(), None),
        }
    }
}
