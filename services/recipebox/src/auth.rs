//! Token authentication extractor.

use axum::extract::FromRequestParts;
use http::request::Parts;

use recipebox_auth_types::bearer::token_from_headers;

use crate::domain::types::User;
use crate::error::RecipeboxError;
use crate::state::AppState;
use crate::usecase::token::AuthenticateUseCase;

/// The active user behind the request's `Authorization: Token <key>` header.
///
/// Rejects with 401 when the header is missing or malformed, the key is
/// unknown, or the owner is inactive.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = RecipeboxError;

    // Read the header synchronously and return a 'static future; an
    // `async fn` here would capture `parts` and trip E0195.
    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let key = token_from_headers(&parts.headers).map(str::to_owned);
        let usecase = AuthenticateUseCase {
            users: state.user_repo(),
            tokens: state.token_repo(),
        };

        async move {
            let key = key.ok_or(RecipeboxError::Unauthorized)?;
            let user = usecase.execute(&key).await?;
            Ok(Self(user))
        }
    }
}
