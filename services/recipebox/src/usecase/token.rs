use chrono::Utc;

use recipebox_auth_types::password::PasswordHasher;
use recipebox_auth_types::token::{generate_token_key, is_well_formed};
use recipebox_core::error::FieldErrors;
use recipebox_domain::user::normalize_email;

use crate::domain::repository::{TokenRepository, UserRepository};
use crate::domain::types::{AuthToken, User};
use crate::error::RecipeboxError;
use crate::usecase::user::verify_password;

// ── IssueToken ───────────────────────────────────────────────────────────────

pub struct IssueTokenInput {
    pub email: String,
    pub password: String,
}

pub struct IssueTokenUseCase<U, T>
where
    U: UserRepository,
    T: TokenRepository,
{
    pub users: U,
    pub tokens: T,
    pub hasher: PasswordHasher,
}

impl<U, T> IssueTokenUseCase<U, T>
where
    U: UserRepository,
    T: TokenRepository,
{
    /// Exchange credentials for the user's token, creating it on first use.
    pub async fn execute(&self, input: IssueTokenInput) -> Result<AuthToken, RecipeboxError> {
        let mut errors = FieldErrors::new();
        if input.email.trim().is_empty() {
            errors.add("email", "this field may not be blank");
        }
        if input.password.is_empty() {
            errors.add("password", "this field may not be blank");
        }
        errors.into_result()?;

        let user = self
            .users
            .find_by_email(&normalize_email(&input.email))
            .await?
            .ok_or(RecipeboxError::InvalidCredentials)?;
        if !user.is_active {
            return Err(RecipeboxError::InvalidCredentials);
        }
        if !verify_password(self.hasher, input.password, user.password.clone()).await? {
            return Err(RecipeboxError::InvalidCredentials);
        }

        if let Some(token) = self.tokens.find_by_user(user.id).await? {
            return Ok(token);
        }
        let token = AuthToken {
            key: generate_token_key(),
            user_id: user.id,
            created_at: Utc::now(),
        };
        if self.tokens.create(&token).await? {
            return Ok(token);
        }
        // A concurrent request created one first.
        self.tokens
            .find_by_user(user.id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("token vanished after conflict").into())
    }
}

// ── Authenticate ─────────────────────────────────────────────────────────────

pub struct AuthenticateUseCase<U, T>
where
    U: UserRepository,
    T: TokenRepository,
{
    pub users: U,
    pub tokens: T,
}

impl<U, T> AuthenticateUseCase<U, T>
where
    U: UserRepository,
    T: TokenRepository,
{
    /// Resolve a token key to its active owner.
    pub async fn execute(&self, key: &str) -> Result<User, RecipeboxError> {
        if !is_well_formed(key) {
            return Err(RecipeboxError::Unauthorized);
        }
        let token = self
            .tokens
            .find_by_key(key)
            .await?
            .ok_or(RecipeboxError::Unauthorized)?;
        let user = self
            .users
            .find_by_id(token.user_id)
            .await?
            .ok_or(RecipeboxError::Unauthorized)?;
        if !user.is_active {
            return Err(RecipeboxError::Unauthorized);
        }
        Ok(user)
    }
}
