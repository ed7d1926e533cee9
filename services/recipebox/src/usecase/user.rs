use anyhow::Context as _;
use chrono::Utc;
use uuid::Uuid;

use recipebox_auth_types::password::PasswordHasher;
use recipebox_core::error::FieldErrors;
use recipebox_domain::user::{MAX_NAME_LEN, normalize_email, validate_email, validate_password};

use crate::domain::repository::UserRepository;
use crate::domain::types::User;
use crate::error::RecipeboxError;

/// Hash on the blocking pool; bcrypt is deliberately slow.
pub async fn hash_password(
    hasher: PasswordHasher,
    password: String,
) -> Result<String, RecipeboxError> {
    let hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
        .await
        .context("join password hashing task")?
        .context("hash password")?;
    Ok(hash)
}

pub async fn verify_password(
    hasher: PasswordHasher,
    password: String,
    hash: String,
) -> Result<bool, RecipeboxError> {
    let matches = tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
        .await
        .context("join password verification task")?
        .context("verify password")?;
    Ok(matches)
}

fn check_email(raw: &str, errors: &mut FieldErrors) -> String {
    let email = normalize_email(raw);
    if let Err(e) = validate_email(&email) {
        errors.add("email", e.to_string());
    }
    email
}

fn check_password(password: &str, errors: &mut FieldErrors) {
    if let Err(e) = validate_password(password) {
        errors.add("password", e.to_string());
    }
}

fn check_name(raw: &str, errors: &mut FieldErrors) -> String {
    let name = raw.trim();
    if name.is_empty() {
        errors.add("name", "this field may not be blank");
    } else if name.chars().count() > MAX_NAME_LEN {
        errors.add("name", "ensure this field has no more than 250 characters");
    }
    name.to_owned()
}

async fn insert_user<R: UserRepository>(
    repo: &R,
    hasher: PasswordHasher,
    email: String,
    password: String,
    name: String,
    is_staff: bool,
    is_superuser: bool,
) -> Result<User, RecipeboxError> {
    if repo.find_by_email(&email).await?.is_some() {
        return Err(RecipeboxError::UserAlreadyExists);
    }
    let now = Utc::now();
    let user = User {
        id: Uuid::now_v7(),
        email,
        password: hash_password(hasher, password).await?,
        name,
        is_active: true,
        is_staff,
        is_superuser,
        created_at: now,
        updated_at: now,
    };
    repo.create(&user).await?;
    Ok(user)
}

// ── CreateUser ───────────────────────────────────────────────────────────────

pub struct CreateUserInput {
    pub email: String,
    pub password: String,
    pub name: String,
}

pub struct CreateUserUseCase<R: UserRepository> {
    pub repo: R,
    pub hasher: PasswordHasher,
}

impl<R: UserRepository> CreateUserUseCase<R> {
    pub async fn execute(&self, input: CreateUserInput) -> Result<User, RecipeboxError> {
        let mut errors = FieldErrors::new();
        let email = check_email(&input.email, &mut errors);
        check_password(&input.password, &mut errors);
        let name = check_name(&input.name, &mut errors);
        errors.into_result()?;

        insert_user(&self.repo, self.hasher, email, input.password, name, false, false).await
    }
}

// ── CreateSuperuser ──────────────────────────────────────────────────────────

pub struct CreateSuperuserUseCase<R: UserRepository> {
    pub repo: R,
    pub hasher: PasswordHasher,
}

impl<R: UserRepository> CreateSuperuserUseCase<R> {
    /// Staff + superuser account. Name may be blank; password rules still apply.
    pub async fn execute(&self, email: &str, password: &str) -> Result<User, RecipeboxError> {
        let mut errors = FieldErrors::new();
        let email = check_email(email, &mut errors);
        check_password(password, &mut errors);
        errors.into_result()?;

        insert_user(
            &self.repo,
            self.hasher,
            email,
            password.to_owned(),
            String::new(),
            true,
            true,
        )
        .await
    }
}

// ── UpdateMe ─────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct UpdateMeInput {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

pub struct UpdateMeUseCase<R: UserRepository> {
    pub repo: R,
    pub hasher: PasswordHasher,
}

impl<R: UserRepository> UpdateMeUseCase<R> {
    /// Apply the supplied fields to `user`. An empty input returns it unchanged.
    pub async fn execute(&self, mut user: User, input: UpdateMeInput) -> Result<User, RecipeboxError> {
        if input.email.is_none() && input.password.is_none() && input.name.is_none() {
            return Ok(user);
        }

        let mut errors = FieldErrors::new();
        let email = input.email.as_deref().map(|e| check_email(e, &mut errors));
        if let Some(ref password) = input.password {
            check_password(password, &mut errors);
        }
        let name = input.name.as_deref().map(|n| check_name(n, &mut errors));
        errors.into_result()?;

        if let Some(email) = email {
            if email != user.email {
                if self.repo.find_by_email(&email).await?.is_some() {
                    return Err(RecipeboxError::UserAlreadyExists);
                }
                user.email = email;
            }
        }
        if let Some(name) = name {
            user.name = name;
        }
        if let Some(password) = input.password {
            user.password = hash_password(self.hasher, password).await?;
        }
        user.updated_at = Utc::now();
        self.repo.update_profile(&user).await?;
        Ok(user)
    }
}

// ── Admin ────────────────────────────────────────────────────────────────────

fn require_staff(actor: &User) -> Result<(), RecipeboxError> {
    if actor.is_staff {
        Ok(())
    } else {
        Err(RecipeboxError::Forbidden)
    }
}

pub struct ListUsersUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> ListUsersUseCase<R> {
    pub async fn execute(&self, actor: &User) -> Result<Vec<User>, RecipeboxError> {
        require_staff(actor)?;
        self.repo.list().await
    }
}

pub struct GetUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> GetUserUseCase<R> {
    pub async fn execute(&self, actor: &User, id: Uuid) -> Result<User, RecipeboxError> {
        require_staff(actor)?;
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(RecipeboxError::UserNotFound)
    }
}

pub struct AdminCreateUserInput {
    pub email: String,
    pub password: String,
    pub name: String,
    pub is_staff: bool,
    pub is_superuser: bool,
}

pub struct AdminCreateUserUseCase<R: UserRepository> {
    pub repo: R,
    pub hasher: PasswordHasher,
}

impl<R: UserRepository> AdminCreateUserUseCase<R> {
    /// Name may be blank. A superuser is always staff.
    pub async fn execute(
        &self,
        actor: &User,
        input: AdminCreateUserInput,
    ) -> Result<User, RecipeboxError> {
        require_staff(actor)?;

        let mut errors = FieldErrors::new();
        let email = check_email(&input.email, &mut errors);
        check_password(&input.password, &mut errors);
        let name = if input.name.trim().is_empty() {
            String::new()
        } else {
            check_name(&input.name, &mut errors)
        };
        errors.into_result()?;

        insert_user(
            &self.repo,
            self.hasher,
            email,
            input.password,
            name,
            input.is_staff || input.is_superuser,
            input.is_superuser,
        )
        .await
    }
}
