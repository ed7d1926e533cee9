//! User account rules.

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 5;

/// Maximum stored email / name length, in characters.
pub const MAX_EMAIL_LEN: usize = 250;
pub const MAX_NAME_LEN: usize = 250;

/// Normalize an email address: trim surrounding whitespace and lower-case the
/// domain part. The local part is case-sensitive and kept as given.
///
/// ```
/// use recipebox_domain::user::normalize_email;
/// assert_eq!(normalize_email(" Peter@GMAIL.com "), "Peter@gmail.com");
/// assert_eq!(normalize_email("no-at-sign"), "no-at-sign");
/// ```
pub fn normalize_email(email: &str) -> String {
    let email = email.trim();
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{local}@{}", domain.to_lowercase()),
        None => email.to_owned(),
    }
}

/// Reasons an email is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EmailError {
    #[error("this field may not be blank")]
    Blank,
    #[error("enter a valid email address")]
    Invalid,
    #[error("ensure this field has no more than 250 characters")]
    TooLong,
}

/// Check an already-normalized email address.
pub fn validate_email(email: &str) -> Result<(), EmailError> {
    if email.is_empty() {
        return Err(EmailError::Blank);
    }
    if email.chars().count() > MAX_EMAIL_LEN {
        return Err(EmailError::TooLong);
    }
    let Some((local, domain)) = email.rsplit_once('@') else {
        return Err(EmailError::Invalid);
    };
    if local.is_empty()
        || domain.is_empty()
        || domain.starts_with('.')
        || domain.ends_with('.')
        || email.chars().any(char::is_whitespace)
    {
        return Err(EmailError::Invalid);
    }
    Ok(())
}

/// Reasons a password is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PasswordError {
    #[error("this field may not be blank")]
    Blank,
    #[error("ensure this field has at least 5 characters")]
    TooShort,
}

pub fn validate_password(password: &str) -> Result<(), PasswordError> {
    if password.is_empty() {
        return Err(PasswordError::Blank);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(PasswordError::TooShort);
    }
    Ok(())
}
