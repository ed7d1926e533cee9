//! Free-text field rules (titles, tag and ingredient names).

/// Maximum stored length of names and titles, in characters.
pub const MAX_TEXT_LEN: usize = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TextError {
    #[error("this field may not be blank")]
    Blank,
    #[error("ensure this field has no more than 255 characters")]
    TooLong,
}

/// Trim surrounding whitespace and check a required text field.
///
/// ```
/// use recipebox_domain::text::{required_text, TextError};
/// assert_eq!(required_text("  Vegan "), Ok("Vegan".to_owned()));
/// assert_eq!(required_text("   "), Err(TextError::Blank));
/// ```
pub fn required_text(raw: &str) -> Result<String, TextError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TextError::Blank);
    }
    if trimmed.chars().count() > MAX_TEXT_LEN {
        return Err(TextError::TooLong);
    }
    Ok(trimmed.to_owned())
}

/// Trim an optional text field; blank collapses to `None`.
pub fn optional_text(raw: Option<&str>) -> Result<Option<String>, TextError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) if s.chars().count() > MAX_TEXT_LEN => Err(TextError::TooLong),
        Some(s) => Ok(Some(s.to_owned())),
    }
}
