//! Query-string filter parsing for list endpoints.

/// A value in a comma-separated id list was not an integer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected a comma-separated list of ids, got {0:?}")]
pub struct ParseIdListError(pub String);

/// Parse a comma-separated list of ids such as `"1, 2,3"`.
///
/// Whitespace around items is ignored, as are empty items, so `""` yields an
/// empty list. Duplicates are removed; order of first appearance is kept.
///
/// ```
/// use recipebox_domain::filter::parse_id_list;
/// assert_eq!(parse_id_list("3, 1,3").unwrap(), vec![3, 1]);
/// assert!(parse_id_list("1,x").is_err());
/// ```
pub fn parse_id_list(raw: &str) -> Result<Vec<i32>, ParseIdListError> {
    let mut ids = Vec::new();
    for item in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let id: i32 = item
            .parse()
            .map_err(|_| ParseIdListError(item.to_owned()))?;
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    Ok(ids)
}

/// A boolean query flag could not be interpreted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected 0 or 1, got {0:?}")]
pub struct ParseFlagError(pub String);

/// Parse a boolean query flag such as `assigned_only`.
///
/// Integers are truthy when non-zero; `true`/`false` are accepted as well.
/// An empty value means "not set".
pub fn parse_flag(raw: &str) -> Result<bool, ParseFlagError> {
    let value = raw.trim();
    if value.is_empty() {
        return Ok(false);
    }
    if let Ok(n) = value.parse::<i64>() {
        return Ok(n != 0);
    }
    match value.to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseFlagError(value.to_owned())),
    }
}
