//! Comma separated id lists, e.g. `?ids=3,1,3,7`.

use std::collections::HashSet;

use crate::error::ParseIdsError;

/// Parse a comma separated list of `i64` ids.
///
/// An empty string yields an empty list. Duplicate segments are skipped and
/// the order of first occurrence is kept. Any segment that is not an integer
/// fails the whole list.
///
/// # Example
///
/// ```
/// use jsonapi_axum_core::parse_ids;
///
/// assert_eq!(parse_ids("3,1,3").unwrap(), vec![3, 1]);
/// assert!(parse_ids("").unwrap().is_empty());
/// assert!(parse_ids("1,two").is_err());
/// ```
pub fn parse_ids(value: &str) -> Result<Vec<i64>, ParseIdsError> {
    if value.is_empty() {
        return Ok(Vec::new());
    }

    let mut seen = HashSet::new();
    let mut ids = Vec::new();
    for segment in value.split(',') {
        if !seen.insert(segment) {
            continue;
        }
        let id = segment
            .parse::<i64>()
            .map_err(|e| ParseIdsError::new(segment, e))?;
        ids.push(id);
    }
    Ok(ids)
}

/// Alias of [`parse_ids`].
#[deprecated(note = "use `parse_ids` instead")]
pub fn get_id(value: &str) -> Result<Vec<i64>, ParseIdsError> {
    parse_ids(value)
}
