//! Utility functions for the search sync repository.

use crate::errors::SearchSyncError;

/// Validate a SQL identifier (table or column name).
///
/// Identifiers are interpolated into queries, so they must contain only
/// alphanumeric characters and underscores.
///
/// # Arguments
///
/// * `kind` - What the identifier names, used in the error message
/// * `identifier` - The identifier to validate
///
/// # Returns
///
/// * `Ok(())` - If the identifier is valid
/// * `Err(SearchSyncError::Precondition)` - If it is empty or has invalid characters
///
/// # Example
///
/// ```
/// use search_sync_repository::validate_identifier;
///
/// assert!(validate_identifier("table", "blog_posts").is_ok());
/// assert!(validate_identifier("table", "posts; DROP TABLE users").is_err());
/// ```
pub fn validate_identifier(kind: &str, identifier: &str) -> Result<(), SearchSyncError> {
    if identifier.is_empty() {
        return Err(SearchSyncError::precondition(format!(
            "{} name cannot be empty",
            kind
        )));
    }

    if !identifier.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(SearchSyncError::precondition(format!(
            "{} name '{}' contains invalid characters. Only alphanumeric characters and underscores are allowed",
            kind, identifier
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_identifier() {
        assert!(validate_identifier("column", "id").is_ok());
        assert!(validate_identifier("table", "Posts_2024").is_ok());
    }

    #[test]
    fn test_validate_identifier_empty() {
        assert!(matches!(
            validate_identifier("column", ""),
            Err(SearchSyncError::Precondition(_))
        ));
    }

    #[test]
    fn test_validate_identifier_invalid_characters() {
        for bad in ["posts.id", "posts id", "id\"", "posts;--", "pöst"] {
            assert!(
                validate_identifier("table", bad).is_err(),
                "{} should be rejected",
                bad
            );
        }
    }
}
