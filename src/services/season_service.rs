//! Error type for the season view chain.

use thiserror::Error;

/// Failures that end a season load.
///
/// A missing season folder is not an error: it selects default mapping.
#[derive(Debug, Error)]
pub enum SeasonError {
    #[error("No internet connection")]
    NoConnectivity,

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Invalid season data: {0}")]
    Conversion(String),

    #[error("Database error: {0}")]
    Database(String),
}

/// Store collaborators report `anyhow` errors.
impl From<anyhow::Error> for SeasonError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(format!("{err:#}"))
    }
}

impl From<serde_json::Error> for SeasonError {
    fn from(err: serde_json::Error) -> Self {
        Self::Conversion(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_connectivity_message() {
        assert_eq!(
            SeasonError::NoConnectivity.to_string(),
            "No internet connection"
        );
    }

    #[test]
    fn test_store_errors_keep_context() {
        let err = anyhow::anyhow!("database is locked").context("Failed to read watch rows");
        let err = SeasonError::from(err);
        assert!(matches!(err, SeasonError::Database(_)));
        assert_eq!(
            err.to_string(),
            "Database error: Failed to read watch rows: database is locked"
        );
    }

    #[test]
    fn test_conversion_from_json() {
        let err = serde_json::from_str::<i32>("nope").unwrap_err();
        assert!(matches!(SeasonError::from(err), SeasonError::Conversion(_)));
    }
}
