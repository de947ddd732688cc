use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Live source query failed ({status}): {message}")]
    QueryError { status: u16, message: String },

    #[error("Could not decode rows from '{table}': {message}")]
    DecodeError { table: String, message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field} ('{value}'): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Live source is not configured")]
    SourceUnavailable,
}

impl ContentError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }

    /// Short message suitable for showing back to an admin form.
    pub fn user_message(&self) -> String {
        match self {
            Self::Unauthorized => "Unauthorized".to_string(),
            Self::ValidationError { message } => message.clone(),
            Self::QueryError { message, .. } => message.clone(),
            Self::SourceUnavailable => "Content backend is not configured".to_string(),
            other => other.to_string(),
        }
    }

    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigError { .. }
                | Self::InvalidConfigValueError { .. }
                | Self::MissingConfigError { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ContentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_hides_status() {
        let err = ContentError::QueryError {
            status: 409,
            message: "duplicate key value violates unique constraint".to_string(),
        };
        assert_eq!(
            err.user_message(),
            "duplicate key value violates unique constraint"
        );
        assert!(err.to_string().contains("409"));
    }

    #[test]
    fn test_config_error_classification() {
        assert!(ContentError::MissingConfigError {
            field: "source.url".to_string()
        }
        .is_config_error());
        assert!(!ContentError::Unauthorized.is_config_error());
    }
}
