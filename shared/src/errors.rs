//! Error types shared across the Foodgram crates

use thiserror::Error;

/// Authentication error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Missing authorization header")]
    MissingToken,

    #[error("Invalid authorization format")]
    InvalidScheme,
}

/// Errors raised while turning raw query parameters into typed filters
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("{field}: expected a non-negative integer")]
    NotAnInteger { field: String },

    #[error("{field}: expected one of 0, 1, true, false")]
    NotABoolean { field: String },

    #[error("{field}: invalid identifier")]
    InvalidId { field: String },
}

impl QueryError {
    /// Name of the offending query parameter
    pub fn field(&self) -> &str {
        match self {
            QueryError::NotAnInteger { field }
            | QueryError::NotABoolean { field }
            | QueryError::InvalidId { field } => field,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_error_field() {
        let err = QueryError::NotAnInteger {
            field: "recipes_limit".to_string(),
        };
        assert_eq!(err.field(), "recipes_limit");
        assert!(err.to_string().contains("non-negative integer"));
    }

    #[test]
    fn test_auth_error_messages() {
        assert_eq!(
            AuthError::MissingToken.to_string(),
            "Missing authorization header"
        );
        assert_eq!(AuthError::InvalidCredentials.to_string(), "Invalid credentials");
    }
}
