//! Error types for refactoring operations

use thiserror::Error;

/// Refactoring operation errors
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum HoistError {
    #[error("Parse error: {message}")]
    Parse { message: String },

    #[error("No expression found in the selected range")]
    ExpressionNotFound,

    #[error("Transformation error: {message}")]
    Transformation { message: String },
}

impl HoistError {
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    pub fn transformation(message: impl Into<String>) -> Self {
        Self::Transformation {
            message: message.into(),
        }
    }

    /// Whether this error is the normal "selection matched nothing" outcome
    /// rather than a parse or transformation fault.
    pub fn is_expression_not_found(&self) -> bool {
        matches!(self, Self::ExpressionNotFound)
    }
}

/// Result type alias for refactoring operations
pub type HoistResult<T> = Result<T, HoistError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helper_constructors() {
        let err = HoistError::parse("unexpected token");
        assert_eq!(err.to_string(), "Parse error: unexpected token");

        let err = HoistError::transformation("emit failed");
        assert_eq!(err.to_string(), "Transformation error: emit failed");
    }

    #[test]
    fn test_expression_not_found_is_distinguishable() {
        assert!(HoistError::ExpressionNotFound.is_expression_not_found());
        assert!(!HoistError::parse("x").is_expression_not_found());
        assert!(!HoistError::transformation("x").is_expression_not_found());
    }
}
