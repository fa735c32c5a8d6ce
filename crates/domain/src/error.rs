//! Unified error type for the domain layer.
//!
//! Lookup misses are modeled as `Option::None` throughout this crate; errors
//! are reserved for inputs that cannot be interpreted at all.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Parse error (for value objects and identifiers)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl DomainError {
    /// Creates a parse error for string-to-type conversion failures.
    ///
    /// Use this in `FromStr` implementations when the input string doesn't
    /// match any known variant or format.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = DomainError::parse("unknown item kind: wonders");
        assert_eq!(err.to_string(), "Parse error: unknown item kind: wonders");
    }
}
