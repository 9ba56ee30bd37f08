//! # Error Types
//!
//! Domain-specific error types for stockroom-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  stockroom-core errors (this file)                                     │
//! │  ├── CoreError        - General domain errors                          │
//! │  ├── ValidationError  - Input validation failures                      │
//! │  └── HashError        - Credential hashing failures (auth module)      │
//! │                                                                         │
//! │  stockroom-db errors (separate crate)                                  │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  stockroom-client errors (separate crate)                              │
//! │  └── ClientError      - Remote call failures (rejection vs transport)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (id, field name, etc.)
//! 3. Errors are enum variants, never String

use thiserror::Error;

use crate::auth::HashError;

// =============================================================================
// Core Error
// =============================================================================

/// Core domain errors.
///
/// These represent business rule violations or domain logic failures and
/// should be translated to user-facing messages at the app boundary.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Item cannot be found.
    #[error("Item not found: {0}")]
    ItemNotFound(i64),

    /// Username is already taken.
    #[error("Username '{0}' already exists")]
    UsernameTaken(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Credential hashing failed; the credential operation must be aborted.
    #[error("Credential hashing failed: {0}")]
    Hash(#[from] HashError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when user input doesn't meet requirements. Used for early
/// validation before any store or network operation runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Password and confirmation do not match.
    #[error("Passwords do not match")]
    PasswordMismatch,
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            CoreError::ItemNotFound(42).to_string(),
            "Item not found: 42"
        );
        assert_eq!(
            ValidationError::Required {
                field: "username".to_string()
            }
            .to_string(),
            "username is required"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::PasswordMismatch;
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }

    #[test]
    fn test_hash_error_converts_to_core_error() {
        let hash_err = HashError::InvalidDigest {
            reason: "too short".to_string(),
        };
        let core_err: CoreError = hash_err.into();
        assert!(matches!(core_err, CoreError::Hash(_)));
    }
}
