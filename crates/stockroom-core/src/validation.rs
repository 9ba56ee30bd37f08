//! # Validation Module
//!
//! Input validation utilities for Stockroom.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Caller (CLI / screen)                                        │
//! │  ├── Basic format checks before any I/O                                │
//! │  └── Immediate user feedback, no retry                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Required fields, lengths, ranges                                  │
//! │  └── Password confirmation match                                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Store (SQLite / server)                                      │
//! │  ├── NOT NULL and UNIQUE constraints                                   │
//! │  └── CHECK (quantity >= 0)                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::{MAX_ITEM_NAME_LEN, MAX_ITEM_QUANTITY, MAX_PASSWORD_LEN, MAX_SEARCH_QUERY_LEN, MAX_USERNAME_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Credential Validators
// =============================================================================

/// Validates a username.
///
/// ## Rules
/// - Must not be empty after trimming
/// - Must be at most 50 characters
pub fn validate_username(username: &str) -> ValidationResult<()> {
    let username = username.trim();

    if username.is_empty() {
        return Err(ValidationError::Required {
            field: "username".to_string(),
        });
    }

    if username.len() > MAX_USERNAME_LEN {
        return Err(ValidationError::TooLong {
            field: "username".to_string(),
            max: MAX_USERNAME_LEN,
        });
    }

    Ok(())
}

/// Validates a password.
///
/// ## Rules
/// - Must not be empty after trimming
/// - Must be at most 128 characters
pub fn validate_password(password: &str) -> ValidationResult<()> {
    let password = password.trim();

    if password.is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        });
    }

    if password.len() > MAX_PASSWORD_LEN {
        return Err(ValidationError::TooLong {
            field: "password".to_string(),
            max: MAX_PASSWORD_LEN,
        });
    }

    Ok(())
}

/// Validates a full registration form.
///
/// Checks username, password, and that the confirmation matches. The match
/// check runs last so the user fixes emptiness first.
pub fn validate_registration(
    username: &str,
    password: &str,
    confirm_password: &str,
) -> ValidationResult<()> {
    validate_username(username)?;
    validate_password(password)?;

    if password != confirm_password {
        return Err(ValidationError::PasswordMismatch);
    }

    Ok(())
}

// =============================================================================
// Item Validators
// =============================================================================

/// Validates an item name.
pub fn validate_item_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > MAX_ITEM_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_ITEM_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates an item quantity.
///
/// ## Rules
/// - Must be non-negative (zero is a valid stock level)
/// - Must not exceed MAX_ITEM_QUANTITY
pub fn validate_quantity(quantity: i64) -> ValidationResult<()> {
    if !(0..=MAX_ITEM_QUANTITY).contains(&quantity) {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 0,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a search query.
///
/// ## Rules
/// - Can be empty (empty means "match all")
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.len() > MAX_SEARCH_QUERY_LEN {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: MAX_SEARCH_QUERY_LEN,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_username() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username("   ").is_err());
        assert!(validate_username(&"a".repeat(100)).is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("secret123").is_ok());
        assert!(validate_password("").is_err());
        assert!(validate_password(&"x".repeat(200)).is_err());
    }

    #[test]
    fn test_validate_registration() {
        assert!(validate_registration("alice", "secret123", "secret123").is_ok());
        assert_eq!(
            validate_registration("alice", "secret123", "secret124"),
            Err(ValidationError::PasswordMismatch)
        );
        // Empty fields are reported before the mismatch
        assert!(matches!(
            validate_registration("", "a", "b"),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_validate_item_name() {
        assert!(validate_item_name("Laptop").is_ok());
        assert!(validate_item_name("").is_err());
        assert!(validate_item_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(0).is_ok());
        assert!(validate_quantity(10).is_ok());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(MAX_ITEM_QUANTITY + 1).is_err());
    }

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query("").unwrap(), "");
        assert_eq!(validate_search_query("  laptop  ").unwrap(), "laptop");
        assert!(validate_search_query(&"q".repeat(200)).is_err());
    }
}
