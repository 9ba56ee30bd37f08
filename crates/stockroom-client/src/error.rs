//! # Client Error Types
//!
//! Error types for remote calls, the search pipeline, and configuration.
//!
//! ## Error Taxonomy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Client Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Rejection     │  │      Transport          │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidBaseUrl │  │  Rejected       │  │  Transport              │ │
//! │  │  InvalidConfig  │  │  (server spoke, │  │  (no response reached:  │ │
//! │  │                 │  │   said no)      │  │   DNS, refused, timeout)│ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐                              │
//! │  │     Session     │  │     Payload     │                              │
//! │  │                 │  │                 │                              │
//! │  │ NotAuthenticated│  │  Decode         │                              │
//! │  └─────────────────┘  │  Store (local)  │                              │
//! │                       └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A structured rejection is NOT a transport failure: the server responded
//! and supplied a message, which is surfaced verbatim. A transport failure
//! gets a generic network message. Callers must not conflate the two.

use thiserror::Error;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Client error type covering remote calls, local sources, and config.
#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// The API base URL could not be parsed or has an unsupported scheme.
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),

    /// Invalid client configuration.
    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),

    // =========================================================================
    // Session Errors
    // =========================================================================
    /// An authenticated call was attempted without a logged-in session.
    #[error("Not authenticated. Log in first.")]
    NotAuthenticated,

    // =========================================================================
    // Remote Call Errors
    // =========================================================================
    /// The server responded with a structured failure (non-2xx status or a
    /// `success: false` envelope). Carries the server's own message.
    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// No usable response reached us (connection refused, DNS, timeout).
    #[error("Network error: {0}")]
    Transport(String),

    /// The response arrived but its body could not be decoded.
    #[error("Malformed server response: {0}")]
    Decode(String),

    // =========================================================================
    // Local Source Errors
    // =========================================================================
    /// The local SQLite-backed item source failed.
    #[error("Local store error: {0}")]
    Store(String),
}

impl ClientError {
    /// Returns true if this is a transport-level failure (no response).
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport(_))
    }

    /// Returns true if the server responded and rejected the request.
    pub fn is_rejection(&self) -> bool {
        matches!(self, ClientError::Rejected { .. })
    }
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            // connect, timeout, request construction, redirect loops: the
            // request never produced a usable response
            ClientError::Transport(err.to_string())
        }
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidBaseUrl(err.to_string())
    }
}

impl From<stockroom_db::DbError> for ClientError {
    fn from(err: stockroom_db::DbError) -> Self {
        ClientError::Store(err.to_string())
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::InvalidConfig(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::InvalidConfig(err.to_string())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_is_not_transport() {
        let rejected = ClientError::Rejected {
            status: 401,
            message: "Invalid credentials".into(),
        };
        assert!(rejected.is_rejection());
        assert!(!rejected.is_transport());

        let transport = ClientError::Transport("connection refused".into());
        assert!(transport.is_transport());
        assert!(!transport.is_rejection());
    }

    #[test]
    fn test_rejection_surfaces_server_message() {
        let err = ClientError::Rejected {
            status: 409,
            message: "Username already exists".into(),
        };
        assert!(err.to_string().contains("Username already exists"));
        assert!(err.to_string().contains("409"));
    }
}
