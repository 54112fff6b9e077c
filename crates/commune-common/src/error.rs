//! Centralized error types for the authority core.
//!
//! Uses `thiserror` for ergonomic error definitions. The taxonomy mirrors the
//! layers: local validation, authorization, and remote transport. A
//! half-completed ownership transfer is deliberately NOT an error here — it
//! is a distinct non-fatal outcome carried by the resolver's result type.

use serde::Serialize;

/// Core error type used across the Commune authority crates.
#[derive(Debug, thiserror::Error)]
pub enum CommuneError {
    // === Validation (local, synchronous) ===
    #[error("Validation failed: {message}")]
    Validation { message: String },

    #[error("Members cannot change their own role")]
    SelfAssignment,

    // === Authorization ===
    #[error("Insufficient authority: acting at power level {actor_level}, operation requires {required_level}")]
    InsufficientAuthority {
        actor_level: i64,
        required_level: i64,
    },

    // === Resources ===
    #[error("{resource} not found")]
    NotFound { resource: String },

    // === Remote collaborators ===
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl CommuneError {
    /// Error code string for programmatic handling by callers.
    pub fn error_code(&self) -> &str {
        match self {
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::SelfAssignment => "SELF_ASSIGNMENT",
            Self::InsufficientAuthority { .. } => "INSUFFICIENT_AUTHORITY",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Transport(_) => "TRANSPORT_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

/// Failure reported by a remote collaborator (membership store or moderation
/// transport): network faults, protocol-level permission denials,
/// concurrent-modification conflicts. Always caught at the resolver or
/// orchestrator boundary, never allowed to abort a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Convenience type alias for Results using CommuneError.
pub type CommuneResult<T> = Result<T, CommuneError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_are_stable() {
        let err = CommuneError::Validation {
            message: "empty target list".into(),
        };
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
        assert_eq!(CommuneError::SelfAssignment.error_code(), "SELF_ASSIGNMENT");

        let transport: CommuneError = TransportError::new("connection reset").into();
        assert_eq!(transport.error_code(), "TRANSPORT_ERROR");
        assert_eq!(transport.to_string(), "Transport error: connection reset");
    }
}
