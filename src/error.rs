//! Error types for AURA

use thiserror::Error;

/// Main error type for AURA
#[derive(Error, Debug)]
pub enum AuraError {
    // Negotiation errors
    #[error("No negotiation exists for user_id={0}")]
    NegotiationNotFound(String),

    #[error("Recovered total overflows adding {amount} for user_id={user_id}")]
    RecoveredOverflow { user_id: String, amount: u64 },

    // Session errors
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    // Configuration errors
    #[error("Invalid configuration value: {0}")]
    InvalidConfig(String),

    // General errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for AURA operations
pub type Result<T> = std::result::Result<T, AuraError>;
