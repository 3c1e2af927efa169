//! Error types for the rosterhub domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all rosterhub operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Record store errors ---
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Failures raised by the record store and its durable mirror.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("{0}")]
    Validation(String),

    #[error("Student with ID '{student_id}' already exists")]
    Duplicate { student_id: String },

    #[error("Student with ID '{student_id}' not found")]
    NotFound { student_id: String },

    #[error("Failed to persist record snapshot: {0}")]
    Persistence(String),
}

/// Failures raised by the upstream completion provider.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),
}
