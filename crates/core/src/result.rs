//! The normalized outcome of a completion-gateway call.
//!
//! Whatever the upstream provider answers — success, provider-reported error,
//! transport failure, or nothing configured at all — callers see exactly one
//! of these two shapes.

use crate::error::ProviderError;
use serde::{Deserialize, Serialize};

/// Provider-agnostic classification of a failed completion call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// No upstream credential is configured.
    ConfigurationMissing,
    /// The provider answered with a non-success status.
    UpstreamRejected,
    /// The request could not be completed (DNS, connect, read failure).
    UpstreamUnreachable,
}

/// The normalized result of one completion call.
///
/// The HTTP layer owns the `{success: true/false}` wire shape; this enum is
/// the in-process representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ProviderResult {
    /// The provider answered; `message` is the completion text.
    Success { message: String },

    /// The call failed; `detail` is drawn from the provider's own error
    /// message when one was available.
    Failure {
        kind: FailureKind,
        /// The upstream HTTP status, when the provider reported one.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        status: Option<u16>,
        detail: String,
    },
}

impl ProviderResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ProviderResult::Success { .. })
    }
}

impl From<ProviderError> for ProviderResult {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::NotConfigured(detail) => ProviderResult::Failure {
                kind: FailureKind::ConfigurationMissing,
                status: None,
                detail,
            },
            ProviderError::ApiError {
                status_code,
                message,
            } => ProviderResult::Failure {
                kind: FailureKind::UpstreamRejected,
                status: Some(status_code),
                detail: message,
            },
            ProviderError::Network(detail) => ProviderResult::Failure {
                kind: FailureKind::UpstreamUnreachable,
                status: None,
                detail,
            },
        }
    }
}
