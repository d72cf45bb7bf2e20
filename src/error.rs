//! # Error Types
//!
//! Structured error handling for timeline and dependency-graph requests using
//! thiserror. Parse-level failures are recovered locally by the graph extractor;
//! everything else propagates to the request boundary.

use thiserror::Error;

use crate::config::ConfigurationError;

/// Crate-wide error type
#[derive(Error, Debug)]
pub enum TimelineError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    #[error("Skipped unit {unit}: {reason}")]
    ParseSkipped { unit: String, reason: String },

    #[error("Storage unavailable during {operation}: {message}")]
    UpstreamUnavailable { operation: String, message: String },

    #[error("Invalid date '{input}': {reason}")]
    InvalidDate { input: String, reason: String },

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
}

impl TimelineError {
    /// Create a not-found error for an entity
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Create a parse-skipped error for a unit
    pub fn parse_skipped(unit: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ParseSkipped {
            unit: unit.into(),
            reason: reason.into(),
        }
    }

    /// Create an upstream-unavailable error
    pub fn upstream(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::UpstreamUnavailable {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Create an invalid-date error
    pub fn invalid_date(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDate {
            input: input.into(),
            reason: reason.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_upstream_unavailable(&self) -> bool {
        matches!(self, Self::UpstreamUnavailable { .. })
    }
}

impl From<sqlx::Error> for TimelineError {
    fn from(err: sqlx::Error) -> Self {
        Self::upstream("query", err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TimelineError>;
