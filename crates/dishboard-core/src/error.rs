// Error types for the dashboard pipeline

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, DashboardError>;

/// Errors that can occur in the pipeline and its collaborators
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Admin feed transport or handshake error
    #[error("Feed error: {0}")]
    Feed(String),

    /// Chart API error (application envelope or transport)
    #[error("Chart error: {0}")]
    Chart(String),

    /// Preference store error
    #[error("Store error: {0}")]
    Store(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl DashboardError {
    /// Create a feed error
    pub fn feed(msg: impl Into<String>) -> Self {
        DashboardError::Feed(msg.into())
    }

    /// Create a chart error
    pub fn chart(msg: impl Into<String>) -> Self {
        DashboardError::Chart(msg.into())
    }

    /// Create a preference store error
    pub fn store(msg: impl Into<String>) -> Self {
        DashboardError::Store(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        DashboardError::Configuration(msg.into())
    }
}
