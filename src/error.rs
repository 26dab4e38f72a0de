//! Error types and handling for the ski touring planner

use thiserror::Error;

/// Main error type for the planner
#[derive(Error, Debug)]
pub enum SkiTourError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Invalid profile or search parameters, rejected before any scoring
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Malformed destination entry in the catalog
    #[error("Invalid catalog entry '{destination}': {message}")]
    Catalog {
        destination: String,
        message: String,
    },

    /// Transient failure of a data provider (network, timeout, bad payload)
    #[error("{provider} provider failed: {message}")]
    Provider { provider: String, message: String },

    /// A lookup that the caller required to succeed found nothing
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// The on-disk reading cache could not be opened, read or written
    #[error("Cache error: {message}")]
    Cache { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// JSON encoding or decoding errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },

    /// General application errors
    #[error("Application error: {message}")]
    General { message: String },
}

impl SkiTourError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new catalog validation error for the named destination
    pub fn catalog<D: Into<String>, S: Into<String>>(destination: D, message: S) -> Self {
        Self::Catalog {
            destination: destination.into(),
            message: message.into(),
        }
    }

    /// Create a new provider failure
    pub fn provider<P: Into<String>, S: Into<String>>(provider: P, message: S) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a new not-found error
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a new cache error
    pub fn cache<S: Into<String>>(message: S) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    /// Create a new general error
    pub fn general<S: Into<String>>(message: S) -> Self {
        Self::General {
            message: message.into(),
        }
    }

    /// Whether the caller may treat this failure as "no data" and carry on
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Provider { .. })
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            SkiTourError::Config { .. } => {
                "Configuration error. Please check your config file and environment.".to_string()
            }
            SkiTourError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            SkiTourError::Catalog {
                destination,
                message,
            } => {
                format!("The destination catalog is broken at '{destination}': {message}")
            }
            SkiTourError::Provider { provider, .. } => {
                format!("The {provider} data source is unavailable right now.")
            }
            SkiTourError::NotFound { message } => message.clone(),
            SkiTourError::Cache { .. } => {
                "The reading cache is unusable. Delete the cache directory and retry.".to_string()
            }
            SkiTourError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
            SkiTourError::Serialization { .. } => {
                "A data file could not be read. Please check that it is valid JSON.".to_string()
            }
            SkiTourError::General { message } => message.clone(),
        }
    }
}
