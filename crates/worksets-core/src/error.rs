//! Error types for worksets.

use thiserror::Error;

/// The shared error type for the worksets crates.
///
/// Validation problems are never reported through this type: the validator
/// repairs or drops bad data and logs what it did. These variants cover the
/// things that cannot be repaired, such as an unreadable disk or a caller
/// breaking an API contract.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorksetsError {
    /// A named record or stored file does not exist.
    #[error("{entity_type} not found: '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// File system failure.
    #[error("IO error: {message}")]
    Io { message: String },

    /// Encoding or decoding failure.
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Invalid or unreadable configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A helper binary failed its hash or permission checks.
    #[error("Integrity error: {0}")]
    Integrity(String),

    /// The requested change collides with existing state (duplicate names, last workset).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A caller passed arguments that break an API precondition.
    #[error("Contract violation: {0}")]
    Contract(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl WorksetsError {
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    pub fn serialization(format: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Serialization {
            format: format.into(),
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn integrity(message: impl Into<String>) -> Self {
        Self::Integrity(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn contract(message: impl Into<String>) -> Self {
        Self::Contract(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }

    pub fn is_contract(&self) -> bool {
        matches!(self, Self::Contract(_))
    }
}

impl From<std::io::Error> for WorksetsError {
    fn from(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            return Self::not_found("file", err.to_string());
        }
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for WorksetsError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization("JSON", err.to_string())
    }
}

impl From<toml::de::Error> for WorksetsError {
    fn from(err: toml::de::Error) -> Self {
        Self::serialization("TOML", err.to_string())
    }
}

impl From<toml::ser::Error> for WorksetsError {
    fn from(err: toml::ser::Error) -> Self {
        Self::serialization("TOML", err.to_string())
    }
}

impl From<anyhow::Error> for WorksetsError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, WorksetsError>`.
pub type Result<T> = std::result::Result<T, WorksetsError>;
