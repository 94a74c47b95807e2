//! Errors raised by mapper dispatch and by mapper implementations
//!
//! The dispatcher itself only ever produces argument errors (and, in strict
//! mode, materialization errors). Everything a resolved mapper returns is
//! handed back to the caller exactly as produced.

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MapperError {
    /// A required argument was absent; raised before any resolution happens
    #[error("Argument '{argument}' must not be null")]
    NullArgument { argument: &'static str },

    /// A dependency or mapper instance could not be produced
    #[error("Service unavailable: {service} ({reason})")]
    Unavailable { service: String, reason: String },

    /// A registered mapper could not be materialized (strict policy only)
    #[error("Failed to materialize mapper {mapper} for {pair}: {reason}")]
    Materialization {
        mapper: String,
        pair: String,
        reason: String,
    },

    /// A mapper implementation could not convert a field value
    ///
    /// The generic field copy never raises this; it skips fields that do not
    /// fit.
    #[error("Conversion failed for field '{field}': {reason}")]
    Conversion { field: String, reason: String },

    /// A value could not be serialized or deserialized, including a field
    /// copy target that cannot be rebuilt from its own serialized form
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A mapper implementation reported a failure
    #[error("Mapper {mapper} failed: {reason}")]
    Failed { mapper: String, reason: String },

    #[error("Mapping cancelled")]
    Cancelled,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl MapperError {
    /// Create a null argument error
    pub fn null_argument(argument: &'static str) -> Self {
        MapperError::NullArgument { argument }
    }

    /// Create an unavailable service error
    pub fn unavailable(service: impl Into<String>, reason: impl Into<String>) -> Self {
        MapperError::Unavailable {
            service: service.into(),
            reason: reason.into(),
        }
    }

    /// Create a materialization error
    pub fn materialization(
        mapper: impl Into<String>,
        pair: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        MapperError::Materialization {
            mapper: mapper.into(),
            pair: pair.into(),
            reason: reason.into(),
        }
    }

    /// Create a conversion error for a single field
    pub fn conversion(field: impl Into<String>, reason: impl Into<String>) -> Self {
        MapperError::Conversion {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a mapper failure
    pub fn failed(mapper: impl Into<String>, reason: impl Into<String>) -> Self {
        MapperError::Failed {
            mapper: mapper.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        MapperError::InvalidConfig(msg.into())
    }

    /// Check if this error was raised by argument validation
    pub fn is_argument_error(&self) -> bool {
        matches!(self, MapperError::NullArgument { .. })
    }

    /// Check if this error relates to producing a mapper rather than running one
    pub fn is_resolution_error(&self) -> bool {
        matches!(
            self,
            MapperError::Unavailable { .. } | MapperError::Materialization { .. }
        )
    }
}

impl From<serde_json::Error> for MapperError {
    fn from(err: serde_json::Error) -> Self {
        MapperError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for MapperError {
    fn from(err: std::io::Error) -> Self {
        MapperError::Io(err.to_string())
    }
}
