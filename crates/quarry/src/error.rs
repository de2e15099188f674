//! Error types for quarry

use thiserror::Error;

/// Result type alias for quarry operations
pub type QuarryResult<T> = Result<T, QuarryError>;

/// Opaque error raised by an [`Executor`](crate::Executor) implementation.
pub type ExecutorError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error types for building, executing and configuring queries
#[derive(Debug, Error)]
pub enum QuarryError {
    /// Invalid constructor arguments or missing component configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Builder used before a mandatory clause was provided
    #[error("Builder error: {0}")]
    Builder(String),

    /// Grid request referenced a column outside the whitelist
    #[error("Grid error: {0}")]
    Grid(String),

    /// Error reported by the database executor, passed through unchanged
    #[error("Executor error: {0}")]
    Executor(#[source] ExecutorError),

    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Record decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },
}

impl QuarryError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create a builder error
    pub fn builder(message: impl Into<String>) -> Self {
        Self::Builder(message.into())
    }

    /// Create a grid error
    pub fn grid(message: impl Into<String>) -> Self {
        Self::Grid(message.into())
    }

    /// Wrap an executor error without altering it
    pub fn executor(err: impl Into<ExecutorError>) -> Self {
        Self::Executor(err.into())
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Check if this is a configuration error
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Check if this is a builder error
    pub fn is_builder(&self) -> bool {
        matches!(self, Self::Builder(_))
    }

    /// Check if this is a grid error
    pub fn is_grid(&self) -> bool {
        matches!(self, Self::Grid(_))
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this is a decode error
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }
}

#[cfg(feature = "postgres")]
impl From<tokio_postgres::Error> for QuarryError {
    fn from(err: tokio_postgres::Error) -> Self {
        Self::Executor(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_executor_error_is_preserved() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "socket closed");
        let err = QuarryError::executor(io);
        match err {
            QuarryError::Executor(inner) => {
                let io = inner
                    .downcast_ref::<std::io::Error>()
                    .expect("original error type");
                assert_eq!(io.kind(), std::io::ErrorKind::BrokenPipe);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(
            QuarryError::builder("no target table").to_string(),
            "Builder error: no target table"
        );
        assert_eq!(
            QuarryError::decode("id", "expected integer").to_string(),
            "Decode error on column 'id': expected integer"
        );
    }
}
