//! Errors in the library.
use thiserror::Error;

/// Errors in the library.
///
/// Every variant signals a wiring or programming mistake; none of them is
/// retried anywhere in the library.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SoloError {
    /// An invalid configuration value, detected at construction.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Labels, space dimensionality and computed values of an observation disagree.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A factory was queried without any registered component.
    #[error("Empty registry: {0}")]
    EmptyRegistry(String),

    /// The physics session was accessed after it had been released.
    #[error("Physics session is not available: {0}")]
    SessionClosed(String),

    /// A failure reported by the physics backend.
    #[error("Backend error: {0}")]
    Backend(String),

    /// No environment is registered under the given id.
    #[error("Unknown environment id: {0}")]
    UnknownEnv(String),

    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKey(String),

    /// Record value type error.
    #[error("Record value type error: {0}")]
    RecordValueType(String),
}
