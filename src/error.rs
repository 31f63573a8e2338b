//! Error types for Quintaesencia.

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Profile store errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Document {collection}/{key} is not a JSON object")]
    NotAnObject { collection: String, key: String },

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Identity provider errors.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("Identity provider closed before resolving a subject")]
    Closed,

    #[error("{0}")]
    InvalidCredentials(String),
}

/// A step's required field is missing. The message is user-facing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    pub step: u8,
    pub message: &'static str,
}

/// Onboarding wizard errors.
#[derive(Debug, thiserror::Error)]
pub enum OnboardingError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("No authenticated subject")]
    NotAuthenticated,

    #[error("Commit is only possible from the summary step (current step {step})")]
    NotAtSummary { step: u8 },

    #[error("A save is already in progress")]
    SaveInProgress,

    #[error("Profile write failed: {0}")]
    Persistence(#[from] StoreError),

    #[error("Save task ended before reporting a result: {0}")]
    Detached(String),
}
