//! Error taxonomy for statusgate.

/// Invalid or missing inputs, detected before the first polling attempt.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("token is required")]
    MissingToken,

    #[error("no commit given and none could be resolved from the environment")]
    MissingRevision,

    #[error("repository is required (expected owner/name)")]
    MissingRepository,

    #[error("invalid repository '{0}' (expected owner/name)")]
    InvalidRepository(String),

    #[error("{field} must be an integer, got '{value}'")]
    InvalidNumber { field: &'static str, value: String },

    #[error("{field} is out of range, got '{value}'")]
    OutOfRange { field: &'static str, value: String },

    #[error("{field} must be greater than zero")]
    NonPositive { field: &'static str },

    #[error("invalid ignore pattern '{pattern}': {reason}")]
    InvalidIgnorePattern { pattern: String, reason: String },
}

/// Failure talking to the hosting platform. Never retried.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("{url} returned HTTP {status}: {body}")]
    Status {
        status: u16,
        url: String,
        body: String,
    },

    #[error("malformed response: {0}")]
    Decode(String),

    #[error("{url} still had results after {pages} pages; refusing a partial listing")]
    Truncated { url: String, pages: u32 },
}

/// Errors that end a gate session without a verdict.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),
}

/// Result type for gate operations.
pub type Result<T> = std::result::Result<T, GateError>;
