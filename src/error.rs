use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Diagnostic produced when a model response does not match the evaluation schema.
///
/// Every variant names the offending field so the message can be logged or
/// surfaced without further context.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Expected a JSON object, got {actual}")]
    NotAnObject { actual: &'static str },

    #[error("Missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("Unexpected field: {field}")]
    UnexpectedField { field: String },

    #[error("Field '{field}' must be {expected}, got {actual}")]
    WrongKind {
        field: &'static str,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Field '{field}' must be >= {min}, got {actual}")]
    BelowMinimum {
        field: &'static str,
        min: i64,
        actual: String,
    },

    #[error("Field '{field}' must be <= {max}, got {actual}")]
    AboveMaximum {
        field: &'static str,
        max: i64,
        actual: String,
    },

    #[error("Field '{field}' item at index {index} must be string, got {actual}")]
    WrongItemKind {
        field: &'static str,
        index: usize,
        actual: &'static str,
    },
}

impl SchemaError {
    /// Name of the field the diagnostic refers to, if any.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::NotAnObject { .. } => None,
            Self::MissingField { field }
            | Self::WrongKind { field, .. }
            | Self::BelowMinimum { field, .. }
            | Self::AboveMaximum { field, .. }
            | Self::WrongItemKind { field, .. } => Some(field),
            Self::UnexpectedField { field } => Some(field),
        }
    }
}

/// Rejection of a submitted evaluation request body.
///
/// The display text is returned verbatim to the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("Request body is required")]
    BodyRequired,

    #[error("Invalid JSON in request body")]
    InvalidJson,

    #[error("Request body is empty")]
    EmptyBody,

    #[error("Missing required field: requirementText")]
    MissingText,

    #[error("requirementText must be a string")]
    NotAString,

    #[error("requirementText cannot be empty")]
    Blank,

    #[error("requirementText must be at least {min} characters")]
    TooShort { min: usize },

    #[error("requirementText exceeds maximum length of {max} characters")]
    TooLong { max: usize },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Input(#[from] InputError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("operation timed out after {0}s")]
    Timeout(u64),

    #[error("parse error: {0}")]
    Parse(String),

    /// The pipeline answered a command-line evaluation with a non-200 status.
    #[error("evaluation failed with status {status}: {message}")]
    Evaluation { status: u16, message: String },
}

impl Error {
    /// True for failures of the inference call itself: transport, status,
    /// timeout or an undecodable provider response.
    #[must_use]
    pub const fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::Connection(_) | Self::Timeout(_) | Self::Json(_) | Self::Parse(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
