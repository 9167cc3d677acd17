use thiserror::Error;

#[derive(Error, Debug)]
pub enum MiscError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Failed to parse '{value}': {message}")]
    ParseError { value: String, message: String },

    #[error("Lexing error: {message}")]
    LexError { message: String },

    #[error("Invalid argument '{name}': {reason}")]
    InvalidArgument { name: String, reason: String },

    #[error("Conflict found when trying to merge dicts at key '{key}'")]
    MergeConflict { key: String },

    #[error("Key not found: {key}")]
    MissingKey { key: String },

    #[error("Timezone already set to {current}")]
    TimezoneAlreadySet { current: String },

    #[error("Callable was poisoned by a panic during its first call")]
    Poisoned,

    #[error("Background task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),

    #[error("Configuration validation error in field '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for field '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, MiscError>;
