use thiserror::Error;

#[derive(Error, Debug)]
pub enum SignupError {
    // Request errors
    #[error("Invalid signup: {message}")]
    Validation { message: String },

    #[error("Email already registered: {email}")]
    DuplicateEmail { email: String },

    #[error("Key pool exhausted after {issued} keys")]
    PoolExhausted { issued: usize },

    #[error("Registration not found: {id}")]
    NotFound { id: String },

    // Delivery errors
    #[error("Failed to notify '{recipient}': {message}")]
    Notification { recipient: String, message: String },

    // Configuration errors
    #[error("Failed to load config file '{path}': {source}")]
    ConfigLoad {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid config: {message}")]
    ConfigValidation { message: String },

    // Generic errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

pub type Result<T> = std::result::Result<T, SignupError>;
