use thiserror::Error;

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("Invalid state: {0}")]
    InvalidState(String),
    #[error("No gateway configured for '{0}'")]
    ConfigurationMissing(String),
    #[error("Gateway error: {0}")]
    GatewayError(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PaymentError>;
