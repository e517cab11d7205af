//! Error types for citytime

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("City not found: {0}")]
    CityNotFound(String),

    #[error("Invalid city ID: {0}")]
    InvalidId(String),

    #[error("{field}: {message}")]
    Validation { field: String, message: String },

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// True for failures caused by the world-time service rather than the caller
    pub fn is_upstream(&self) -> bool {
        matches!(self, Error::Upstream(_) | Error::Http(_))
    }
}
