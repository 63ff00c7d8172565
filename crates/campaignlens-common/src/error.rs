//! Error types for CampaignLens

use thiserror::Error;

/// Main error type for CampaignLens
#[derive(Error, Debug)]
pub enum Error {
    #[error("API key must not be empty")]
    EmptyCredential,

    #[error("Another connect or refresh is already in progress")]
    Busy,

    #[error("{0}")]
    ConnectFailed(String),

    #[error("{0}")]
    Retrieval(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for CampaignLens
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Error::EmptyCredential => 422,
            Error::Busy => 409,
            Error::ConnectFailed(_) => 401,
            Error::Retrieval(_) => 502,
            Error::Config(_) => 500,
            Error::Internal(_) => 500,
            Error::Other(_) => 500,
        }
    }

    /// Returns the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Error::EmptyCredential => "EMPTY_CREDENTIAL",
            Error::Busy => "BUSY",
            Error::ConnectFailed(_) => "CONNECT_FAILED",
            Error::Retrieval(_) => "RETRIEVAL_FAILED",
            Error::Config(_) => "CONFIG_ERROR",
            Error::Internal(_) => "INTERNAL_ERROR",
            Error::Other(_) => "INTERNAL_ERROR",
        }
    }
}
