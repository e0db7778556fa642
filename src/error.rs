//! Error handling and custom error types
//!
//! Provides unified error handling across the crate using thiserror.
//! Local-input and remote-call failures surface as [`Error::Resource`];
//! failures to find or decode image data surface as [`Error::ImageResponse`].

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Resource(String),

    #[error("{0}")]
    ImageResponse(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
