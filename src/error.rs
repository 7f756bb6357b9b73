//! Error types for the models repository client.

use thiserror::Error;

/// Models repository error type.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed model identifier
    #[error("Invalid DTMI: {0}")]
    InvalidDtmi(#[from] crate::dtmi::InvalidDtmiError),

    /// Repository fetch failure
    #[error("Fetch error: {0}")]
    Fetch(#[from] crate::fetch::FetchError),

    /// Model document parse or consistency failure
    #[error("Model error: {0}")]
    Model(#[from] crate::model::ModelError),

    /// Repository location could not be interpreted
    #[error("Invalid repository location: {0}")]
    InvalidLocation(String),
}

/// Result type alias for models repository operations.
pub type Result<T> = std::result::Result<T, Error>;
