//! Error types for grammar construction
//!
//! Validation failures are not errors; they surface as a [`MessageKey`].
//!
//! [`MessageKey`]: crate::MessageKey

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid clause format `{format}`: {source}")]
    InvalidFormat {
        format: String,
        #[source]
        source: regex::Error,
    },

    #[error("clause format `{0}` has no capture group for the clause name")]
    MissingNameGroup(String),
}

pub type Result<T> = std::result::Result<T, Error>;
