//! # Error
//!
//! Module dedicated to flag errors. It contains an [`Error`] enum
//! based on [`thiserror::Error`] and a type alias [`Result`].

use thiserror::Error;

/// The global `Result` alias of the library.
pub type Result<T> = std::result::Result<T, Error>;

/// The global `Error` enum of the library.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot parse unknown flag {0}")]
    ParseFlagError(String),
    #[error("cannot parse unknown maildir flag {0}")]
    ParseFlagCharError(char),
}
