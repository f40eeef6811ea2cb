//! # Error
//!
//! Module dedicated to the global library error. It aggregates the
//! module errors into one [`Error`] enum and a type alias [`Result`].

use thiserror::Error;

/// The global `Result` alias of the library.
pub type Result<T> = std::result::Result<T, Error>;

/// The global `Error` enum of the library.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    AccountError(#[from] crate::account::Error),
    #[error(transparent)]
    BackendError(#[from] crate::backend::Error),
}
