//! # Error
//!
//! Module dedicated to backend session errors.

use std::{io, path::PathBuf};

use thiserror::Error;

/// The `Result` alias of the module.
pub type Result<T> = std::result::Result<T, Error>;

/// The `Error` enum of the module.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot spawn indexer backend {1}")]
    SpawnBackendError(#[source] io::Error, PathBuf),
    #[error("cannot get standard input of indexer backend")]
    GetBackendStdinError,
    #[error("cannot get standard output of indexer backend")]
    GetBackendStdoutError,
    #[error("cannot send request to indexer backend")]
    WriteRequestError(#[source] io::Error),
    #[error("cannot read indexer backend handshake reply")]
    ReadResponseError(#[source] io::Error),
    #[error("cannot run handshake twice on the same backend session")]
    HandshakeAlreadyAttemptedError,
    #[error("cannot validate backend protocol version: expected {0}, got {1}")]
    HandshakeVersionMismatchError(String, String),
    #[error("cannot get handshake reply from indexer backend after {0}s")]
    HandshakeTimedOutError(u64),
}
