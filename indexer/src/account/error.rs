//! # Error
//!
//! Module dedicated to account errors.

use std::path::PathBuf;

use thiserror::Error;

/// The `Result` alias of the module.
pub type Result<T> = std::result::Result<T, Error>;

/// The `Error` enum of the module.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot find indexer backend binary at {0}")]
    GetBackendBinaryNotFoundError(PathBuf),
    #[error("cannot find valid mail store at {0}")]
    GetMaildirInvalidError(PathBuf),
    #[error("cannot create mail folder {0}")]
    EnsureFolderError(PathBuf),
    #[error("cannot get mail retrieval command: not defined in configuration")]
    GetRetrieveCmdMissingError,
    #[error("cannot schedule updates every {0}s: no mail retrieval command defined")]
    ScheduleWithoutRetrieveCmdError(u64),
}
