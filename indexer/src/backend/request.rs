//! # Request
//!
//! To drive the indexer backend, the client sends requests to the
//! backend process. This module contains the request structure as
//! well as the trait to write a request.

use std::{io::Result, path::PathBuf};

use async_trait::async_trait;

/// The client request struct.
///
/// Requests are sent by the client and received by the backend.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Request {
    /// Probe the backend for liveness and protocol compatibility.
    Ping,

    /// Ask the backend to (re)index the mail store at the given root
    /// path.
    Index(PathBuf),

    /// Ask the backend to terminate gracefully.
    Quit,
}

/// Trait to write a client request.
///
/// Describes how a request should be sent to the backend.
#[async_trait]
pub trait RequestWriter: Send + Sync {
    /// Write the given client request.
    async fn write(&mut self, req: Request) -> Result<()>;
}
