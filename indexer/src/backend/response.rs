//! # Response
//!
//! When the backend receives a probe, it sends back a response. This
//! module contains the response structure as well as the trait to
//! read a response.

use std::io::Result;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The handshake acknowledgement payload.
///
/// Carries exactly two fields: the protocol version implemented by
/// the backend and the number of documents currently indexed.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Pong {
    /// The protocol version implemented by the backend.
    pub version: String,

    /// The number of documents in the backend index.
    pub doc_count: usize,
}

/// The backend response struct.
///
/// Responses are sent by the backend and received by the client.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Response {
    /// Reply to [`Request::Ping`](super::Request::Ping).
    Pong(Pong),
}

/// Trait to read a backend response.
///
/// Describes how a response should be parsed by the client.
#[async_trait]
pub trait ResponseReader: Send + Sync {
    /// Read the next backend response.
    async fn read(&mut self) -> Result<Response>;
}
