//! # Stdio transport
//!
//! Module dedicated to the standard transport: requests and responses
//! are exchanged with the backend child process over its standard
//! input and output, one per line, as a keyword followed by an
//! optional JSON payload.

use std::io::{Error, ErrorKind, Result};

use async_trait::async_trait;
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    process::{ChildStdin, ChildStdout},
};
use tracing::trace;

use super::{Pong, Request, RequestWriter, Response, ResponseReader};

/// The writer half of the stdio transport.
pub struct StdioRequestWriter {
    writer: ChildStdin,
}

impl From<ChildStdin> for StdioRequestWriter {
    fn from(stdin: ChildStdin) -> Self {
        Self { writer: stdin }
    }
}

#[async_trait]
impl RequestWriter for StdioRequestWriter {
    /// Write the given request to the backend standard input.
    async fn write(&mut self, req: Request) -> Result<()> {
        trace!("sending request: {req:?}");

        let req = match req {
            Request::Ping => String::from("ping"),
            Request::Index(path) => format!("index {}", serde_json::to_string(&path)?),
            Request::Quit => String::from("quit"),
        };
        self.writer.write_all((req + "\n").as_bytes()).await?;
        self.writer.flush().await?;
        Ok(())
    }
}

/// The reader half of the stdio transport.
pub struct StdioResponseReader {
    reader: BufReader<ChildStdout>,
}

impl From<ChildStdout> for StdioResponseReader {
    fn from(stdout: ChildStdout) -> Self {
        Self {
            reader: BufReader::new(stdout),
        }
    }
}

#[async_trait]
impl ResponseReader for StdioResponseReader {
    /// Read the backend standard output to extract the next response.
    async fn read(&mut self) -> Result<Response> {
        let mut res = String::new();
        self.reader.read_line(&mut res).await?;

        trace!("receiving response: {res:?}");

        let mut tokens = res.trim_end().splitn(2, ' ');
        match tokens.next() {
            Some("pong") => match tokens.next().map(serde_json::from_str::<Pong>) {
                Some(Ok(pong)) => Ok(Response::Pong(pong)),
                Some(Err(err)) => Err(Error::new(
                    ErrorKind::InvalidInput,
                    format!("invalid pong: {err}"),
                )),
                None => Err(Error::new(
                    ErrorKind::InvalidInput,
                    "missing pong".to_owned(),
                )),
            },
            Some(res) => Err(Error::new(
                ErrorKind::InvalidInput,
                format!("invalid response: {res}"),
            )),
            None => Err(Error::new(
                ErrorKind::InvalidInput,
                "missing response".to_owned(),
            )),
        }
    }
}
