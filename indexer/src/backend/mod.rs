//! # Backend session
//!
//! Module dedicated to the indexer backend session: spawning the
//! long-lived backend process and running the startup handshake that
//! validates protocol compatibility before anything else talks to it.

mod error;
pub mod request;
pub mod response;
pub mod stdio;

use std::{path::Path, process::Stdio, sync::Arc, time::Duration};

use tokio::{process::Child, sync::Mutex, time};
use tracing::{debug, info};

use crate::account::AccountConfig;

#[doc(inline)]
pub use self::{
    error::{Error, Result},
    request::{Request, RequestWriter},
    response::{Pong, Response, ResponseReader},
    stdio::{StdioRequestWriter, StdioResponseReader},
};

/// The protocol version this library expects from the backend.
pub const PROTOCOL_VERSION: &str = "1";

/// The backend session state.
///
/// The session starts idle, enters the awaiting state when the
/// liveness probe is sent, then settles in one of the two terminal
/// states depending on the reply.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum SessionState {
    /// No handshake attempted yet.
    #[default]
    Idle,

    /// The liveness probe has been sent, awaiting the backend reply.
    AwaitingPong,

    /// The backend replied with a compatible protocol version.
    Ready,

    /// The backend replied with an incompatible version or malformed
    /// data.
    Failed,
}

/// The backend session.
///
/// Owns the spawned backend child process together with the two
/// transport halves used to talk to it. The shared writer can be
/// cloned out for components sending requests on their own, like the
/// update cycle.
pub struct BackendSession {
    state: SessionState,
    expected_version: String,
    handshake_timeout: Option<Duration>,
    pong: Option<Pong>,
    writer: Arc<Mutex<Box<dyn RequestWriter>>>,
    reader: Box<dyn ResponseReader>,
    child: Option<Child>,
}

impl BackendSession {
    /// Spawn the backend binary defined in the given configuration and
    /// wrap its standard input and output into a session.
    pub async fn spawn(config: &AccountConfig) -> Result<Self> {
        let binary = config.get_backend_binary();
        info!(binary = %binary.display(), "spawning indexer backend");

        let mut child = tokio::process::Command::new(&binary)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| Error::SpawnBackendError(err, binary))?;

        let stdin = child.stdin.take().ok_or(Error::GetBackendStdinError)?;
        let stdout = child.stdout.take().ok_or(Error::GetBackendStdoutError)?;

        let mut session = Self::from_parts(
            StdioRequestWriter::from(stdin),
            StdioResponseReader::from(stdout),
        )
        .with_expected_version(config.get_protocol_version())
        .with_handshake_timeout(config.find_handshake_timeout());

        session.child = Some(child);
        Ok(session)
    }

    /// Build a session from the given transport halves.
    ///
    /// Useful for alternative transports and for testing with fakes.
    pub fn from_parts(
        writer: impl RequestWriter + 'static,
        reader: impl ResponseReader + 'static,
    ) -> Self {
        Self {
            state: SessionState::default(),
            expected_version: PROTOCOL_VERSION.to_owned(),
            handshake_timeout: None,
            pong: None,
            writer: Arc::new(Mutex::new(Box::new(writer))),
            reader: Box::new(reader),
            child: None,
        }
    }

    pub fn with_expected_version(mut self, version: impl ToString) -> Self {
        self.expected_version = version.to_string();
        self
    }

    pub fn with_handshake_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.handshake_timeout = timeout;
        self
    }

    /// The current session state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Find the handshake acknowledgement, set once the session is
    /// ready.
    pub fn find_pong(&self) -> Option<&Pong> {
        self.pong.as_ref()
    }

    /// Find the document count reported by the backend.
    pub fn find_doc_count(&self) -> Option<usize> {
        self.pong.as_ref().map(|pong| pong.doc_count)
    }

    /// Clone of the shared request writer.
    pub fn writer(&self) -> Arc<Mutex<Box<dyn RequestWriter>>> {
        self.writer.clone()
    }

    /// Run the startup handshake.
    ///
    /// One single round trip, no retry: the liveness probe is sent,
    /// then the structured acknowledgement is awaited and validated
    /// against the expected protocol version. Without a configured
    /// timeout a silent backend keeps the session awaiting forever.
    pub async fn handshake(&mut self) -> Result<()> {
        if self.state != SessionState::Idle {
            return Err(Error::HandshakeAlreadyAttemptedError);
        }

        self.state = SessionState::AwaitingPong;

        debug!("sending ping to indexer backend");
        if let Err(err) = self.writer.lock().await.write(Request::Ping).await {
            self.state = SessionState::Failed;
            return Err(Error::WriteRequestError(err));
        }

        let res = match self.handshake_timeout {
            Some(timeout) => match time::timeout(timeout, self.reader.read()).await {
                Ok(res) => res,
                Err(_) => {
                    self.state = SessionState::Failed;
                    return Err(Error::HandshakeTimedOutError(timeout.as_secs()));
                }
            },
            None => self.reader.read().await,
        };

        match res {
            Ok(Response::Pong(pong)) => self.on_pong(pong),
            Err(err) => {
                self.state = SessionState::Failed;
                Err(Error::ReadResponseError(err))
            }
        }
    }

    /// Process the backend handshake acknowledgement.
    ///
    /// A pong received outside of a handshake, typically after the
    /// session got torn down, is ignored rather than an error.
    pub fn on_pong(&mut self, pong: Pong) -> Result<()> {
        if self.state != SessionState::AwaitingPong {
            debug!("ignoring pong received outside of handshake");
            return Ok(());
        }

        if pong.version != self.expected_version {
            self.state = SessionState::Failed;
            return Err(Error::HandshakeVersionMismatchError(
                self.expected_version.clone(),
                pong.version,
            ));
        }

        info!(
            version = %pong.version,
            docs = pong.doc_count,
            "indexer backend session ready"
        );

        self.pong = Some(pong);
        self.state = SessionState::Ready;
        Ok(())
    }

    /// Ask the backend to (re)index the mail store at the given root
    /// path.
    pub async fn index(&self, path: impl AsRef<Path>) -> Result<()> {
        let req = Request::Index(path.as_ref().to_owned());
        self.writer
            .lock()
            .await
            .write(req)
            .await
            .map_err(Error::WriteRequestError)
    }

    /// Terminate the backend session.
    ///
    /// Best effort: the quit request may fail when the backend is
    /// already gone, in which case the child process just gets killed.
    /// Safe to call in any state.
    pub async fn close(&mut self) {
        if let Err(err) = self.writer.lock().await.write(Request::Quit).await {
            debug!("cannot send quit request to indexer backend: {err}");
        }

        if let Some(mut child) = self.child.take() {
            if let Err(err) = child.kill().await {
                debug!("cannot kill indexer backend process: {err}");
            }
        }
    }
}
