//! # Mail retrieval
//!
//! Module dedicated to the mail retrieval subprocess: one run of the
//! externally configured fetch command, supervised asynchronously.

use process::{Command, Output};
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
};
use tracing::{debug, warn};

/// The retrieval output sink alias.
///
/// The ephemeral surface the command output is routed to. Dropping
/// the receiving half simply discards further output, it is never an
/// error.
pub type OutputSink = mpsc::UnboundedSender<Output>;

/// The retrieval lifecycle state.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum RetrievalState {
    /// The subprocess has been handed over to the runtime but did not
    /// start yet.
    #[default]
    Spawned,

    /// The subprocess is running.
    Running,

    /// The subprocess exited with the given status code. The code is
    /// missing when the process got killed by a signal or could not
    /// be run at all.
    Exited(Option<i32>),
}

/// One supervised run of the mail retrieval command.
///
/// A retrieval belongs to the update cycle that spawned it and is
/// never referenced once its exit got observed.
pub struct Retrieval {
    state: watch::Receiver<RetrievalState>,
    task: JoinHandle<()>,
}

impl Retrieval {
    /// Spawn the given retrieval command.
    ///
    /// Returns immediately: the command runs on the async runtime and
    /// every lifecycle transition is published on the state channel,
    /// the exit one exactly once whatever the exit code. Standard
    /// output is routed to the given sink, or discarded without one.
    pub fn spawn(cmd: Command, sink: Option<OutputSink>) -> Self {
        let (tx, rx) = watch::channel(RetrievalState::default());

        let task = tokio::spawn(async move {
            tx.send_replace(RetrievalState::Running);

            let code = match cmd.run().await {
                Ok(output) => {
                    deliver(&sink, output);
                    Some(0)
                }
                Err(process::Error::GetExitStatusCodeNonZeroError(cmd, code, err)) => {
                    warn!(code, "retrieval command {cmd} exited with a non-zero status");
                    deliver(&sink, Output::from(err.into_bytes()));
                    Some(code)
                }
                Err(err) => {
                    warn!("cannot run retrieval command: {err}");
                    None
                }
            };

            tx.send_replace(RetrievalState::Exited(code));
        });

        Self { state: rx, task }
    }

    /// The current lifecycle state.
    pub fn state(&self) -> RetrievalState {
        self.state.borrow().clone()
    }

    pub fn is_running(&self) -> bool {
        !matches!(self.state(), RetrievalState::Exited(_))
    }

    /// Wait for the subprocess to exit and return its status code.
    pub async fn wait(&mut self) -> Option<i32> {
        loop {
            if let RetrievalState::Exited(code) = self.state() {
                return code;
            }

            if self.state.changed().await.is_err() {
                // the supervising task got aborted before exiting
                return match self.state() {
                    RetrievalState::Exited(code) => code,
                    _ => None,
                };
            }
        }
    }

    /// Abort the supervising task.
    pub fn abort(&self) {
        self.task.abort();
    }
}

fn deliver(sink: &Option<OutputSink>, output: Output) {
    if let Some(sink) = sink {
        if sink.send(output).is_err() {
            debug!("retrieval output sink already released, discarding output");
        }
    }
}
