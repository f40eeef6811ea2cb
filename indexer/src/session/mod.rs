//! # Session
//!
//! Module dedicated to the top-level session lifecycle: one active
//! backend session per manager, started after synchronous
//! configuration checks and released through a confirmed, ordered
//! shutdown.

use std::sync::Arc;

use tracing::{debug, info};

use crate::{
    account::AccountConfig,
    backend::{BackendSession, Pong},
    retrieve::OutputSink,
    update::{UpdateCycle, UpdateScheduler},
    Result,
};

/// The confirmation gate handler alias.
///
/// Invoked with a question before the session is torn down. Returning
/// false leaves the session fully untouched.
pub type ConfirmHandler = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// The ready handler alias.
///
/// Invoked with the handshake acknowledgement once the session is
/// ready, and again when starting an already started session. This is
/// where a frontend presents its main view.
pub type ReadyHandler = Arc<dyn Fn(&Pong) + Send + Sync>;

/// The live session bundle, owned by the manager between start and
/// quit.
struct ActiveSession {
    backend: BackendSession,
    scheduler: UpdateScheduler,
}

/// The top-level session manager.
///
/// The manager is the explicit owner of the single active session:
/// construction and destruction of the backend session and of the
/// update scheduler are tied to [`SessionManager::start_session`] and
/// [`SessionManager::quit_session`].
pub struct SessionManager {
    config: Arc<AccountConfig>,
    confirm: ConfirmHandler,
    ready: ReadyHandler,
    sink: Option<OutputSink>,
    session: Option<ActiveSession>,
}

impl SessionManager {
    pub fn new(config: impl Into<Arc<AccountConfig>>) -> Self {
        Self {
            config: config.into(),
            confirm: Arc::new(|_| true),
            ready: Arc::new(|_| ()),
            sink: None,
            session: None,
        }
    }

    pub fn with_confirm_handler(
        mut self,
        handler: impl Fn(&str) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.confirm = Arc::new(handler);
        self
    }

    pub fn with_ready_handler(mut self, handler: impl Fn(&Pong) + Send + Sync + 'static) -> Self {
        self.ready = Arc::new(handler);
        self
    }

    pub fn with_output_sink(mut self, sink: OutputSink) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Whether a session is currently live.
    pub fn is_started(&self) -> bool {
        self.session.is_some()
    }

    /// Whether the update scheduler of the live session is armed.
    pub fn is_scheduler_armed(&self) -> bool {
        self.session
            .as_ref()
            .map(|session| session.scheduler.is_armed())
            .unwrap_or_default()
    }

    /// Start the session.
    ///
    /// Validates the configuration synchronously, spawns the backend,
    /// runs the handshake, then arms the update scheduler. Starting an
    /// already started session switches focus back to it instead of
    /// probing the backend a second time.
    pub async fn start_session(&mut self) -> Result<()> {
        if let Some(session) = &self.session {
            debug!("session already started, switching focus");
            if let Some(pong) = session.backend.find_pong() {
                (self.ready)(pong);
            }
            return Ok(());
        }

        self.config.check_up()?;

        let mut backend = BackendSession::spawn(&self.config).await?;
        if let Err(err) = backend.handshake().await {
            backend.close().await;
            return Err(err.into());
        }

        if let Some(pong) = backend.find_pong() {
            (self.ready)(pong);
        }

        let mut scheduler = UpdateScheduler::new();
        if let Some(interval) = self.config.find_update_interval() {
            let cycle = self.new_cycle(&backend)?;
            scheduler.enable(cycle, Some(interval));
        }

        self.session = Some(ActiveSession { backend, scheduler });
        Ok(())
    }

    /// Run one retrieval + index cycle now.
    ///
    /// User-initiated counterpart of the scheduled cycle. Fails when
    /// no retrieval command is configured, and gets skipped when a
    /// cycle is already running.
    pub async fn update(&mut self) -> Result<()> {
        let Some(session) = &self.session else {
            debug!("no session started, skipping update");
            return Ok(());
        };

        let cycle = self.new_cycle(&session.backend)?;
        session.scheduler.run_cycle(cycle);
        Ok(())
    }

    /// Quit the session.
    ///
    /// Gated behind the confirm handler: declining leaves the session
    /// fully untouched. On confirmation the update scheduler gets
    /// cancelled first, then the backend session is closed and every
    /// owned resource released. Without a live session this is a
    /// no-op.
    pub async fn quit_session(&mut self) -> Result<()> {
        if self.session.is_none() {
            debug!("no session started, nothing to quit");
            return Ok(());
        }

        if !(self.confirm)("Are you sure you want to quit?") {
            debug!("quit not confirmed, keeping session alive");
            return Ok(());
        }

        info!("quitting session");

        if let Some(mut session) = self.session.take() {
            session.scheduler.cancel();
            session.backend.close().await;
        }

        Ok(())
    }

    fn new_cycle(&self, backend: &BackendSession) -> Result<UpdateCycle> {
        Ok(UpdateCycle {
            cmd: self.config.get_retrieve_cmd()?.clone(),
            store_path: self.config.get_maildir_path(),
            writer: backend.writer(),
            sink: self.sink.clone(),
        })
    }
}
