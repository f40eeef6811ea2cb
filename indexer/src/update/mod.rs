//! # Update scheduler
//!
//! Module dedicated to the update cycle and its scheduler: retrieve
//! new mail, then ask the backend to re-index the store, on demand or
//! on a cancellable periodic timer.

use process::Command;
use std::{
    path::PathBuf,
    sync::{Arc, Mutex as StdMutex},
    time::Duration,
};
use tokio::{
    sync::Mutex,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tracing::{debug, info, warn};

use crate::{
    backend::{Request, RequestWriter},
    retrieve::{OutputSink, Retrieval},
};

/// One update cycle.
///
/// Runs the retrieval command to completion, then triggers the
/// backend index step for the mail store root.
#[derive(Clone)]
pub struct UpdateCycle {
    /// The mail retrieval command.
    pub cmd: Command,

    /// The mail store root to re-index after retrieval.
    pub store_path: PathBuf,

    /// The shared backend request writer.
    pub writer: Arc<Mutex<Box<dyn RequestWriter>>>,

    /// The sink retrieval output is routed to.
    pub sink: Option<OutputSink>,
}

impl UpdateCycle {
    /// Run the cycle to completion.
    ///
    /// The index step runs for any exit status, the backend decides by
    /// itself whether the store changed. Only a retrieval that never
    /// produced a status skips it.
    pub async fn run(&self) {
        let mut retrieval = Retrieval::spawn(self.cmd.clone(), self.sink.clone());

        match retrieval.wait().await {
            Some(code) => {
                debug!(code, "retrieval done, triggering backend index");
                let req = Request::Index(self.store_path.clone());
                if let Err(err) = self.writer.lock().await.write(req).await {
                    debug!("cannot trigger backend index, session may be closed: {err}");
                }
            }
            None => {
                warn!("retrieval did not complete, skipping backend index");
            }
        }
    }
}

/// The periodic update scheduler.
///
/// At most one ticker is armed at a time, and at most one update
/// cycle runs at a time: a tick firing while the previous cycle still
/// runs is skipped, neither queued nor an error.
#[derive(Default)]
pub struct UpdateScheduler {
    ticker: Option<JoinHandle<()>>,
    current: Arc<StdMutex<Option<JoinHandle<()>>>>,
}

impl UpdateScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the periodic timer.
    ///
    /// Without an interval scheduling is disabled, which is a valid
    /// manual-retrieval-only setup. The timer fires immediately once,
    /// then every interval. Calling enable while a ticker is already
    /// armed is a no-op.
    pub fn enable(&mut self, cycle: UpdateCycle, interval: Option<Duration>) {
        let Some(interval) = interval.filter(|interval| !interval.is_zero()) else {
            debug!("no update interval configured, scheduling disabled");
            return;
        };

        if self.is_armed() {
            debug!("update scheduler already armed");
            return;
        }

        info!(secs = interval.as_secs(), "arming update scheduler");

        let current = self.current.clone();
        self.ticker = Some(tokio::spawn(async move {
            let mut ticks = time::interval(interval);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticks.tick().await;

                match current.lock() {
                    Ok(mut current) => {
                        spawn_cycle(&mut current, cycle.clone());
                    }
                    Err(err) => {
                        warn!("cannot lock update cycle state, stopping scheduler: {err}");
                        break;
                    }
                }
            }
        }));
    }

    /// Run one cycle now, unless one is already running.
    ///
    /// Returns whether a cycle got spawned.
    pub fn run_cycle(&self, cycle: UpdateCycle) -> bool {
        match self.current.lock() {
            Ok(mut current) => spawn_cycle(&mut current, cycle),
            Err(err) => {
                warn!("cannot lock update cycle state: {err}");
                false
            }
        }
    }

    /// Stop and release the timer, aborting any in-flight cycle.
    ///
    /// Safe to call when no timer is armed.
    pub fn cancel(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            info!("cancelling update scheduler");
            ticker.abort();
        }

        if let Ok(mut current) = self.current.lock() {
            if let Some(cycle) = current.take() {
                cycle.abort();
            }
        }
    }

    pub fn is_armed(&self) -> bool {
        self.ticker
            .as_ref()
            .map(|ticker| !ticker.is_finished())
            .unwrap_or_default()
    }

    pub fn is_cycle_running(&self) -> bool {
        self.current
            .lock()
            .map(|current| {
                current
                    .as_ref()
                    .map(|cycle| !cycle.is_finished())
                    .unwrap_or_default()
            })
            .unwrap_or_default()
    }
}

/// Spawn the given cycle, unless the current one still runs.
fn spawn_cycle(current: &mut Option<JoinHandle<()>>, cycle: UpdateCycle) -> bool {
    let busy = current
        .as_ref()
        .map(|cycle| !cycle.is_finished())
        .unwrap_or_default();

    if busy {
        debug!("previous update cycle still running, skipping");
        return false;
    }

    *current = Some(tokio::spawn(async move { cycle.run().await }));
    true
}
