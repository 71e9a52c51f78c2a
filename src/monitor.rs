//! Background liveness probe.
//!
//! [`ProbeLoop`] probes the server every `probe_interval`, feeds the result
//! to the shared [`ConnectivityMonitor`] and, after an offline to online
//! transition, replays the session's offline queue.
//!
//! The probe itself never touches the session. Replay needs the session, and
//! is only attempted with `try_lock`: if a throw attempt (or anything else)
//! holds the session, the replay is deferred to a later tick rather than
//! waiting or running alongside it.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::api::GameApi;
use crate::notice::{Notice, Notifier};
use crate::session::{ReplayOutcome, SharedSession};
use crate::state::{ConnectivityMonitor, ConnectivityTransition, DEFAULT_PROBE_INTERVAL};

/// Handles the probe loop needs besides the session itself.
pub struct ProbeHandles<A> {
    pub api: Arc<A>,
    pub monitor: ConnectivityMonitor,
    pub notifier: Notifier,
}

/// Running probe task. Dropping it aborts the task.
#[derive(Debug)]
pub struct ProbeLoop {
    task: Option<JoinHandle<()>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl ProbeLoop {
    /// Spawn the probe task on the current runtime. The first probe runs
    /// immediately.
    pub fn spawn<A: GameApi + 'static>(
        session: SharedSession<A>,
        handles: ProbeHandles<A>,
        period: Duration,
    ) -> Self {
        let period = if period.is_zero() {
            warn!("zero probe interval, using default");
            DEFAULT_PROBE_INTERVAL
        } else {
            period
        };
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(probe_loop(session, handles, period, shutdown_rx));
        Self {
            task: Some(task),
            shutdown_tx: Some(shutdown_tx),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Stop probing and wait for the task to exit. A replay in flight is
    /// allowed to finish first.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!(error = %e, "probe task ended abnormally");
            }
        }
    }
}

impl Drop for ProbeLoop {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn probe_loop<A: GameApi>(
    session: SharedSession<A>,
    handles: ProbeHandles<A>,
    period: Duration,
    mut shutdown_rx: oneshot::Receiver<()>,
) {
    debug!(?period, "probe loop started");

    let mut ticker = time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut replay_pending = false;

    loop {
        tokio::select! {
            _ = &mut shutdown_rx => {
                debug!("probe loop shutting down");
                break;
            }
            _ = ticker.tick() => {}
        }

        let reachable = match handles.api.probe().await {
            Ok(()) => true,
            Err(e) => {
                debug!(error = %e, "probe failed");
                false
            }
        };

        match handles.monitor.record_probe(reachable) {
            Some(ConnectivityTransition::WentOnline) => {
                handles.notifier.notify(Notice::ConnectionRestored);
                replay_pending = true;
            }
            Some(ConnectivityTransition::WentOffline) => {
                handles.notifier.notify(Notice::ConnectionLost);
                replay_pending = false;
            }
            None => {}
        }

        if replay_pending && handles.monitor.is_online() {
            let Ok(mut guard) = session.try_lock() else {
                debug!("session busy, deferring replay");
                continue;
            };
            replay_pending = false;

            let report = guard.replay_offline_queue().await;
            match &report.outcome {
                ReplayOutcome::Drained => {
                    info!(submitted = report.submitted, "offline queue drained")
                }
                ReplayOutcome::Halted { error } => warn!(
                    submitted = report.submitted,
                    remaining = report.remaining,
                    %error,
                    "offline replay halted"
                ),
                ReplayOutcome::NotAttempted { reason } => {
                    debug!(reason, "offline replay skipped")
                }
            }
        }
    }
}
