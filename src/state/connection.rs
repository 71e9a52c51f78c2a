//! Connectivity state management.
//!
//! Tracks whether the game server is reachable. The state starts Online and
//! only flips through [`ConnectivityMonitor`]: on probe results, or when a
//! request fails at the transport level.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::sync::watch;

/// Default interval between liveness probes (5 seconds).
pub const DEFAULT_PROBE_INTERVAL: Duration = Duration::from_secs(5);

/// Binary reachability signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Connectivity {
    #[default]
    Online,
    Offline,
}

impl Connectivity {
    pub fn is_online(&self) -> bool {
        matches!(self, Self::Online)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
        }
    }
}

/// A change of [`Connectivity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityTransition {
    WentOnline,
    WentOffline,
}

/// Full connection status, published to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionStatus {
    pub connectivity: Connectivity,

    /// Failed probes or requests since the last success
    pub consecutive_failures: u32,

    /// When the last probe finished
    pub last_probe: Option<Instant>,

    /// When the current offline period began
    pub offline_since: Option<Instant>,
}

impl Default for ConnectionStatus {
    fn default() -> Self {
        Self {
            connectivity: Connectivity::Online,
            consecutive_failures: 0,
            last_probe: None,
            offline_since: None,
        }
    }
}

impl ConnectionStatus {
    /// Time spent offline so far, if offline.
    pub fn offline_for(&self) -> Option<Duration> {
        self.offline_since.map(|since| since.elapsed())
    }

    fn record_success(&mut self) -> Option<ConnectivityTransition> {
        self.consecutive_failures = 0;
        match self.connectivity {
            Connectivity::Online => None,
            Connectivity::Offline => {
                self.connectivity = Connectivity::Online;
                self.offline_since = None;
                Some(ConnectivityTransition::WentOnline)
            }
        }
    }

    fn record_failure(&mut self) -> Option<ConnectivityTransition> {
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        match self.connectivity {
            Connectivity::Offline => None,
            Connectivity::Online => {
                self.connectivity = Connectivity::Offline;
                self.offline_since = Some(Instant::now());
                Some(ConnectivityTransition::WentOffline)
            }
        }
    }
}

/// Shared connectivity handle.
///
/// Cloning is cheap; every clone observes and drives the same state. The
/// probe loop and the session each hold one.
#[derive(Debug, Clone)]
pub struct ConnectivityMonitor {
    status: Arc<watch::Sender<ConnectionStatus>>,
}

impl Default for ConnectivityMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectivityMonitor {
    pub fn new() -> Self {
        let (status, _) = watch::channel(ConnectionStatus::default());
        Self {
            status: Arc::new(status),
        }
    }

    /// Current connectivity.
    pub fn connectivity(&self) -> Connectivity {
        self.status.borrow().connectivity
    }

    pub fn is_online(&self) -> bool {
        self.connectivity().is_online()
    }

    /// Snapshot of the full status.
    pub fn status(&self) -> ConnectionStatus {
        self.status.borrow().clone()
    }

    /// Subscribe to status changes. Subscribers are woken on transitions only.
    pub fn subscribe(&self) -> watch::Receiver<ConnectionStatus> {
        self.status.subscribe()
    }

    /// Feed the result of a liveness probe.
    pub fn record_probe(&self, reachable: bool) -> Option<ConnectivityTransition> {
        let mut transition = None;
        self.status.send_if_modified(|status| {
            status.last_probe = Some(Instant::now());
            transition = if reachable {
                status.record_success()
            } else {
                status.record_failure()
            };
            transition.is_some()
        });
        if let Some(t) = transition {
            tracing::info!(?t, "connectivity changed after probe");
        }
        transition
    }

    /// A request failed at the transport level; treat it as connectivity loss.
    pub fn report_transport_failure(&self) -> Option<ConnectivityTransition> {
        let mut transition = None;
        self.status.send_if_modified(|status| {
            transition = status.record_failure();
            transition.is_some()
        });
        if transition.is_some() {
            tracing::warn!("request failed in flight, switching to offline");
        }
        transition
    }
}
