//! Client state module.
//!
//! Pure, synchronous state types. Nothing in here performs I/O; the async
//! session drives these and the UI reads them.
//!
//! - `turn` - Turn tracker state machine (which dart is next?)
//! - `connection` - Online/offline signal and the shared monitor handle
//! - `queue` - Throws recorded while offline, in FIFO order
//! - `active` - Identifiers of the match being scored
//! - `dart` - Validated dart input
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           MatchSession                                   │
//! │                                                                          │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────┐          │
//! │  │ Option<Active-  │  │  TurnTracker    │  │  OfflineQueue   │          │
//! │  │   Match>        │  │                 │  │                 │          │
//! │  │ match_id        │  │ dart_number 1-4 │  │ id → QueuedThrow│          │
//! │  │ leg_id          │  │ is_bust         │  │ (FIFO)          │          │
//! │  │ player_id       │  │                 │  │                 │          │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────┘          │
//! │                                                                          │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │            ConnectivityMonitor (shared with ProbeLoop)           │    │
//! │  │                                                                  │    │
//! │  │               Online ◀──── probe ok ────  Offline                │    │
//! │  │                      ── probe/request fail ──▶                   │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod active;
pub mod connection;
pub mod dart;
pub mod queue;
pub mod turn;

use serde::Serialize;

// Re-export commonly used types
pub use active::{ActiveMatch, LegId, MatchId, PlayerId};
pub use connection::{
    ConnectionStatus, Connectivity, ConnectivityMonitor, ConnectivityTransition,
    DEFAULT_PROBE_INTERVAL,
};
pub use dart::{Dart, BULL, MAX_MULTIPLIER, MAX_SEGMENT};
pub use queue::{OfflineQueue, QueuedThrow};
pub use turn::{
    Controls, InvalidTransition, TurnEvent, TurnStatus, TurnTracker, DARTS_PER_TURN,
    TERMINAL_DART,
};

/// Point-in-time view of the whole client state, for logging and debugging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub active: Option<ActiveMatch>,
    pub dart_number: u8,
    pub is_bust: bool,
    pub connectivity: Connectivity,
    pub pending_throws: usize,
}

impl SessionSnapshot {
    pub fn new(
        active: Option<ActiveMatch>,
        turn: &TurnTracker,
        connectivity: Connectivity,
        pending_throws: usize,
    ) -> Self {
        Self {
            active,
            dart_number: turn.dart_number(),
            is_bust: turn.is_bust(),
            connectivity,
            pending_throws,
        }
    }

    pub fn has_active_game(&self) -> bool {
        self.active.is_some()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
