//! Turn tracker state machine.
//!
//! Tracks which dart of the current three-dart turn is next and whether the
//! turn has reached a terminal state.
//!
//! # State Diagram
//!
//! ```text
//!            success          success          success
//! ┌────────┐ ───────▶ ┌────────┐ ───────▶ ┌────────┐ ───────▶ ┌───────────────┐
//! │ dart 1 │          │ dart 2 │          │ dart 3 │          │ dart 4        │
//! └────────┘          └────────┘          └────────┘          │ (complete)    │
//!     ▲                   │ bust              │ bust          └───────────────┘
//!     │                   ▼                   ▼                       │
//!     │              ┌─────────────────────────────┐                  │
//!     │              │ dart 4, bust (terminal)     │                  │
//!     │              └─────────────────────────────┘                  │
//!     │                            │ reset                            │ reset
//!     └────────────────────────────┴──────────────────────────────────┘
//! ```
//!
//! A checkout from any live dart also lands in the terminal state, without
//! the bust flag. Only `Reset` (next player, new game, error recovery)
//! leaves a terminal turn.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Darts in one turn.
pub const DARTS_PER_TURN: u8 = 3;

/// Sentinel dart number marking a finished turn.
pub const TERMINAL_DART: u8 = DARTS_PER_TURN + 1;

/// Turn transition events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnEvent {
    /// A scored, non-bust, non-checkout dart.
    Success,
    Bust,
    Checkout,
    Reset,
}

/// Error when a turn transition is invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidTransition {
    pub from: TurnTracker,
    pub event: TurnEvent,
    pub reason: &'static str,
}

impl fmt::Display for InvalidTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid turn transition from {} via {:?}: {}",
            self.from, self.event, self.reason
        )
    }
}

impl std::error::Error for InvalidTransition {}

/// Derived turn status, what the scoreboard shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TurnStatus {
    InProgress { darts_remaining: u8 },
    Complete,
    Bust,
}

/// Which inputs the UI should enable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Controls {
    pub throws: bool,
    pub next_player: bool,
    pub undo: bool,
}

/// Turn tracker.
///
/// `dart_number` is the 1-based index of the next dart to record. Values
/// are kept in `1..=4`; anything else is corruption and is healed back to 1
/// by [`TurnTracker::heal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnTracker {
    dart_number: u8,
    is_bust: bool,
}

impl Default for TurnTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnTracker {
    /// Fresh turn, dart 1.
    pub fn new() -> Self {
        Self {
            dart_number: 1,
            is_bust: false,
        }
    }

    /// Restore a tracker from raw values. No validation is applied.
    pub fn at(dart_number: u8, is_bust: bool) -> Self {
        Self {
            dart_number,
            is_bust,
        }
    }

    /// Terminal turn with the given bust flag.
    pub fn terminal(is_bust: bool) -> Self {
        Self::at(TERMINAL_DART, is_bust)
    }

    pub fn dart_number(&self) -> u8 {
        self.dart_number
    }

    pub fn is_bust(&self) -> bool {
        self.is_bust
    }

    /// `dart_number > 3 || is_bust`. Every caller that disables input uses this.
    pub fn is_turn_complete(&self) -> bool {
        self.dart_number > DARTS_PER_TURN || self.is_bust
    }

    /// Whether `dart_number` is outside the representable `1..=4` range.
    pub fn is_corrupt(&self) -> bool {
        !(1..=TERMINAL_DART).contains(&self.dart_number)
    }

    /// Force a corrupt dart number back to 1. Returns true if anything changed.
    pub fn heal(&mut self) -> bool {
        if self.is_corrupt() {
            tracing::warn!(
                dart_number = self.dart_number,
                "dart number out of range, resetting to 1"
            );
            self.dart_number = 1;
            true
        } else {
            false
        }
    }

    /// Apply an event, returning the new state or an error.
    pub fn apply(&self, event: TurnEvent) -> Result<Self, InvalidTransition> {
        self.transition(event)
    }

    /// Apply an event in place, returning error if invalid.
    pub fn apply_mut(&mut self, event: TurnEvent) -> Result<(), InvalidTransition> {
        *self = self.transition(event)?;
        Ok(())
    }

    fn transition(&self, event: TurnEvent) -> Result<Self, InvalidTransition> {
        let invalid = |reason: &'static str| InvalidTransition {
            from: *self,
            event,
            reason,
        };

        match event {
            TurnEvent::Success if self.is_turn_complete() => Err(invalid("Turn already complete")),
            TurnEvent::Success => Ok(Self::at(self.dart_number.saturating_add(1), false)),
            // Idempotent once terminal.
            TurnEvent::Bust => Ok(Self::terminal(true)),
            TurnEvent::Checkout => Ok(Self::terminal(false)),
            TurnEvent::Reset => Ok(Self::new()),
        }
    }

    // Convenience wrappers

    pub fn record_success(&mut self) -> Result<(), InvalidTransition> {
        self.apply_mut(TurnEvent::Success)
    }

    pub fn record_bust(&mut self) {
        *self = Self::terminal(true);
    }

    pub fn record_checkout(&mut self) {
        *self = Self::terminal(false);
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Darts left in this turn (0 once terminal).
    pub fn darts_remaining(&self) -> u8 {
        if self.is_turn_complete() {
            0
        } else {
            TERMINAL_DART.saturating_sub(self.dart_number)
        }
    }

    pub fn status(&self) -> TurnStatus {
        if self.is_bust {
            TurnStatus::Bust
        } else if self.is_turn_complete() {
            TurnStatus::Complete
        } else {
            TurnStatus::InProgress {
                darts_remaining: self.darts_remaining(),
            }
        }
    }

    /// Terminal turns leave "next player" as the only enabled action.
    pub fn controls(&self) -> Controls {
        let complete = self.is_turn_complete();
        Controls {
            throws: !complete,
            next_player: complete,
            undo: !complete,
        }
    }
}

impl fmt::Display for TurnTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_bust {
            write!(f, "Dart({}, bust)", self.dart_number)
        } else {
            write!(f, "Dart({})", self.dart_number)
        }
    }
}
