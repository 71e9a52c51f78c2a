//! Error types shared by the state layer, the API transport and the session.

use crate::state::turn::InvalidTransition;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while driving a match session.
///
/// The first four variants are local validation failures: they are raised
/// before any network or queue action takes place.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Match, leg or current player is unset.
    #[error("No active game. Please start a new game.")]
    NoActiveGame,

    /// Fewer than two players were selected for a new game.
    #[error("Please select at least 2 players ({selected} selected).")]
    InsufficientPlayers { selected: usize },

    /// The current turn is over; only advancing to the next player is allowed.
    #[error("Turn complete. Tap Next Player.")]
    TurnComplete,

    /// Segment or multiplier outside the board.
    #[error("Invalid dart: segment {segment}, multiplier {multiplier}")]
    InvalidDart { segment: u8, multiplier: u8 },

    /// The server reported the match or leg as missing (HTTP 404).
    #[error("{0}")]
    NotFound(String),

    /// Any other non-2xx response.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The server answered with a body this client cannot interpret.
    #[error("Malformed server response: {0}")]
    MalformedResponse(String),

    /// Network failure, including timeouts.
    #[error("Transport error: {0}")]
    Transport(String),

    #[error(transparent)]
    Transition(#[from] InvalidTransition),
}

impl Error {
    /// Whether this error means the server could not be reached at all.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Local validation failures never touch the network.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::NoActiveGame
                | Self::InsufficientPlayers { .. }
                | Self::TurnComplete
                | Self::InvalidDart { .. }
        )
    }
}
