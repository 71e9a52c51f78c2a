//! Transient user-facing notifications.
//!
//! The session pushes these onto an unbounded channel; the UI shows them
//! briefly and lets them auto-dismiss. Nothing ever waits on a notice.

use std::fmt;

use tokio::sync::mpsc;

use crate::state::PlayerId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Bust,
    Checkout { points: i32 },
    TurnComplete,
    ThrowQueued { pending: usize },
    ConnectionLost,
    ConnectionRestored,
    OfflineSynced,
    NewGame,
    ThrowUndone,
    NowPlaying { player_id: PlayerId },
    MatchGone,
    /// An operation failed; carries the user-facing message.
    Failure { message: String },
}

impl Notice {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Failure { .. } | Self::MatchGone)
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bust => write!(f, "Bust! Score reverts. Next player."),
            Self::Checkout { points } => write!(f, "Game won! Checkout: {points}"),
            Self::TurnComplete => write!(f, "Turn complete. Tap Next Player."),
            Self::ThrowQueued { pending } => {
                write!(f, "Offline: throw saved ({pending} waiting to sync)")
            }
            Self::ConnectionLost => write!(f, "Connection lost. Working offline..."),
            Self::ConnectionRestored => write!(f, "Connection restored!"),
            Self::OfflineSynced => write!(f, "All offline throws synced successfully!"),
            Self::NewGame => write!(f, "New game started!"),
            Self::ThrowUndone => write!(f, "Last throw undone."),
            Self::NowPlaying { player_id } => write!(f, "Now playing: Player {player_id}"),
            Self::MatchGone => write!(f, "Game not found. Please start a new game."),
            Self::Failure { message } => write!(f, "{message}"),
        }
    }
}

/// Sending half handed to the session and the probe loop.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: mpsc::UnboundedSender<Notice>,
}

impl Notifier {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notice>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Fire and forget; a closed receiver just means nobody is watching.
    pub fn notify(&self, notice: Notice) {
        tracing::debug!(%notice, "notice");
        let _ = self.tx.send(notice);
    }
}
