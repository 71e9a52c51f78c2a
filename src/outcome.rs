//! Throw response interpretation.
//!
//! A confirmed throw is exactly one of bust, checkout or a plain scored
//! dart, checked in that order.

use crate::api::{ThrowInfo, ThrowResponse};
use crate::error::{Error, Result};
use crate::notice::Notice;
use crate::state::turn::{TurnTracker, DARTS_PER_TURN};

/// What happened to a throw attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThrowOutcome {
    /// Counted, turn continues unless `turn_complete`.
    Scored {
        throw: ThrowInfo,
        remaining_score: i32,
        turn_complete: bool,
    },
    /// Turn voided; remaining score is unchanged.
    Bust {
        throw: ThrowInfo,
        remaining_score: i32,
    },
    /// Leg won.
    Checkout { throw: ThrowInfo },
    /// Server unreachable; stored for replay.
    Queued { id: u64, pending: usize },
}

impl ThrowOutcome {
    /// Notice the UI should show for this outcome, if any.
    pub fn notice(&self) -> Option<Notice> {
        match self {
            Self::Bust { .. } => Some(Notice::Bust),
            Self::Checkout { throw } => Some(Notice::Checkout {
                points: throw.points,
            }),
            Self::Scored {
                turn_complete: true,
                ..
            } => Some(Notice::TurnComplete),
            Self::Scored { .. } => None,
            Self::Queued { pending, .. } => Some(Notice::ThrowQueued { pending: *pending }),
        }
    }
}

/// Apply a confirmed throw response to the turn tracker.
///
/// On error the tracker is left untouched.
pub fn interpret(turn: &mut TurnTracker, response: &ThrowResponse) -> Result<ThrowOutcome> {
    let dart = response.throw.dart_number;
    if !(1..=DARTS_PER_TURN).contains(&dart) {
        return Err(Error::MalformedResponse(format!(
            "thrown dart number {dart} outside 1-{DARTS_PER_TURN}"
        )));
    }

    let throw = response.throw.clone();
    let outcome = if response.is_bust {
        turn.record_bust();
        ThrowOutcome::Bust {
            throw,
            remaining_score: response.remaining_score,
        }
    } else if response.game_completed {
        turn.record_checkout();
        ThrowOutcome::Checkout { throw }
    } else {
        turn.record_success()?;
        ThrowOutcome::Scored {
            throw,
            remaining_score: response.remaining_score,
            turn_complete: turn.is_turn_complete(),
        }
    };

    tracing::debug!(?outcome, %turn, "throw interpreted");
    Ok(outcome)
}
