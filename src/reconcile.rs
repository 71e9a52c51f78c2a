//! Reconciliation against the server's current-leg view.
//!
//! The server is authoritative: after every confirmed mutation the local
//! leg, current player and turn tracker are overwritten from its view.
//! Local optimistic bookkeeping never flows the other way.

use crate::api::{CurrentLegView, CurrentTurn};
use crate::state::turn::{TurnTracker, DARTS_PER_TURN};
use crate::state::ActiveMatch;

/// Turn tracker implied by the server's current turn.
///
/// A finished turn (three darts or bust) stays terminal; only an explicit
/// next-player action starts a fresh one.
pub fn turn_from_server(turn: Option<&CurrentTurn>) -> TurnTracker {
    let Some(turn) = turn else {
        return TurnTracker::new();
    };

    let thrown = turn.throws.len();
    if thrown >= usize::from(DARTS_PER_TURN) || turn.is_bust {
        TurnTracker::terminal(turn.is_bust)
    } else {
        // thrown < 3 here
        TurnTracker::at(thrown as u8 + 1, false)
    }
}

/// Overwrite local state from `view`. Applying the same view twice yields
/// the same state as applying it once.
pub fn apply_leg_view(active: &mut ActiveMatch, turn: &mut TurnTracker, view: &CurrentLegView) {
    active.leg_id = view.leg.id;
    if let Some(player_id) = view.current_player_id {
        active.player_id = player_id;
    }
    *turn = turn_from_server(view.current_turn.as_ref());
}
