//! Identifiers of the match currently being scored.

use std::fmt;

use serde::{Deserialize, Serialize};

pub type MatchId = i64;
pub type LegId = i64;
pub type PlayerId = i64;

/// Match, leg and current player of the active game.
///
/// The session keeps this as `Option<ActiveMatch>` so the three ids are
/// always set together or not at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActiveMatch {
    pub match_id: MatchId,
    pub leg_id: LegId,
    pub player_id: PlayerId,
}

impl ActiveMatch {
    pub fn new(match_id: MatchId, leg_id: LegId, player_id: PlayerId) -> Self {
        Self {
            match_id,
            leg_id,
            player_id,
        }
    }

    /// Build from optional parts, as they come off the wire.
    pub fn from_parts(
        match_id: Option<MatchId>,
        leg_id: Option<LegId>,
        player_id: Option<PlayerId>,
    ) -> Option<Self> {
        Some(Self::new(match_id?, leg_id?, player_id?))
    }
}

impl fmt::Display for ActiveMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Match({}, leg {}, player {})",
            self.match_id, self.leg_id, self.player_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_parts_requires_all() {
        assert_eq!(
            ActiveMatch::from_parts(Some(1), Some(2), Some(3)),
            Some(ActiveMatch::new(1, 2, 3))
        );
        assert_eq!(ActiveMatch::from_parts(Some(1), None, Some(3)), None);
        assert_eq!(ActiveMatch::from_parts(None, Some(2), Some(3)), None);
        assert_eq!(ActiveMatch::from_parts(Some(1), Some(2), None), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            ActiveMatch::new(7, 12, 3).to_string(),
            "Match(7, leg 12, player 3)"
        );
    }
}
