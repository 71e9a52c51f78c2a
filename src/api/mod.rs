//! Game server contract.
//!
//! Wire types for the REST endpoints the client consumes, and the
//! [`GameApi`] trait that the session talks to. [`http::HttpGameApi`] is the
//! production implementation; tests substitute a scripted one.
//!
//! Only the fields the client relies on are modelled; unknown fields are
//! ignored on decode.

pub mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::state::{LegId, MatchId, PlayerId};

/// A registered player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    #[serde(default)]
    pub nickname: Option<String>,
}

impl Player {
    /// Nickname if set, otherwise the name.
    pub fn display_name(&self) -> &str {
        self.nickname.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayersResponse {
    pub players: Vec<Player>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub id: MatchId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchesResponse {
    pub matches: Vec<MatchSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegInfo {
    pub id: LegId,
    #[serde(default)]
    pub remaining_score: Option<i32>,
}

/// A dart as recorded by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThrowInfo {
    pub dart_number: u8,
    pub segment: u8,
    pub multiplier: u8,
    pub points: i32,
}

/// The turn in progress on the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentTurn {
    #[serde(default)]
    pub throws: Vec<ThrowInfo>,
    #[serde(default)]
    pub is_bust: bool,
}

/// `GET /api/matches/{id}/legs/current`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentLegView {
    pub leg: LegInfo,
    #[serde(default)]
    pub current_player_id: Option<PlayerId>,
    #[serde(default)]
    pub current_turn: Option<CurrentTurn>,
}

/// `POST /api/matches` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewMatchRequest {
    pub player_ids: Vec<PlayerId>,
    pub game_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StartedLeg {
    pub leg: LegInfo,
}

/// `POST /api/matches` response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedMatch {
    #[serde(rename = "match")]
    pub match_info: MatchSummary,
    pub leg: StartedLeg,
}

/// `POST .../throw` body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThrowRequest {
    pub player_id: PlayerId,
    pub segment: u8,
    pub multiplier: u8,
    pub dart_number: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnScore {
    pub score: i32,
}

/// `POST .../throw` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThrowResponse {
    pub throw: ThrowInfo,
    #[serde(default)]
    pub turn: Option<TurnScore>,
    pub is_bust: bool,
    pub game_completed: bool,
    pub remaining_score: i32,
}

/// `POST .../next-player` response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct NextPlayerResponse {
    pub next_player_id: PlayerId,
}

/// Body of any non-2xx response.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Everything the session needs from the game server.
///
/// Implementations map failures onto [`crate::Error`]: connection problems
/// and timeouts become `Transport`, 404 becomes `NotFound`, other non-2xx
/// statuses become `Api`, and undecodable bodies become `MalformedResponse`.
#[async_trait]
pub trait GameApi: Send + Sync {
    /// Lightweight liveness check.
    async fn probe(&self) -> Result<()>;

    async fn list_players(&self) -> Result<Vec<Player>>;

    async fn active_matches(&self) -> Result<Vec<MatchSummary>>;

    async fn current_leg(&self, match_id: MatchId) -> Result<CurrentLegView>;

    async fn create_match(&self, request: &NewMatchRequest) -> Result<CreatedMatch>;

    async fn submit_throw(
        &self,
        match_id: MatchId,
        leg_id: LegId,
        request: &ThrowRequest,
    ) -> Result<ThrowResponse>;

    async fn undo_last_throw(&self, match_id: MatchId, leg_id: LegId) -> Result<()>;

    async fn next_player(&self, match_id: MatchId, leg_id: LegId) -> Result<NextPlayerResponse>;

    /// Raw statistics payload, rendered as-is by the UI.
    async fn player_stats(&self, player_id: PlayerId) -> Result<serde_json::Value>;
}
