//! Scripted [`GameApi`] for unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::api::{
    CreatedMatch, CurrentLegView, CurrentTurn, GameApi, LegInfo, MatchSummary, NewMatchRequest,
    NextPlayerResponse, Player, StartedLeg, ThrowInfo, ThrowRequest, ThrowResponse, TurnScore,
};
use crate::error::{Error, Result};
use crate::state::{LegId, MatchId, PlayerId};

pub const MATCH_ID: MatchId = 1;
pub const LEG_ID: LegId = 10;

/// Send test logs through the test harness's captured output.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// A request the mock received, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListPlayers,
    ActiveMatches,
    CurrentLeg(MatchId),
    CreateMatch(Vec<PlayerId>),
    SubmitThrow {
        match_id: MatchId,
        leg_id: LegId,
        request: ThrowRequest,
    },
    Undo(MatchId, LegId),
    NextPlayer(MatchId, LegId),
    PlayerStats(PlayerId),
}

pub fn throw_response(
    dart_number: u8,
    segment: u8,
    multiplier: u8,
    points: i32,
    is_bust: bool,
    game_completed: bool,
) -> ThrowResponse {
    ThrowResponse {
        throw: ThrowInfo {
            dart_number,
            segment,
            multiplier,
            points,
        },
        turn: Some(TurnScore { score: points }),
        is_bust,
        game_completed,
        remaining_score: 501 - points,
    }
}

/// Leg view whose current turn holds one throw per entry in `points`.
pub fn leg_view(leg_id: LegId, player_id: PlayerId, points: &[i32], is_bust: bool) -> CurrentLegView {
    let throws = points
        .iter()
        .zip(1u8..)
        .map(|(&points, dart_number)| ThrowInfo {
            dart_number,
            segment: 20,
            multiplier: 1,
            points,
        })
        .collect();

    CurrentLegView {
        leg: LegInfo {
            id: leg_id,
            remaining_score: Some(501),
        },
        current_player_id: Some(player_id),
        current_turn: Some(CurrentTurn { throws, is_bust }),
    }
}

struct Script {
    calls: Vec<Call>,
    /// Consumed front to back; an empty queue echoes the request as a plain score
    throw_results: VecDeque<Result<ThrowResponse>>,
    leg_view: Result<CurrentLegView>,
    active_matches: Vec<MatchId>,
    next_player: PlayerId,
}

pub struct MockApi {
    reachable: AtomicBool,
    probes: AtomicUsize,
    script: Mutex<Script>,
}

impl MockApi {
    /// Reachable server with match 1, leg 10 and player 100 on a fresh turn.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            reachable: AtomicBool::new(true),
            probes: AtomicUsize::new(0),
            script: Mutex::new(Script {
                calls: Vec::new(),
                throw_results: VecDeque::new(),
                leg_view: Ok(leg_view(LEG_ID, 100, &[], false)),
                active_matches: vec![MATCH_ID],
                next_player: 200,
            }),
        })
    }

    /// While unreachable every call fails with a transport error.
    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }

    pub fn probe_count(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }

    pub fn push_throw_result(&self, result: Result<ThrowResponse>) {
        self.script().throw_results.push_back(result);
    }

    pub fn set_leg_view(&self, view: Result<CurrentLegView>) {
        self.script().leg_view = view;
    }

    pub fn set_active_matches(&self, ids: Vec<MatchId>) {
        self.script().active_matches = ids;
    }

    pub fn set_next_player(&self, player_id: PlayerId) {
        self.script().next_player = player_id;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.script().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.script().calls.clear();
    }

    /// Every throw submission received, including rejected ones.
    pub fn submitted(&self) -> Vec<ThrowRequest> {
        self.script()
            .calls
            .iter()
            .filter_map(|call| match call {
                Call::SubmitThrow { request, .. } => Some(*request),
                _ => None,
            })
            .collect()
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap()
    }

    fn record(&self, call: Call) -> Result<()> {
        self.script().calls.push(call);
        if self.reachable.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(Error::Transport("connection refused".into()))
        }
    }
}

#[async_trait]
impl GameApi for MockApi {
    async fn probe(&self) -> Result<()> {
        self.probes.fetch_add(1, Ordering::SeqCst);
        if self.reachable.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(Error::Transport("connection refused".into()))
        }
    }

    async fn list_players(&self) -> Result<Vec<Player>> {
        self.record(Call::ListPlayers)?;
        Ok(vec![
            Player {
                id: 100,
                name: "Alice".into(),
                nickname: None,
            },
            Player {
                id: 200,
                name: "Bob".into(),
                nickname: Some("Bully".into()),
            },
        ])
    }

    async fn active_matches(&self) -> Result<Vec<MatchSummary>> {
        self.record(Call::ActiveMatches)?;
        Ok(self
            .script()
            .active_matches
            .iter()
            .map(|&id| MatchSummary { id })
            .collect())
    }

    async fn current_leg(&self, match_id: MatchId) -> Result<CurrentLegView> {
        self.record(Call::CurrentLeg(match_id))?;
        self.script().leg_view.clone()
    }

    async fn create_match(&self, request: &NewMatchRequest) -> Result<CreatedMatch> {
        self.record(Call::CreateMatch(request.player_ids.clone()))?;
        Ok(CreatedMatch {
            match_info: MatchSummary { id: MATCH_ID },
            leg: StartedLeg {
                leg: LegInfo {
                    id: LEG_ID,
                    remaining_score: Some(501),
                },
            },
        })
    }

    async fn submit_throw(
        &self,
        match_id: MatchId,
        leg_id: LegId,
        request: &ThrowRequest,
    ) -> Result<ThrowResponse> {
        self.record(Call::SubmitThrow {
            match_id,
            leg_id,
            request: *request,
        })?;
        match self.script().throw_results.pop_front() {
            Some(result) => result,
            None => Ok(throw_response(
                request.dart_number,
                request.segment,
                request.multiplier,
                i32::from(request.segment) * i32::from(request.multiplier),
                false,
                false,
            )),
        }
    }

    async fn undo_last_throw(&self, match_id: MatchId, leg_id: LegId) -> Result<()> {
        self.record(Call::Undo(match_id, leg_id))
    }

    async fn next_player(&self, match_id: MatchId, leg_id: LegId) -> Result<NextPlayerResponse> {
        self.record(Call::NextPlayer(match_id, leg_id))?;
        Ok(NextPlayerResponse {
            next_player_id: self.script().next_player,
        })
    }

    async fn player_stats(&self, player_id: PlayerId) -> Result<serde_json::Value> {
        self.record(Call::PlayerStats(player_id))?;
        Ok(serde_json::json!({ "player_id": player_id, "games_played": 0 }))
    }
}
