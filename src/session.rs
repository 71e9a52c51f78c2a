//! Match session.
//!
//! [`MatchSession`] is the explicitly constructed object that owns all
//! client state for one scoring session: the active match identifiers, the
//! turn tracker and the offline queue. It mediates every throw attempt,
//! reconciles with the server after each confirmed mutation and replays
//! queued throws once the server is reachable again.
//!
//! # Throw attempt flow
//!
//! ```text
//!  attempt_throw(segment, multiplier)
//!        │
//!        ├─ no active match ───────────────▶ Err(NoActiveGame)
//!        ├─ turn terminal ─────────────────▶ Err(TurnComplete)
//!        │
//!        ├─ offline ───────────────────────▶ enqueue, dart += 1 (optimistic)
//!        │
//!        └─ online ── submit ──┬─ ok ──────▶ interpret, reconcile
//!                              ├─ transport ▶ flip offline, enqueue
//!                              └─ rejected ─▶ notice, reconcile, Err
//! ```
//!
//! All mutating methods take `&mut self`, so at most one throw attempt or
//! replay runs per session. The probe loop shares the session through
//! [`SharedSession`] and only ever `try_lock`s it.

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tracing::{debug, error, info, warn};

use crate::api::{GameApi, NewMatchRequest, Player, ThrowRequest};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::monitor::{ProbeHandles, ProbeLoop};
use crate::notice::{Notice, Notifier};
use crate::outcome::{interpret, ThrowOutcome};
use crate::reconcile::apply_leg_view;
use crate::state::{
    ActiveMatch, Connectivity, ConnectivityMonitor, Controls, Dart, OfflineQueue, PlayerId,
    QueuedThrow, SessionSnapshot, TurnTracker,
};

/// Session shared between the UI and the probe loop.
pub type SharedSession<A> = Arc<Mutex<MatchSession<A>>>;

/// Result of a reconciliation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    /// Local state now mirrors the server.
    Applied,
    /// Nothing to reconcile.
    NoActiveGame,
    /// Fetch failed; local state kept as last known.
    Skipped,
    /// The server no longer knows the match; session cleared.
    MatchGone,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayOutcome {
    /// Queue is empty.
    Drained,
    /// Stopped at the first failed entry, which stays queued with everything after it.
    Halted { error: Error },
    NotAttempted { reason: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayReport {
    pub submitted: usize,
    pub remaining: usize,
    pub outcome: ReplayOutcome,
}

/// Client-side state for one scoring session.
pub struct MatchSession<A> {
    api: Arc<A>,
    config: ClientConfig,
    monitor: ConnectivityMonitor,
    notifier: Notifier,

    /// Match being scored; all ids set together or none
    active: Option<ActiveMatch>,

    turn: TurnTracker,

    queue: OfflineQueue,

    /// Players from the last `load_players`
    players: Vec<Player>,
}

impl<A: GameApi> MatchSession<A> {
    /// Create a session with its own connectivity monitor.
    ///
    /// Returns the session and the receiving end of its notice channel.
    pub fn new(api: Arc<A>, config: ClientConfig) -> (Self, mpsc::UnboundedReceiver<Notice>) {
        Self::with_monitor(api, config, ConnectivityMonitor::new())
    }

    /// Create a session driven by an existing monitor.
    pub fn with_monitor(
        api: Arc<A>,
        config: ClientConfig,
        monitor: ConnectivityMonitor,
    ) -> (Self, mpsc::UnboundedReceiver<Notice>) {
        let (notifier, notices) = Notifier::channel();
        let session = Self {
            api,
            config,
            monitor,
            notifier,
            active: None,
            turn: TurnTracker::new(),
            queue: OfflineQueue::new(),
            players: Vec::new(),
        };
        (session, notices)
    }

    /// Move the session behind a lock and start its probe loop.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn into_shared(self) -> (SharedSession<A>, ProbeLoop)
    where
        A: 'static,
    {
        let handles = self.probe_handles();
        let period = self.config.probe_interval;
        let shared = Arc::new(Mutex::new(self));
        let probe = ProbeLoop::spawn(Arc::clone(&shared), handles, period);
        (shared, probe)
    }

    /// What a probe loop needs without holding the session.
    pub fn probe_handles(&self) -> ProbeHandles<A> {
        ProbeHandles {
            api: Arc::clone(&self.api),
            monitor: self.monitor.clone(),
            notifier: self.notifier.clone(),
        }
    }

    // Accessors

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn active_match(&self) -> Option<ActiveMatch> {
        self.active
    }

    pub fn has_active_game(&self) -> bool {
        self.active.is_some()
    }

    pub fn turn(&self) -> &TurnTracker {
        &self.turn
    }

    /// Inputs to enable. Everything is disabled without an active game.
    pub fn controls(&self) -> Controls {
        if self.active.is_some() {
            self.turn.controls()
        } else {
            Controls::default()
        }
    }

    /// Throws waiting to sync.
    pub fn pending_throws(&self) -> usize {
        self.queue.len()
    }

    pub fn queued_throws(&self) -> impl Iterator<Item = &QueuedThrow> {
        self.queue.iter()
    }

    pub fn connectivity(&self) -> Connectivity {
        self.monitor.connectivity()
    }

    pub fn monitor(&self) -> &ConnectivityMonitor {
        &self.monitor
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::new(
            self.active,
            &self.turn,
            self.monitor.connectivity(),
            self.queue.len(),
        )
    }

    // Operations

    /// Record a dart for the current player.
    ///
    /// Transport failures are not errors here: the throw is queued and the
    /// monitor flips to offline.
    pub async fn attempt_throw(&mut self, segment: u8, multiplier: u8) -> Result<ThrowOutcome> {
        let Some(active) = self.active else {
            return self.fail(Error::NoActiveGame);
        };
        let dart = match Dart::new(segment, multiplier) {
            Ok(dart) => dart,
            Err(e) => return self.fail(e),
        };

        self.turn.heal();
        if self.turn.is_turn_complete() {
            return self.fail(Error::TurnComplete);
        }

        debug!(snapshot = ?self.snapshot(), segment, multiplier, "attempting throw");

        let request = ThrowRequest {
            player_id: active.player_id,
            segment: dart.segment,
            multiplier: dart.multiplier,
            dart_number: self.turn.dart_number(),
        };

        if !self.monitor.is_online() {
            return Ok(self.enqueue(&request));
        }

        match self
            .api
            .submit_throw(active.match_id, active.leg_id, &request)
            .await
        {
            Ok(response) => {
                let outcome = match interpret(&mut self.turn, &response) {
                    Ok(outcome) => outcome,
                    Err(e) => {
                        error!(error = %e, ?response, "unexpected throw response");
                        return self.fail(e);
                    }
                };
                if let Some(notice) = outcome.notice() {
                    self.notifier.notify(notice);
                }
                self.reconcile().await;
                Ok(outcome)
            }
            Err(e) if e.is_transport() => {
                self.note_transport(&e);
                Ok(self.enqueue(&request))
            }
            Err(e @ Error::MalformedResponse(_)) => {
                // Outcome unknown; leave the turn as it was.
                error!(error = %e, ?request, "undecodable throw response");
                self.fail(e)
            }
            Err(e) => {
                warn!(error = %e, ?request, "throw rejected");
                self.notify_failure(&e);
                self.reconcile().await;
                Err(e)
            }
        }
    }

    /// Create a match on the server and make it the active one.
    ///
    /// The first selected player throws first. Any offline queue from a
    /// previous match is discarded.
    pub async fn start_new_game(&mut self, player_ids: &[PlayerId]) -> Result<ActiveMatch> {
        let first = match player_ids {
            [first, _, ..] => *first,
            _ => {
                return self.fail(Error::InsufficientPlayers {
                    selected: player_ids.len(),
                })
            }
        };

        let request = NewMatchRequest {
            player_ids: player_ids.to_vec(),
            game_type: self.config.game_type.clone(),
        };

        let created = match self.api.create_match(&request).await {
            Ok(created) => created,
            Err(e) => {
                self.note_transport(&e);
                return self.fail(e);
            }
        };

        let active = ActiveMatch::new(created.match_info.id, created.leg.leg.id, first);
        self.active = Some(active);
        self.turn.reset();
        let dropped = self.queue.clear();
        if dropped > 0 {
            warn!(dropped, "discarded offline throws from previous match");
        }
        info!(%active, players = ?player_ids, "new game started");

        self.notifier.notify(Notice::NewGame);
        self.reconcile().await;
        Ok(active)
    }

    pub async fn undo_last_throw(&mut self) -> Result<()> {
        let Some(active) = self.active else {
            return self.fail(Error::NoActiveGame);
        };

        if let Err(e) = self
            .api
            .undo_last_throw(active.match_id, active.leg_id)
            .await
        {
            self.note_transport(&e);
            return self.fail(e);
        }

        info!(%active, "last throw undone");
        self.reconcile().await;
        self.notifier.notify(Notice::ThrowUndone);
        Ok(())
    }

    /// Hand the board to the next player. The only way out of a terminal turn.
    pub async fn advance_to_next_player(&mut self) -> Result<PlayerId> {
        let Some(mut active) = self.active else {
            return self.fail(Error::NoActiveGame);
        };

        let response = match self.api.next_player(active.match_id, active.leg_id).await {
            Ok(response) => response,
            Err(e) => {
                self.note_transport(&e);
                return self.fail(e);
            }
        };

        active.player_id = response.next_player_id;
        self.active = Some(active);
        self.turn.reset();
        info!(player_id = active.player_id, "advanced to next player");

        self.reconcile().await;
        let player_id = self.active.map_or(response.next_player_id, |a| a.player_id);
        self.notifier.notify(Notice::NowPlaying { player_id });
        Ok(player_id)
    }

    /// Pick up the most recent active match (highest id) from the server.
    ///
    /// Replaces any local state. Returns `None` when the server has no
    /// active match.
    pub async fn resolve_active_match(&mut self) -> Result<Option<ActiveMatch>> {
        let matches = match self.api.active_matches().await {
            Ok(matches) => matches,
            Err(e) => {
                self.note_transport(&e);
                self.clear();
                return Err(e);
            }
        };

        let Some(latest) = matches.iter().map(|m| m.id).max() else {
            info!("no active matches");
            self.clear();
            return Ok(None);
        };

        let view = match self.api.current_leg(latest).await {
            Ok(view) => view,
            Err(e) if e.is_not_found() => {
                info!(match_id = latest, "latest match has no current leg");
                self.clear();
                return Ok(None);
            }
            Err(e) => {
                self.note_transport(&e);
                self.clear();
                return Err(e);
            }
        };

        let Some(mut active) =
            ActiveMatch::from_parts(Some(latest), Some(view.leg.id), view.current_player_id)
        else {
            warn!(match_id = latest, "current leg has no current player");
            self.clear();
            return Ok(None);
        };

        apply_leg_view(&mut active, &mut self.turn, &view);
        self.active = Some(active);
        info!(%active, turn = %self.turn, "resumed active match");
        Ok(Some(active))
    }

    /// Drop local state and pick up the server's latest match again.
    pub async fn refresh(&mut self) -> Result<Option<ActiveMatch>> {
        self.reset();
        self.resolve_active_match().await
    }

    /// Clear match, turn and offline queue.
    pub fn reset(&mut self) {
        info!(snapshot = ?self.snapshot(), "resetting session");
        self.clear();
    }

    /// Overwrite local ids and turn from the server's current-leg view.
    pub async fn reconcile(&mut self) -> Reconciliation {
        let Some(active) = self.active else {
            return Reconciliation::NoActiveGame;
        };

        match self.api.current_leg(active.match_id).await {
            Ok(view) => {
                let mut updated = active;
                apply_leg_view(&mut updated, &mut self.turn, &view);
                self.active = Some(updated);
                debug!(active = %updated, turn = %self.turn, "reconciled");
                Reconciliation::Applied
            }
            Err(e) if e.is_not_found() => {
                warn!(%active, error = %e, "match gone, clearing session");
                self.clear();
                self.notifier.notify(Notice::MatchGone);
                Reconciliation::MatchGone
            }
            Err(e) => {
                warn!(%active, error = %e, "reconciliation skipped");
                Reconciliation::Skipped
            }
        }
    }

    /// Submit queued throws in FIFO order, stopping at the first failure.
    pub async fn replay_offline_queue(&mut self) -> ReplayReport {
        if self.queue.is_empty() {
            return ReplayReport {
                submitted: 0,
                remaining: 0,
                outcome: ReplayOutcome::Drained,
            };
        }
        if !self.monitor.is_online() {
            return self.replay_not_attempted("offline");
        }
        let Some(active) = self.active else {
            return self.replay_not_attempted("no active game");
        };

        info!(pending = self.queue.len(), %active, "replaying offline throws");

        let mut submitted = 0;
        let mut halted = None;
        while let Some(entry) = self.queue.front().cloned() {
            let dart = entry.dart();
            let request = ThrowRequest {
                player_id: entry.player_id,
                segment: dart.segment,
                multiplier: dart.multiplier,
                dart_number: entry.dart_number,
            };

            match self
                .api
                .submit_throw(active.match_id, active.leg_id, &request)
                .await
            {
                Ok(_) => {
                    self.queue.remove(entry.id);
                    submitted += 1;
                    debug!(id = entry.id, remaining = self.queue.len(), "offline throw synced");
                }
                Err(e) => {
                    warn!(id = entry.id, error = %e, "replay halted");
                    self.note_transport(&e);
                    halted = Some(e);
                    break;
                }
            }
        }

        if submitted > 0 {
            self.reconcile().await;
        }

        let outcome = match halted {
            Some(error) => ReplayOutcome::Halted { error },
            None => {
                self.notifier.notify(Notice::OfflineSynced);
                ReplayOutcome::Drained
            }
        };
        ReplayReport {
            submitted,
            remaining: self.queue.len(),
            outcome,
        }
    }

    /// Fetch and cache the player list.
    pub async fn load_players(&mut self) -> Result<&[Player]> {
        match self.api.list_players().await {
            Ok(players) => {
                debug!(count = players.len(), "players loaded");
                self.players = players;
                Ok(self.players.as_slice())
            }
            Err(e) => {
                self.note_transport(&e);
                self.fail(e)
            }
        }
    }

    /// Raw statistics for one player.
    pub async fn player_stats(&self, player_id: PlayerId) -> Result<serde_json::Value> {
        match self.api.player_stats(player_id).await {
            Ok(stats) => Ok(stats),
            Err(e) => {
                self.note_transport(&e);
                self.fail(e)
            }
        }
    }

    // Internals

    fn enqueue(&mut self, request: &ThrowRequest) -> ThrowOutcome {
        let dart = Dart {
            segment: request.segment,
            multiplier: request.multiplier,
        };
        let id = self
            .queue
            .enqueue(request.player_id, dart, request.dart_number);

        // Optimistic; the next reconciliation overwrites it.
        if let Err(e) = self.turn.record_success() {
            debug!(error = %e, "optimistic dart advance skipped");
        }

        let outcome = ThrowOutcome::Queued {
            id,
            pending: self.queue.len(),
        };
        info!(id, pending = self.queue.len(), ?request, "throw queued offline");
        if let Some(notice) = outcome.notice() {
            self.notifier.notify(notice);
        }
        outcome
    }

    fn replay_not_attempted(&self, reason: &'static str) -> ReplayReport {
        debug!(reason, pending = self.queue.len(), "replay not attempted");
        ReplayReport {
            submitted: 0,
            remaining: self.queue.len(),
            outcome: ReplayOutcome::NotAttempted { reason },
        }
    }

    fn clear(&mut self) {
        self.active = None;
        self.turn.reset();
        self.queue.clear();
    }

    fn note_transport(&self, err: &Error) {
        if err.is_transport() && self.monitor.report_transport_failure().is_some() {
            self.notifier.notify(Notice::ConnectionLost);
        }
    }

    fn notify_failure(&self, err: &Error) {
        self.notifier.notify(Notice::Failure {
            message: err.to_string(),
        });
    }

    fn fail<T>(&self, err: Error) -> Result<T> {
        if err.is_local() {
            debug!(error = %err, "refused locally");
        } else {
            warn!(error = %err, "operation failed");
        }
        self.notify_failure(&err);
        Err(err)
    }
}
