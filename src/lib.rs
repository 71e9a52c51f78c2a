//! Darts Match State Library
//!
//! Client-side state engine for a darts scoring app backed by a REST game
//! server.
//!
//! # Overview
//!
//! - **Turn Tracker** - Which dart (1-3) is next in the current turn, whether
//!   the turn busted, and which inputs the UI should enable.
//!
//! - **Match Session** - Owns the active match, the turn tracker and the
//!   offline queue. Every throw, undo and next-player action goes through it.
//!
//! - **Offline Queue** - Throws recorded while the server is unreachable,
//!   replayed in order once it comes back.
//!
//! - **Connectivity Monitor** - Online/offline signal driven by a periodic
//!   liveness probe and by in-flight request failures.
//!
//! - **Reconciliation** - After every confirmed mutation, local state is
//!   overwritten from the server's current-leg view.
//!
//! # Design Principles
//!
//! 1. **The server is authoritative** - Local bookkeeping is optimistic and
//!    always yields to the next reconciliation.
//!
//! 2. **No throw is lost** - A throw that cannot reach the server is queued,
//!    never dropped, and leaves the queue only once the server confirmed it.
//!
//! 3. **Explicit ownership** - No globals. A [`MatchSession`] is constructed
//!    and passed around; the probe loop shares it behind a lock.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use darts_state::{ClientConfig, HttpGameApi, MatchSession};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> darts_state::Result<()> {
//!     let config = ClientConfig::from_env();
//!     let api = Arc::new(HttpGameApi::new(&config)?);
//!     let (mut session, mut notices) = MatchSession::new(api, config);
//!
//!     if session.resolve_active_match().await?.is_none() {
//!         session.start_new_game(&[1, 2]).await?;
//!     }
//!
//!     let outcome = session.attempt_throw(20, 3).await?;
//!     println!("{outcome:?}, next dart {}", session.turn().dart_number());
//!
//!     // From here on the probe loop replays offline throws automatically
//!     let (shared, probe) = session.into_shared();
//!     shared.lock().await.attempt_throw(19, 1).await?;
//!
//!     while let Ok(notice) = notices.try_recv() {
//!         println!("{notice}");
//!     }
//!     probe.shutdown().await;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod monitor;
pub mod notice;
pub mod outcome;
pub mod reconcile;
pub mod session;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;

pub use api::http::HttpGameApi;
pub use api::GameApi;
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use monitor::{ProbeHandles, ProbeLoop};
pub use notice::{Notice, Notifier};
pub use outcome::{interpret, ThrowOutcome};
pub use session::{MatchSession, Reconciliation, ReplayOutcome, ReplayReport, SharedSession};

// Re-export everything from state module at crate root
pub use state::*;
