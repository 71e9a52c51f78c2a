//! Offline throw queue.
//!
//! Throws recorded while the server is unreachable are appended here and
//! replayed in FIFO order once connectivity returns. An entry leaves the
//! queue only after the server confirmed it.

use std::collections::VecDeque;

use serde::Serialize;

use super::active::PlayerId;
use super::dart::Dart;

/// A throw recorded while offline. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueuedThrow {
    /// Monotonic identity key, used for removal after a confirmed replay.
    pub id: u64,
    pub player_id: PlayerId,
    pub segment: u8,
    pub multiplier: u8,
    pub dart_number: u8,
    pub enqueued_at: chrono::DateTime<chrono::Utc>,
}

impl QueuedThrow {
    pub fn dart(&self) -> Dart {
        Dart {
            segment: self.segment,
            multiplier: self.multiplier,
        }
    }
}

/// Append-only FIFO of offline throws.
#[derive(Debug, Default)]
pub struct OfflineQueue {
    entries: VecDeque<QueuedThrow>,
    /// Last id handed out; never reused, even across `clear`.
    last_id: u64,
}

impl OfflineQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a throw and return its id.
    pub fn enqueue(&mut self, player_id: PlayerId, dart: Dart, dart_number: u8) -> u64 {
        self.last_id += 1;
        self.entries.push_back(QueuedThrow {
            id: self.last_id,
            player_id,
            segment: dart.segment,
            multiplier: dart.multiplier,
            dart_number,
            enqueued_at: chrono::Utc::now(),
        });
        self.last_id
    }

    /// Oldest entry, the next one to replay.
    pub fn front(&self) -> Option<&QueuedThrow> {
        self.entries.front()
    }

    /// Remove exactly the entry with this id.
    pub fn remove(&mut self, id: u64) -> Option<QueuedThrow> {
        let index = self.entries.iter().position(|t| t.id == id)?;
        self.entries.remove(index)
    }

    /// Drop everything, returning how many entries were discarded.
    pub fn clear(&mut self) -> usize {
        let dropped = self.entries.len();
        self.entries.clear();
        dropped
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &QueuedThrow> {
        self.entries.iter()
    }
}
