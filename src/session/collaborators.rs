//! Interfaces the engine consumes from the surrounding server.

use crate::domain::PlayerId;
use crate::protocol::Outgoing;

/// Delivers messages to live participants.
#[async_trait::async_trait]
pub trait Outbox: Send + Sync {
    async fn send(&self, to: &PlayerId, message: Outgoing);
}

/// Leaderboard updater notified once per finished session.
#[async_trait::async_trait]
pub trait ScoreBoard: Send + Sync {
    async fn record_win(&self, winner: &PlayerId);
}
