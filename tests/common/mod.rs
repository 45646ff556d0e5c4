#![allow(dead_code)]

use std::sync::Arc;

use fleet_arena::core::{Orientation, Position, ShipKind, ShipPlacement};
use fleet_arena::domain::PlayerId;
use fleet_arena::protocol::Outgoing;
use fleet_arena::session::{Outbox, ScoreBoard};
use tokio::sync::Mutex;

pub fn ship(x: u8, y: u8, orientation: Orientation, kind: ShipKind) -> ShipPlacement {
    ShipPlacement::new(Position::new(x, y), orientation, kind)
}

/// A valid 4/3/2/1 fleet laid out on rows 0, 2 and 4.
pub fn standard_fleet() -> Vec<ShipPlacement> {
    use Orientation::Horizontal as H;
    vec![
        ship(0, 0, H, ShipKind::Huge),
        ship(5, 0, H, ShipKind::Large),
        ship(0, 2, H, ShipKind::Large),
        ship(4, 2, H, ShipKind::Medium),
        ship(7, 2, H, ShipKind::Medium),
        ship(0, 4, H, ShipKind::Medium),
        ship(3, 4, H, ShipKind::Small),
        ship(5, 4, H, ShipKind::Small),
        ship(7, 4, H, ShipKind::Small),
        ship(9, 4, H, ShipKind::Small),
    ]
}

/// Outbox that remembers every message per recipient.
#[derive(Default)]
pub struct RecordingOutbox {
    pub sent: Mutex<Vec<(PlayerId, Outgoing)>>,
}

impl RecordingOutbox {
    pub async fn messages_for(&self, player: &PlayerId) -> Vec<Outgoing> {
        self.sent
            .lock()
            .await
            .iter()
            .filter(|(to, _)| to == player)
            .map(|(_, m)| m.clone())
            .collect()
    }

    pub async fn kinds_for(&self, player: &PlayerId) -> Vec<&'static str> {
        self.messages_for(player)
            .await
            .iter()
            .map(Outgoing::kind)
            .collect()
    }

    pub async fn clear(&self) {
        self.sent.lock().await.clear();
    }
}

#[async_trait::async_trait]
impl Outbox for RecordingOutbox {
    async fn send(&self, to: &PlayerId, message: Outgoing) {
        self.sent.lock().await.push((to.clone(), message));
    }
}

/// Score board that counts every recorded win.
#[derive(Default)]
pub struct CountingScores {
    pub wins: Mutex<Vec<PlayerId>>,
}

#[async_trait::async_trait]
impl ScoreBoard for CountingScores {
    async fn record_win(&self, winner: &PlayerId) {
        self.wins.lock().await.push(winner.clone());
    }
}

pub fn collaborators() -> (Arc<RecordingOutbox>, Arc<CountingScores>) {
    (
        Arc::new(RecordingOutbox::default()),
        Arc::new(CountingScores::default()),
    )
}
