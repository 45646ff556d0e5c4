//! Headless self-play: two scripted players fight a duel through the
//! session registry, each firing random shots whenever it holds the turn.

use std::collections::HashMap;
use std::sync::Arc;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::Serialize;
use tokio::sync::Mutex;
use tokio::time::Duration;

use crate::config::EngineConfig;
use crate::core::{generate_fleet, BOARD_SIZE};
use crate::domain::PlayerId;
use crate::protocol::Outgoing;
use crate::session::{Outbox, Readiness, ScoreBoard, SessionRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ShotCount {
    pub player1: usize,
    pub player2: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulationReport {
    /// `"player1"` or `"player2"`.
    pub winner: String,
    pub shots: ShotCount,
}

/// Records what the registry tells each player.
#[derive(Default)]
struct Tally {
    turn: Mutex<Option<PlayerId>>,
    winner: Mutex<Option<PlayerId>>,
}

#[async_trait::async_trait]
impl Outbox for Tally {
    async fn send(&self, _to: &PlayerId, message: Outgoing) {
        if let Outgoing::Turn(turn) = message {
            *self.turn.lock().await = Some(turn.current_player);
        }
    }
}

#[async_trait::async_trait]
impl ScoreBoard for Tally {
    async fn record_win(&self, winner: &PlayerId) {
        *self.winner.lock().await = Some(winner.clone());
    }
}

/// Play one reproducible duel from `seed`.
pub async fn simulate_duel(seed: u64) -> anyhow::Result<SimulationReport> {
    let tally = Arc::new(Tally::default());
    let config = EngineConfig {
        bot_delay: Duration::ZERO,
        seed: Some(seed),
    };
    let registry = Arc::new(SessionRegistry::new(config, tally.clone(), tally.clone()));
    let player1 = PlayerId::new("player1");
    let player2 = PlayerId::new("player2");
    let game = registry.create_duel(player1.clone(), player2.clone()).await;

    let mut rng = SmallRng::seed_from_u64(seed);
    let mut readiness = Readiness::Waiting;
    for player in [&player1, &player2] {
        let ships = generate_fleet(&mut rng)?;
        readiness = registry.add_fleet(&game, player, &ships).await?;
    }
    if readiness == Readiness::Waiting {
        anyhow::bail!("duel did not start");
    }

    let mut shots: HashMap<PlayerId, usize> = HashMap::new();
    let cells = BOARD_SIZE as usize * BOARD_SIZE as usize;
    for _ in 0..2 * cells {
        if tally.winner.lock().await.is_some() {
            break;
        }
        let Some(turn) = tally.turn.lock().await.clone() else {
            anyhow::bail!("no turn announced");
        };
        registry
            .random_attack(&game, &turn)
            .await
            .ok_or_else(|| anyhow::anyhow!("attack by {} was rejected", turn))?;
        *shots.entry(turn).or_insert(0) += 1;
    }

    let winner = tally
        .winner
        .lock()
        .await
        .clone()
        .ok_or_else(|| anyhow::anyhow!("duel did not finish"))?;
    Ok(SimulationReport {
        winner: winner.to_string(),
        shots: ShotCount {
            player1: shots.get(&player1).copied().unwrap_or(0),
            player2: shots.get(&player2).copied().unwrap_or(0),
        },
    })
}
