//! Live battle sessions keyed by game id, and the message fan-out that
//! follows every state change.

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, error, info};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tokio::sync::{watch, Mutex};

use crate::config::EngineConfig;
use crate::core::{encode_fleet, generate_fleet, Position, ShipPlacement};
use crate::domain::{GameId, PlayerId};
use crate::protocol::{AttackFeedback, CreateGame, Finish, Outgoing, StartGame, Turn};

use super::battle::{AttackReport, BattleSession, Outcome, Readiness, SessionError};
use super::collaborators::{Outbox, ScoreBoard};
use super::opponent::OpponentDriver;
use super::participant::Participant;

/// Shared handle to one session; the lock makes each attack atomic.
pub type SessionHandle = Arc<Mutex<BattleSession>>;

/// Where an attack is aimed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aim {
    At(Position),
    Random,
}

pub struct SessionRegistry {
    sessions: Mutex<HashMap<GameId, SessionHandle>>,
    rng: Mutex<SmallRng>,
    outbox: Arc<dyn Outbox>,
    scores: Arc<dyn ScoreBoard>,
    config: EngineConfig,
}

impl SessionRegistry {
    pub fn new(config: EngineConfig, outbox: Arc<dyn Outbox>, scores: Arc<dyn ScoreBoard>) -> Self {
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_rng(&mut rand::rng()),
        };
        Self {
            sessions: Mutex::new(HashMap::new()),
            rng: Mutex::new(rng),
            outbox,
            scores,
            config,
        }
    }

    async fn insert(&self, session: BattleSession) -> GameId {
        let id = session.id().clone();
        self.sessions
            .lock()
            .await
            .insert(id.clone(), Arc::new(Mutex::new(session)));
        id
    }

    /// Create a human-vs-human session and notify both players.
    pub async fn create_duel(&self, first: PlayerId, second: PlayerId) -> GameId {
        self.open_duel(GameId::generate(), first, second).await
    }

    /// Like [`create_duel`](Self::create_duel) under an id reserved by the caller.
    pub async fn open_duel(&self, id: GameId, first: PlayerId, second: PlayerId) -> GameId {
        let session = BattleSession::duel(id, first, second);
        self.announce(&session).await;
        let id = self.insert(session).await;
        info!("[{}] duel session created", id);
        id
    }

    /// Create a human-vs-bot session with the bot fleet generated up front.
    pub async fn create_versus_bot(&self, human: PlayerId) -> Result<GameId, SessionError> {
        self.open_versus_bot(GameId::generate(), human).await
    }

    pub async fn open_versus_bot(&self, id: GameId, human: PlayerId) -> Result<GameId, SessionError> {
        let ships = {
            let mut rng = self.rng.lock().await;
            generate_fleet(&mut *rng).map_err(|e| {
                error!("bot fleet generation failed: {}", e);
                e
            })?
        };
        let session = BattleSession::versus_bot(id, human, encode_fleet(&ships)?);
        self.announce(&session).await;
        let id = self.insert(session).await;
        info!("[{}] single-player session created", id);
        Ok(id)
    }

    async fn announce(&self, session: &BattleSession) {
        for participant in session.participants() {
            let message = Outgoing::CreateGame(CreateGame {
                id_game: session.id().clone(),
                id_player: participant.id().clone(),
            });
            self.deliver(participant, message).await;
        }
    }

    pub async fn get(&self, id: &GameId) -> Option<SessionHandle> {
        self.sessions.lock().await.get(id).cloned()
    }

    /// Remove a session. Dropping it closes its cancellation signal.
    pub async fn delete(&self, id: &GameId) -> bool {
        self.sessions.lock().await.remove(id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Run `f` against the session under its lock and return the result.
    pub async fn with_session<T>(
        &self,
        id: &GameId,
        f: impl FnOnce(&mut BattleSession) -> T,
    ) -> Option<T> {
        let handle = self.get(id).await?;
        let mut session = handle.lock().await;
        Some(f(&mut session))
    }

    /// Submit `player`'s fleet. When both fleets are in, every human gets
    /// `start_game` with their own ships followed by `turn`.
    pub async fn add_fleet(
        &self,
        game: &GameId,
        player: &PlayerId,
        placements: &[ShipPlacement],
    ) -> Result<Readiness, SessionError> {
        let handle = self
            .get(game)
            .await
            .ok_or_else(|| SessionError::NotFound(game.clone()))?;
        let mut session = handle.lock().await;
        let readiness = {
            let mut rng = self.rng.lock().await;
            session.add_fleet(player, placements, &mut *rng)?
        };

        if let Readiness::Started { turn } = &readiness {
            info!("[{}] both fleets ready, {} starts", game, turn);
            for participant in session.participants() {
                let ships = session
                    .fleet(participant.id())
                    .map(|f| f.placements().to_vec())
                    .unwrap_or_default();
                let start = Outgoing::StartGame(StartGame {
                    current_player_index: participant.id().clone(),
                    ships,
                });
                self.deliver(participant, start).await;
                let first = Outgoing::Turn(Turn {
                    current_player: turn.clone(),
                });
                self.deliver(participant, first).await;
            }
        }
        Ok(readiness)
    }

    /// Human attack at a chosen cell.
    pub async fn attack(
        self: &Arc<Self>,
        game: &GameId,
        player: &PlayerId,
        target: Position,
    ) -> Option<AttackReport> {
        let (report, handover) = self.fire(game, player, Aim::At(target)).await?;
        self.hand_over(game, handover);
        Some(report)
    }

    /// Human attack at a random untouched cell.
    pub async fn random_attack(self: &Arc<Self>, game: &GameId, player: &PlayerId) -> Option<AttackReport> {
        let (report, handover) = self.fire(game, player, Aim::Random).await?;
        self.hand_over(game, handover);
        Some(report)
    }

    fn hand_over(self: &Arc<Self>, game: &GameId, handover: Option<watch::Receiver<bool>>) {
        if let Some(cancelled) = handover {
            OpponentDriver::new(
                Arc::clone(self),
                game.clone(),
                PlayerId::bot(),
                self.config.bot_delay,
                cancelled,
            )
            .spawn();
        }
    }

    /// Resolve one attack and broadcast its result. A finished game is
    /// removed from the registry and its winner reported.
    ///
    /// The second value is set when the turn just passed to the bot and
    /// carries the session's cancellation signal for the driver.
    pub(crate) async fn fire(
        &self,
        game: &GameId,
        player: &PlayerId,
        aim: Aim,
    ) -> Option<(AttackReport, Option<watch::Receiver<bool>>)> {
        let Some(handle) = self.get(game).await else {
            debug!("[{}] skip attack from {}: no such session", game, player);
            return None;
        };
        let mut session = handle.lock().await;
        let report = match aim {
            Aim::At(target) => session.resolve_attack(player, target)?,
            Aim::Random => {
                let mut rng = self.rng.lock().await;
                session.resolve_random_attack(player, &mut *rng)?
            }
        };

        for participant in session.participants() {
            for event in &report.events {
                let message = Outgoing::Attack(AttackFeedback {
                    status: event.status,
                    position: event.position,
                    current_player: report.attacker.clone(),
                });
                self.deliver(participant, message).await;
            }
            let turn = Outgoing::Turn(Turn {
                current_player: report.turn.clone(),
            });
            self.deliver(participant, turn).await;
        }

        if let Some(winner) = report.winner() {
            self.conclude(&session, winner).await;
            return Some((report, None));
        }

        let handover = (report.outcome == Outcome::Miss && session.is_bot(&report.turn))
            .then(|| session.cancellation());
        Some((report, handover))
    }

    /// End `game` because `leaving` disconnected. Returns the winner.
    pub async fn finish_when_participant_leaves(
        &self,
        game: &GameId,
        leaving: &PlayerId,
    ) -> Option<PlayerId> {
        let handle = self.get(game).await?;
        let mut session = handle.lock().await;
        let winner = session.finish_when_participant_leaves(leaving)?;
        info!("[{}] {} left, {} wins", game, leaving, winner);
        self.conclude(&session, &winner).await;
        Some(winner)
    }

    async fn conclude(&self, session: &BattleSession, winner: &PlayerId) {
        for participant in session.participants() {
            let finish = Outgoing::Finish(Finish {
                win_player: winner.clone(),
            });
            self.deliver(participant, finish).await;
        }
        self.delete(session.id()).await;
        self.scores.record_win(winner).await;
        info!("[{}] finished, winner {}", session.id(), winner);
    }

    async fn deliver(&self, participant: &Participant, message: Outgoing) {
        if participant.has_connection() {
            self.outbox.send(participant.id(), message).await;
        }
    }
}
