//! Per-match state and the attack resolution state machine.

use log::debug;
use rand::Rng;
use thiserror::Error;
use tokio::sync::watch;

use crate::core::{
    common::{FleetError, GenerationError},
    fleet::{validate_fleet, EncodedFleet},
    pick_target, Position, ShipPlacement, TouchedCells,
};
use crate::domain::{GameId, PlayerId};
use crate::protocol::AttackStatus;

use super::participant::Participant;

/// Errors surfaced by session lifecycle operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no session with id {0}")]
    NotFound(GameId),
    #[error("{0} is not a participant of this session")]
    UnknownParticipant(PlayerId),
    #[error("{0} already submitted a fleet")]
    FleetAlreadySubmitted(PlayerId),
    #[error("session is no longer accepting fleets")]
    NotAcceptingFleets,
    #[error("invalid fleet: {0}")]
    InvalidFleet(#[from] FleetError),
    #[error("bot fleet generation failed: {0}")]
    Generation(#[from] GenerationError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    Duel,
    VersusBot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    AwaitingFleets,
    InProgress { turn: PlayerId },
    Finished { winner: PlayerId },
}

/// Result of submitting a fleet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Readiness {
    /// The other side has not submitted yet.
    Waiting,
    /// Both fleets are in; play starts with `turn`.
    Started { turn: PlayerId },
}

/// Overall class of a resolved attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Miss,
    Shot,
    Killed,
    /// The attack sank the defender's last ship.
    Finished,
}

/// One affected cell, reported to both participants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellEvent {
    pub status: AttackStatus,
    pub position: Position,
}

/// Everything a resolved attack changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttackReport {
    pub attacker: PlayerId,
    pub defender: PlayerId,
    pub target: Position,
    pub outcome: Outcome,
    pub events: Vec<CellEvent>,
    /// Turn holder after the attack.
    pub turn: PlayerId,
}

impl AttackReport {
    pub fn winner(&self) -> Option<&PlayerId> {
        (self.outcome == Outcome::Finished).then_some(&self.attacker)
    }
}

#[derive(Debug)]
struct Side {
    participant: Participant,
    fleet: Option<EncodedFleet>,
    /// Cells the opponent has fired upon on this side's board.
    touched: TouchedCells,
}

impl Side {
    fn new(participant: Participant) -> Self {
        Self {
            participant,
            fleet: None,
            touched: TouchedCells::new(),
        }
    }
}

/// Mutable state of one game between two participants.
#[derive(Debug)]
pub struct BattleSession {
    id: GameId,
    mode: SessionMode,
    sides: [Side; 2],
    phase: Phase,
    cancel: watch::Sender<bool>,
}

impl BattleSession {
    /// Human-vs-human session; both fleets arrive later.
    pub fn duel(id: GameId, first: PlayerId, second: PlayerId) -> Self {
        Self::with_sides(
            id,
            SessionMode::Duel,
            [
                Side::new(Participant::Human(first)),
                Side::new(Participant::Human(second)),
            ],
        )
    }

    /// Human-vs-bot session with the bot's fleet already encoded.
    pub fn versus_bot(id: GameId, human: PlayerId, bot_fleet: EncodedFleet) -> Self {
        let mut bot = Side::new(Participant::bot());
        bot.fleet = Some(bot_fleet);
        Self::with_sides(
            id,
            SessionMode::VersusBot,
            [Side::new(Participant::Human(human)), bot],
        )
    }

    fn with_sides(id: GameId, mode: SessionMode, sides: [Side; 2]) -> Self {
        let (cancel, _) = watch::channel(false);
        Self {
            id,
            mode,
            sides,
            phase: Phase::AwaitingFleets,
            cancel,
        }
    }

    pub fn id(&self) -> &GameId {
        &self.id
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Current turn holder while the game is in progress.
    pub fn turn(&self) -> Option<&PlayerId> {
        match &self.phase {
            Phase::InProgress { turn } => Some(turn),
            _ => None,
        }
    }

    pub fn participants(&self) -> impl Iterator<Item = &Participant> {
        self.sides.iter().map(|s| &s.participant)
    }

    pub fn participant(&self, player: &PlayerId) -> Option<&Participant> {
        self.side_index(player).map(|i| &self.sides[i].participant)
    }

    pub fn opponent_of(&self, player: &PlayerId) -> Option<&Participant> {
        self.side_index(player).map(|i| &self.sides[1 - i].participant)
    }

    pub fn is_bot(&self, player: &PlayerId) -> bool {
        self.participant(player).is_some_and(Participant::is_bot)
    }

    /// Encoded fleet owned by `player`.
    pub fn fleet(&self, player: &PlayerId) -> Option<&EncodedFleet> {
        self.side_index(player)
            .and_then(|i| self.sides[i].fleet.as_ref())
    }

    /// Cells fired upon on `player`'s board.
    pub fn touched(&self, player: &PlayerId) -> Option<&TouchedCells> {
        self.side_index(player).map(|i| &self.sides[i].touched)
    }

    fn side_index(&self, player: &PlayerId) -> Option<usize> {
        self.sides
            .iter()
            .position(|s| s.participant.id() == player)
    }

    fn ready_count(&self) -> usize {
        self.sides.iter().filter(|s| s.fleet.is_some()).count()
    }

    /// Receiver that flips to `true` (or closes) once the session ends.
    pub fn cancellation(&self) -> watch::Receiver<bool> {
        self.cancel.subscribe()
    }

    fn finish(&mut self, winner: PlayerId) {
        self.phase = Phase::Finished { winner };
        self.cancel.send_replace(true);
    }

    /// Validate and encode `placements` for `player`.
    pub fn add_fleet<R: Rng + ?Sized>(
        &mut self,
        player: &PlayerId,
        placements: &[ShipPlacement],
        rng: &mut R,
    ) -> Result<Readiness, SessionError> {
        let fleet = validate_fleet(placements)?;
        self.add_encoded_fleet(player, fleet, rng)
    }

    /// Store an already encoded fleet for `player`. Once both sides are in,
    /// picks the starting turn: random for a duel, the human against a bot.
    pub fn add_encoded_fleet<R: Rng + ?Sized>(
        &mut self,
        player: &PlayerId,
        fleet: EncodedFleet,
        rng: &mut R,
    ) -> Result<Readiness, SessionError> {
        if self.phase != Phase::AwaitingFleets {
            return Err(SessionError::NotAcceptingFleets);
        }
        let index = self
            .side_index(player)
            .ok_or_else(|| SessionError::UnknownParticipant(player.clone()))?;
        let side = &mut self.sides[index];
        if side.fleet.is_some() {
            return Err(SessionError::FleetAlreadySubmitted(player.clone()));
        }
        side.fleet = Some(fleet);
        side.touched = TouchedCells::new();

        if self.ready_count() < self.sides.len() {
            return Ok(Readiness::Waiting);
        }
        let starter = match self.mode {
            SessionMode::Duel => rng.random_range(0..self.sides.len()),
            SessionMode::VersusBot => self
                .sides
                .iter()
                .position(|s| !s.participant.is_bot())
                .unwrap_or(0),
        };
        let turn = self.sides[starter].participant.id().clone();
        self.phase = Phase::InProgress { turn: turn.clone() };
        Ok(Readiness::Started { turn })
    }

    /// Resolve `attacker` firing at `target`.
    ///
    /// Returns `None`, changing nothing, when the game is not in progress,
    /// the attacker does not hold the turn, or the target is off the board.
    /// The turn passes to the defender only on a miss.
    pub fn resolve_attack(&mut self, attacker: &PlayerId, target: Position) -> Option<AttackReport> {
        if !target.in_bounds() {
            debug!("[{}] attack at {} is off the board", self.id, target);
            return None;
        }
        match &self.phase {
            Phase::InProgress { turn } if turn == attacker => {}
            _ => {
                debug!("[{}] skip attack from {}: not their turn", self.id, attacker);
                return None;
            }
        }
        let defender_index = 1 - self.side_index(attacker)?;
        let defender = self.sides[defender_index].participant.id().clone();

        let (outcome, events) = {
            let side = &mut self.sides[defender_index];
            let fleet = side.fleet.as_mut()?;
            let already_touched = !side.touched.insert(target);

            match fleet.label_at(target) {
                None => (
                    Outcome::Miss,
                    vec![CellEvent {
                        status: AttackStatus::Miss,
                        position: target,
                    }],
                ),
                Some(label) => {
                    let remaining = if already_touched {
                        fleet.hit_points(label).unwrap_or(0)
                    } else {
                        fleet.damage(label)
                    };
                    if remaining > 0 {
                        (
                            Outcome::Shot,
                            vec![CellEvent {
                                status: AttackStatus::Shot,
                                position: target,
                            }],
                        )
                    } else {
                        let mut events: Vec<CellEvent> = fleet
                            .coordinates(label)
                            .iter()
                            .map(|&position| CellEvent {
                                status: AttackStatus::Killed,
                                position,
                            })
                            .collect();
                        for &position in fleet.miss_ring(label) {
                            side.touched.insert(position);
                            events.push(CellEvent {
                                status: AttackStatus::Miss,
                                position,
                            });
                        }
                        let outcome = if fleet.all_sunk() {
                            Outcome::Finished
                        } else {
                            Outcome::Killed
                        };
                        (outcome, events)
                    }
                }
            }
        };

        let turn = match outcome {
            Outcome::Miss => {
                self.phase = Phase::InProgress {
                    turn: defender.clone(),
                };
                defender.clone()
            }
            Outcome::Finished => {
                self.finish(attacker.clone());
                attacker.clone()
            }
            Outcome::Shot | Outcome::Killed => attacker.clone(),
        };
        debug!(
            "[{}] {} -> {} at {}: {:?}",
            self.id, attacker, defender, target, outcome
        );
        Some(AttackReport {
            attacker: attacker.clone(),
            defender,
            target,
            outcome,
            events,
            turn,
        })
    }

    /// Untouched cell on the opponent's board, if `attacker` holds the turn.
    pub fn random_target<R: Rng + ?Sized>(&self, attacker: &PlayerId, rng: &mut R) -> Option<Position> {
        if self.turn() != Some(attacker) {
            return None;
        }
        let defender = 1 - self.side_index(attacker)?;
        pick_target(&self.sides[defender].touched, rng)
    }

    /// Fire at a random untouched cell of the opponent's board.
    pub fn resolve_random_attack<R: Rng + ?Sized>(
        &mut self,
        attacker: &PlayerId,
        rng: &mut R,
    ) -> Option<AttackReport> {
        let target = self.random_target(attacker, rng)?;
        self.resolve_attack(attacker, target)
    }

    /// End the session because `leaving` disconnected; the other
    /// participant wins unconditionally. `None` if already finished or
    /// `leaving` is not part of this session.
    pub fn finish_when_participant_leaves(&mut self, leaving: &PlayerId) -> Option<PlayerId> {
        if matches!(self.phase, Phase::Finished { .. }) {
            return None;
        }
        let winner = self.opponent_of(leaving)?.id().clone();
        self.finish(winner.clone());
        Some(winner)
    }
}
