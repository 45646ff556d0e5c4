//! Battle sessions
//!
//! - `battle`: per-match state and attack resolution
//! - `registry`: live sessions by game id plus message fan-out
//! - `opponent`: timed driver for the autonomous opponent
//! - `collaborators`: interfaces to the outbox and the leaderboard

pub mod battle;
pub mod collaborators;
pub mod opponent;
pub mod participant;
pub mod registry;

pub use battle::{
    AttackReport, BattleSession, CellEvent, Outcome, Phase, Readiness, SessionError, SessionMode,
};
pub use collaborators::{Outbox, ScoreBoard};
pub use opponent::OpponentDriver;
pub use participant::Participant;
pub use registry::{Aim, SessionHandle, SessionRegistry};
