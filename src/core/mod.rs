//! Core battle logic
//!
//! Pure, synchronous game rules: fleet encoding and validation, bot fleet
//! generation and random targeting. Nothing here touches the network or
//! the async runtime.

pub mod bitboard;
pub mod common;
pub mod config;
pub mod fleet;
pub mod generator;
pub mod ship;
pub mod targeting;

pub use bitboard::{BitBoard, TouchedCells};
pub use common::{FleetError, GenerationError};
pub use config::*;
pub use fleet::{encode_fleet, miss_ring, validate_fleet, EncodedFleet, Grid};
pub use generator::generate_fleet;
pub use ship::{Orientation, Position, ShipKind, ShipLabel, ShipPlacement};
pub use targeting::pick_target;
