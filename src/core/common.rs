//! Errors raised by fleet encoding and bot fleet generation.

use thiserror::Error;

use super::ship::{Position, ShipKind};

/// Reason a submitted fleet layout was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FleetError {
    #[error("ship {index} has length {length}, which is not a valid ship length")]
    InvalidLength { index: usize, length: u8 },
    #[error("ship {index} declares type {kind:?} but has length {length}")]
    LengthMismatch { index: usize, kind: ShipKind, length: u8 },
    #[error("ship {index} does not fit on the board")]
    OutOfBounds { index: usize },
    #[error("ship {index} overlaps another ship at {at}")]
    Overlap { index: usize, at: Position },
    #[error("ship {index} touches another ship at {at}")]
    Adjacent { index: usize, at: Position },
    #[error("fleet has {found} ships of type {kind:?}, expected {expected}")]
    Composition {
        kind: ShipKind,
        expected: usize,
        found: usize,
    },
}

/// The bot fleet generator ran out of placement attempts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unable to place a {kind:?} ship after {attempts} attempts")]
pub struct GenerationError {
    pub kind: ShipKind,
    pub attempts: usize,
}
