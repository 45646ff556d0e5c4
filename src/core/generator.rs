//! Random fleet layouts for the autonomous opponent.

use rand::Rng;

use super::common::GenerationError;
use super::config::{BOARD_SIZE, FLEET, MAX_PLACEMENT_ATTEMPTS};
use super::fleet::miss_ring;
use super::ship::{Orientation, Position, ShipKind, ShipPlacement};

const GRID: usize = BOARD_SIZE as usize;

/// Produce a full standard fleet where no two ships overlap or touch.
///
/// Ships are placed largest first by rejection sampling; a ship that cannot
/// be placed within [`MAX_PLACEMENT_ATTEMPTS`] aborts generation.
pub fn generate_fleet<R: Rng + ?Sized>(rng: &mut R) -> Result<Vec<ShipPlacement>, GenerationError> {
    let mut occupied = [[false; GRID]; GRID];
    let mut ships = Vec::with_capacity(FLEET.iter().map(|(_, n)| n).sum());

    for &(kind, count) in FLEET.iter().rev() {
        for _ in 0..count {
            let placement = random_placement(rng, &occupied, kind)?;
            for cell in placement.cells().flatten() {
                occupied[cell.y as usize][cell.x as usize] = true;
            }
            ships.push(placement);
        }
    }
    Ok(ships)
}

fn random_placement<R: Rng + ?Sized>(
    rng: &mut R,
    occupied: &[[bool; GRID]; GRID],
    kind: ShipKind,
) -> Result<ShipPlacement, GenerationError> {
    let len = kind.length() as usize;
    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        let orientation = if rng.random_bool(0.5) {
            Orientation::Vertical
        } else {
            Orientation::Horizontal
        };
        let (max_x, max_y) = match orientation {
            Orientation::Horizontal => (GRID - len, GRID - 1),
            Orientation::Vertical => (GRID - 1, GRID - len),
        };
        let x = rng.random_range(0..=max_x) as u8;
        let y = rng.random_range(0..=max_y) as u8;
        let candidate = ShipPlacement::new(Position::new(x, y), orientation, kind);
        if area_is_free(occupied, &candidate) {
            return Ok(candidate);
        }
    }
    Err(GenerationError {
        kind,
        attempts: MAX_PLACEMENT_ATTEMPTS,
    })
}

/// The candidate footprint padded by one cell on every side must be empty.
/// The padding is the same ring a sunk ship reveals.
fn area_is_free(occupied: &[[bool; GRID]; GRID], candidate: &ShipPlacement) -> bool {
    candidate
        .cells()
        .flatten()
        .chain(miss_ring(candidate))
        .all(|cell| !occupied[cell.y as usize][cell.x as usize])
}
