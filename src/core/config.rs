use super::ship::ShipKind;

pub const BOARD_SIZE: u8 = 10;

/// Fleet composition: size class and how many ships of it every player fields.
pub const FLEET: [(ShipKind, usize); 4] = [
    (ShipKind::Small, 4),
    (ShipKind::Medium, 3),
    (ShipKind::Large, 2),
    (ShipKind::Huge, 1),
];

pub const NUM_SHIPS: usize = 4 + 3 + 2 + 1;

/// Total number of ship segments in the standard fleet.
pub const TOTAL_SHIP_CELLS: usize = 4 * 1 + 3 * 2 + 2 * 3 + 4;

/// Rejection-sampling budget for a single bot ship.
pub const MAX_PLACEMENT_ATTEMPTS: usize = 1000;

/// Uniform draws tried before the picker scans for untouched cells.
pub const MAX_RANDOM_TARGET_SAMPLES: usize = 64;

/// Participant id used for the autonomous opponent.
pub const BOT_ID: &str = "bot";

/// Expected number of ships of `kind` in a fleet.
pub fn fleet_count(kind: ShipKind) -> usize {
    FLEET
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, n)| *n)
        .unwrap_or(0)
}
