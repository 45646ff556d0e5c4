//! Random target selection for "random attack" requests and the bot.

use rand::seq::IteratorRandom;
use rand::Rng;

use super::bitboard::TouchedCells;
use super::config::{BOARD_SIZE, MAX_RANDOM_TARGET_SAMPLES};
use super::ship::Position;

/// Pick a cell the defender has not been fired upon at yet.
///
/// Draws uniform cells and rejects touched ones; after
/// [`MAX_RANDOM_TARGET_SAMPLES`] draws it picks uniformly among the remaining
/// untouched cells instead. Returns `None` only for a fully touched board.
pub fn pick_target<R: Rng + ?Sized>(touched: &TouchedCells, rng: &mut R) -> Option<Position> {
    if touched.is_full() {
        return None;
    }
    for _ in 0..MAX_RANDOM_TARGET_SAMPLES {
        let pos = Position::new(
            rng.random_range(0..BOARD_SIZE),
            rng.random_range(0..BOARD_SIZE),
        );
        if !touched.contains(pos) {
            return Some(pos);
        }
    }
    touched.iter_unset().choose(rng)
}
