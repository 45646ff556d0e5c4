//! A fixed-size bitboard over grid positions.
//!
//! Boards are an `N×N` grid packed into the unsigned integer `T`, one bit per
//! cell at index `y * N + x`. The engine uses it for the per-defender
//! touched-cells set.

use core::{fmt, mem};
use num_traits::{PrimInt, Unsigned, Zero};

use super::config::BOARD_SIZE;
use super::ship::Position;

/// Touched-cells set for one defender on the standard board.
pub type TouchedCells = BitBoard<u128, { BOARD_SIZE as usize }>;

/// A fixed-size N×N bitboard stored in the unsigned integer `T`.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct BitBoard<T, const N: usize>
where
    T: PrimInt + Unsigned + Zero,
{
    bits: T,
}

impl<T, const N: usize> BitBoard<T, N>
where
    T: PrimInt + Unsigned + Zero,
{
    const BOARD_BITS: usize = N * N;

    // Fails to compile for a `T` too narrow to hold the board.
    const FITS: () = assert!(N * N <= mem::size_of::<T>() * 8);

    /// Create an empty bitboard.
    #[inline]
    pub fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::FITS;
        BitBoard { bits: T::zero() }
    }

    #[inline]
    fn index(pos: Position) -> Option<usize> {
        let (x, y) = (pos.x as usize, pos.y as usize);
        (x < N && y < N).then_some(y * N + x)
    }

    /// Whether `pos` is set. Off-board positions are never set.
    pub fn contains(&self, pos: Position) -> bool {
        match Self::index(pos) {
            Some(idx) => ((self.bits >> idx) & T::one()) != T::zero(),
            None => false,
        }
    }

    /// Set `pos`, returning `true` if it was not set before.
    /// Off-board positions are ignored and report `false`.
    pub fn insert(&mut self, pos: Position) -> bool {
        let Some(idx) = Self::index(pos) else {
            return false;
        };
        let fresh = !self.contains(pos);
        self.bits = self.bits | (T::one() << idx);
        fresh
    }

    /// Number of set cells.
    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_zero()
    }

    /// `true` once every cell of the board is set.
    pub fn is_full(&self) -> bool {
        self.len() == Self::BOARD_BITS
    }

    /// Positions that are set, in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = Position> + '_ {
        self.cells().filter(|p| self.contains(*p))
    }

    /// Positions that are not set, in row-major order.
    pub fn iter_unset(&self) -> impl Iterator<Item = Position> + '_ {
        self.cells().filter(|p| !self.contains(*p))
    }

    fn cells(&self) -> impl Iterator<Item = Position> {
        (0..Self::BOARD_BITS).map(|idx| Position::new((idx % N) as u8, (idx / N) as u8))
    }
}

impl<T, const N: usize> Default for BitBoard<T, N>
where
    T: PrimInt + Unsigned + Zero,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> FromIterator<Position> for BitBoard<T, N>
where
    T: PrimInt + Unsigned + Zero,
{
    fn from_iter<I: IntoIterator<Item = Position>>(iter: I) -> Self {
        let mut board = Self::new();
        for pos in iter {
            board.insert(pos);
        }
        board
    }
}

impl<T, const N: usize> fmt::Debug for BitBoard<T, N>
where
    T: PrimInt + Unsigned + Zero,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "BitBoard<{}x{}>:", N, N)?;
        for y in 0..N {
            for x in 0..N {
                let cell = if self.contains(Position::new(x as u8, y as u8)) {
                    '■'
                } else {
                    '□'
                };
                write!(f, "{} ", cell)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
