//! Ship placement, size class and label types.

use core::fmt;
use serde::{Deserialize, Serialize};

use super::config::BOARD_SIZE;

/// A cell on the 10×10 grid. `x` is the column, `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: u8,
    pub y: u8,
}

impl Position {
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// Build a position from signed coordinates, `None` when off the grid.
    pub fn checked(x: i16, y: i16) -> Option<Self> {
        let size = BOARD_SIZE as i16;
        if (0..size).contains(&x) && (0..size).contains(&y) {
            Some(Self::new(x as u8, y as u8))
        } else {
            None
        }
    }

    pub fn in_bounds(&self) -> bool {
        self.x < BOARD_SIZE && self.y < BOARD_SIZE
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Orientation of a ship on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Grows along `x`.
    Horizontal,
    /// Grows along `y`.
    Vertical,
}

impl Orientation {
    /// Wire encoding: `direction == true` means the ship grows along `y`.
    pub fn from_direction(direction: bool) -> Self {
        if direction {
            Orientation::Vertical
        } else {
            Orientation::Horizontal
        }
    }

    pub fn direction(self) -> bool {
        matches!(self, Orientation::Vertical)
    }

    /// Unit step `(dx, dy)` along the ship's line.
    pub fn step(self) -> (i16, i16) {
        match self {
            Orientation::Horizontal => (1, 0),
            Orientation::Vertical => (0, 1),
        }
    }
}

/// Size class of a ship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShipKind {
    Small,
    Medium,
    Large,
    Huge,
}

impl ShipKind {
    pub const ALL: [ShipKind; 4] = [
        ShipKind::Small,
        ShipKind::Medium,
        ShipKind::Large,
        ShipKind::Huge,
    ];

    pub const fn length(self) -> u8 {
        match self {
            ShipKind::Small => 1,
            ShipKind::Medium => 2,
            ShipKind::Large => 3,
            ShipKind::Huge => 4,
        }
    }

    pub fn from_length(length: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.length() == length)
    }
}

/// A declared ship as submitted by a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipPlacement {
    pub position: Position,
    pub direction: bool,
    pub length: u8,
    #[serde(rename = "type")]
    pub kind: ShipKind,
}

impl ShipPlacement {
    pub fn new(position: Position, orientation: Orientation, kind: ShipKind) -> Self {
        Self {
            position,
            direction: orientation.direction(),
            length: kind.length(),
            kind,
        }
    }

    pub fn orientation(&self) -> Orientation {
        Orientation::from_direction(self.direction)
    }

    /// Cells covered by the ship, in order from the anchor. Cells falling
    /// off the grid are reported as `None`.
    pub fn cells(&self) -> impl Iterator<Item = Option<Position>> + '_ {
        let (dx, dy) = self.orientation().step();
        let (x, y) = (self.position.x as i16, self.position.y as i16);
        (0..self.length as i16).map(move |i| Position::checked(x + dx * i, y + dy * i))
    }
}

/// Per-session ship identifier: size class plus ordinal within that class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShipLabel {
    pub kind: ShipKind,
    pub ordinal: u8,
}

impl fmt::Display for ShipLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.kind.length(), self.ordinal)
    }
}
