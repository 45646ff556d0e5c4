//! Fleet encoding: turns a declared ship layout into a queryable grid plus
//! per-ship hit points, miss rings and occupied coordinates.

use std::collections::BTreeMap;

use super::common::FleetError;
use super::config::{fleet_count, BOARD_SIZE};
use super::ship::{Position, ShipKind, ShipLabel, ShipPlacement};

const GRID: usize = BOARD_SIZE as usize;

/// Cell ownership, indexed `[y][x]`.
pub type Grid = [[Option<ShipLabel>; GRID]; GRID];

/// One player's fleet after encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedFleet {
    grid: Grid,
    hit_points: BTreeMap<ShipLabel, u8>,
    miss_ring: BTreeMap<ShipLabel, Vec<Position>>,
    coordinates: BTreeMap<ShipLabel, Vec<Position>>,
    placements: Vec<ShipPlacement>,
}

impl EncodedFleet {
    /// Label of the ship occupying `pos`, if any.
    pub fn label_at(&self, pos: Position) -> Option<ShipLabel> {
        if !pos.in_bounds() {
            return None;
        }
        self.grid[pos.y as usize][pos.x as usize]
    }

    /// Remaining hit points of `label`.
    pub fn hit_points(&self, label: ShipLabel) -> Option<u8> {
        self.hit_points.get(&label).copied()
    }

    /// Take one point of damage on `label`, returning what is left.
    pub(crate) fn damage(&mut self, label: ShipLabel) -> u8 {
        match self.hit_points.get_mut(&label) {
            Some(hp) => {
                *hp = hp.saturating_sub(1);
                *hp
            }
            None => 0,
        }
    }

    /// Cells bordering `label`, guaranteed empty for a valid fleet.
    pub fn miss_ring(&self, label: ShipLabel) -> &[Position] {
        self.miss_ring.get(&label).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Cells occupied by `label`, from the anchor outwards.
    pub fn coordinates(&self, label: ShipLabel) -> &[Position] {
        self.coordinates.get(&label).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn labels(&self) -> impl Iterator<Item = ShipLabel> + '_ {
        self.hit_points.keys().copied()
    }

    /// `true` when no ship has hit points left.
    pub fn all_sunk(&self) -> bool {
        self.hit_points.values().all(|hp| *hp == 0)
    }

    /// Sum of remaining hit points across the fleet.
    pub fn remaining_cells(&self) -> usize {
        self.hit_points.values().map(|hp| *hp as usize).sum()
    }

    /// The layout as it was submitted.
    pub fn placements(&self) -> &[ShipPlacement] {
        &self.placements
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }
}

/// Encode `placements` in input order.
///
/// Rejects ships whose length disagrees with their size class, ships that
/// leave the grid and overlapping ships. Adjacency and fleet composition are
/// left to [`validate_fleet`].
pub fn encode_fleet(placements: &[ShipPlacement]) -> Result<EncodedFleet, FleetError> {
    let mut fleet = EncodedFleet {
        grid: [[None; GRID]; GRID],
        hit_points: BTreeMap::new(),
        miss_ring: BTreeMap::new(),
        coordinates: BTreeMap::new(),
        placements: placements.to_vec(),
    };
    let mut ordinals: BTreeMap<ShipKind, u8> = BTreeMap::new();

    for (index, placement) in placements.iter().enumerate() {
        if ShipKind::from_length(placement.length).is_none() {
            return Err(FleetError::InvalidLength {
                index,
                length: placement.length,
            });
        }
        if placement.kind.length() != placement.length {
            return Err(FleetError::LengthMismatch {
                index,
                kind: placement.kind,
                length: placement.length,
            });
        }
        let cells = placement
            .cells()
            .collect::<Option<Vec<_>>>()
            .ok_or(FleetError::OutOfBounds { index })?;

        let ordinal = ordinals.entry(placement.kind).or_insert(0);
        *ordinal += 1;
        let label = ShipLabel {
            kind: placement.kind,
            ordinal: *ordinal,
        };

        for &cell in &cells {
            let slot = &mut fleet.grid[cell.y as usize][cell.x as usize];
            if slot.is_some() {
                return Err(FleetError::Overlap { index, at: cell });
            }
            *slot = Some(label);
        }
        fleet.hit_points.insert(label, placement.length);
        fleet.miss_ring.insert(label, miss_ring(placement));
        fleet.coordinates.insert(label, cells);
    }
    Ok(fleet)
}

/// Encode `placements` and additionally require that no two ships touch
/// (diagonals included) and that the fleet has the standard composition.
pub fn validate_fleet(placements: &[ShipPlacement]) -> Result<EncodedFleet, FleetError> {
    let fleet = encode_fleet(placements)?;

    for (index, placement) in placements.iter().enumerate() {
        if let Some(at) = miss_ring(placement)
            .into_iter()
            .find(|cell| fleet.label_at(*cell).is_some())
        {
            return Err(FleetError::Adjacent { index, at });
        }
    }

    for kind in ShipKind::ALL {
        let expected = fleet_count(kind);
        let found = placements.iter().filter(|p| p.kind == kind).count();
        if found != expected {
            return Err(FleetError::Composition {
                kind,
                expected,
                found,
            });
        }
    }
    Ok(fleet)
}

/// Cells bordering a ship: both end caps, then the two flanking lines
/// (corners included), clipped to the grid.
pub fn miss_ring(placement: &ShipPlacement) -> Vec<Position> {
    let (dx, dy) = placement.orientation().step();
    let (x, y) = (placement.position.x as i16, placement.position.y as i16);
    let len = placement.length as i16;

    let mut around = vec![(x - dx, y - dy), (x + dx * len, y + dy * len)];
    for i in -1..=len {
        around.push((x - dy + i * dx, y - dx + i * dy));
        around.push((x + dy + i * dx, y + dx + i * dy));
    }
    around
        .into_iter()
        .filter_map(|(cx, cy)| Position::checked(cx, cy))
        .collect()
}
