//! Neighbor classification for autotile variant selection
//!
//! Derives `(tile class, rotation, dominant neighbor type)` for one cell
//! purely from its 3x3 neighborhood. Side and corner neighbors whose type
//! index outranks the cell's own form two 4-bit masks; a canonical-rotation
//! search collapses the masks to one of 15 tile classes plus the rotation
//! that maps the canonical art asset back onto the actual configuration.

use crate::core::types::{Rotation, TileClass, TileLocation, TileType, NONEXIST_TILE};
use crate::space::grid::TileGrid;

/// Side neighbors in mask-bit order: W, S, E, N
const MAJOR_OFFSETS: [(i32, i32); 4] = [(-1, 0), (0, 1), (1, 0), (0, -1)];

/// Corner neighbors in mask-bit order: SW, SE, NE, NW
///
/// Corner k sits between sides k and k+1, which is what the don't-care
/// collapse in `dont_care` relies on.
const MINOR_OFFSETS: [(i32, i32); 4] = [(-1, 1), (1, 1), (1, -1), (-1, -1)];

/// Classification result for one cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub type_index: u8,
    pub class: TileClass,
    pub rotation: Rotation,
    /// Dominant greater-neighbor type, equal to `type_index` when uniform
    pub neighbor_type: u8,
    major: u8,
    minor: u8,
}

impl Classification {
    /// True when no neighbor outranks the cell
    pub fn is_uniform(&self) -> bool {
        self.neighbor_type == self.type_index
    }

    /// Conventional asset key resolved by the external mesh factory
    ///
    /// Uniform cells use the bare tile name; transition cells use
    /// `<type>_<neighborType>_<majorMask>_<minorMask>` with masks printed
    /// bit 3 first and collapsed minor bits shown as `x`.
    pub fn model_key(&self, tile_types: &[TileType]) -> Option<String> {
        let own = tile_types.get(self.type_index as usize)?;
        if self.is_uniform() {
            return Some(own.name.clone());
        }
        let neighbor = tile_types.get(self.neighbor_type as usize)?;
        Some(format!(
            "{}_{}_{}_{}",
            own.name,
            neighbor.name,
            mask_string(self.major, 0),
            mask_string(self.minor, dont_care(self.major)),
        ))
    }
}

/// Classify a visible cell from the current grid contents
///
/// Pure read: the grid is not modified. Returns None out of map.
pub fn classify_cell(grid: &TileGrid, location: TileLocation) -> Option<Classification> {
    if !grid.is_in_map(location) {
        return None;
    }
    let ph = (location.h + 1) as usize;
    let pv = (location.v + 1) as usize;
    let own = grid.padded(ph, pv).type_index;

    let mut major = 0u8;
    let mut minor = 0u8;
    let mut neighbor_type = own;

    for (k, offset) in MAJOR_OFFSETS.iter().enumerate() {
        let value = contributed_type(grid, ph, pv, *offset);
        if value != NONEXIST_TILE && value > own {
            major |= 1 << k;
            neighbor_type = neighbor_type.max(value);
        }
    }
    for (k, offset) in MINOR_OFFSETS.iter().enumerate() {
        let value = contributed_type(grid, ph, pv, *offset);
        if value != NONEXIST_TILE && value > own {
            minor |= 1 << k;
            neighbor_type = neighbor_type.max(value);
        }
    }

    let (rotation, major, minor) = canonicalize(major, minor);

    Some(Classification {
        type_index: own,
        class: class_for(major, minor),
        rotation,
        neighbor_type,
        major,
        minor,
    })
}

/// Classify one cell and store the result back into it
pub(crate) fn reclassify(grid: &mut TileGrid, location: TileLocation) -> Option<Classification> {
    let classification = classify_cell(grid, location)?;
    let cell = grid.cell_mut(location)?;
    cell.class = classification.class;
    cell.rotation = classification.rotation;
    cell.neighbor_type = classification.neighbor_type;
    Some(classification)
}

/// Comparison value a neighbor feeds into the masks
///
/// A NONEXIST neighbor substitutes the minimum type found in its own 9-cell
/// neighborhood, so holes and out-of-map duplicates still compare sensibly.
fn contributed_type(grid: &TileGrid, ph: usize, pv: usize, offset: (i32, i32)) -> u8 {
    let nh = (ph as i32 + offset.0) as usize;
    let nv = (pv as i32 + offset.1) as usize;
    let value = grid.padded(nh, nv).type_index;
    if value == NONEXIST_TILE {
        neighborhood_min(grid, nh, nv)
    } else {
        value
    }
}

/// Minimum type index over a padded cell and its in-bounds neighbors
fn neighborhood_min(grid: &TileGrid, ph: usize, pv: usize) -> u8 {
    let padded = grid.padded_size() as i32;
    let mut min = grid.padded(ph, pv).type_index;
    for dv in -1..=1i32 {
        for dh in -1..=1i32 {
            if dh == 0 && dv == 0 {
                continue;
            }
            let nh = ph as i32 + dh;
            let nv = pv as i32 + dv;
            if nh < 0 || nv < 0 || nh >= padded || nv >= padded {
                continue;
            }
            min = min.min(grid.padded(nh as usize, nv as usize).type_index);
        }
    }
    min
}

/// Rotate a 4-bit mask one step: bit k moves to k+1, bit 3 wraps to bit 0
fn rotate_left(mask: u8) -> u8 {
    ((mask << 1) | (mask >> 3)) & 0b1111
}

/// Canonical-rotation search over the paired masks
///
/// Picks the rotation with the numerically greatest major mask (bit 3 most
/// significant); when no side is marked the minor mask decides instead.
/// Strictly-greater comparison keeps the lowest rotation on ties.
fn canonicalize(major: u8, minor: u8) -> (Rotation, u8, u8) {
    let mut best = (major, minor);
    let mut best_turns = 0u8;
    let mut rotated = (major, minor);
    for turns in 1..4u8 {
        rotated = (rotate_left(rotated.0), rotate_left(rotated.1));
        let better = if major != 0 {
            rotated.0 > best.0
        } else {
            rotated.1 > best.1
        };
        if better {
            best = rotated;
            best_turns = turns;
        }
    }
    (Rotation::from_quarter_turns(best_turns), best.0, best.1)
}

/// Minor bits subsumed by a marked side: corner k flanks sides k and k+1
fn dont_care(major: u8) -> u8 {
    let mut mask = 0u8;
    for k in 0..4u8 {
        if major & (1 << k) != 0 || major & (1 << ((k + 1) % 4)) != 0 {
            mask |= 1 << k;
        }
    }
    mask
}

/// The 15-entry decision table over canonicalized masks
fn class_for(major: u8, minor: u8) -> TileClass {
    let significant = minor & !dont_care(major) & 0b1111;
    match (major, significant) {
        (0b0000, 0b0000) => TileClass::Solid,
        (0b0000, 0b1000) => TileClass::InnerCorner,
        (0b0000, 0b1100) => TileClass::InnerCornerPair,
        (0b0000, 0b1010) => TileClass::InnerCornerOpposite,
        (0b0000, 0b1110) => TileClass::InnerCornerTriple,
        (0b0000, 0b1111) => TileClass::InnerCornerQuad,
        (0b1000, 0b0000) => TileClass::Edge,
        (0b1000, 0b0001) => TileClass::EdgeCornerLeft,
        (0b1000, 0b0010) => TileClass::EdgeCornerRight,
        (0b1000, 0b0011) => TileClass::EdgeCornerBoth,
        (0b1100, 0b0000) => TileClass::OuterCorner,
        (0b1100, 0b0001) => TileClass::OuterCornerInner,
        (0b1010, _) => TileClass::OppositeEdges,
        (0b1110, _) => TileClass::ThreeEdges,
        (0b1111, _) => TileClass::Surrounded,
        // Masks arrive canonicalized; no other pair is reachable
        _ => TileClass::Solid,
    }
}

/// Render a mask bit 3 first, collapsed bits as 'x'
fn mask_string(mask: u8, dont_care: u8) -> String {
    (0..4)
        .rev()
        .map(|k| {
            if dont_care & (1 << k) != 0 {
                'x'
            } else if mask & (1 << k) != 0 {
                '1'
            } else {
                '0'
            }
        })
        .collect()
}
