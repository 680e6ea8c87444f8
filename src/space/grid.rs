//! Padded tile grid with border clamping and world-space transforms
//!
//! The visible map is stored inside a one-cell border ring so every real cell
//! has a full 8-neighborhood without bounds checks in the classifier. Storage
//! is a single flat row-major buffer with explicit bounds-checked accessors.

use glam::Vec3;

use crate::core::error::{Result, SpaceError};
use crate::core::types::{Rotation, TileClass, TileLocation, NONEXIST_TILE};

/// One cell of the padded grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapCell {
    /// Index into the tile palette, or NONEXIST_TILE
    pub type_index: u8,
    /// Dominant greater-neighbor type feeding the transition art
    pub neighbor_type: u8,
    pub rotation: Rotation,
    pub class: TileClass,
}

impl Default for MapCell {
    fn default() -> Self {
        Self {
            type_index: NONEXIST_TILE,
            neighbor_type: NONEXIST_TILE,
            rotation: Rotation::R0,
            class: TileClass::Solid,
        }
    }
}

/// The padded tile grid backing one space
///
/// Visible location `(h, v)` lives at padded `(h + 1, v + 1)`. The outer ring
/// duplicates the adjacent interior edge cell (corners duplicate the nearest
/// interior corner), so classification inputs exist for every visible cell.
#[derive(Debug, Clone)]
pub struct TileGrid {
    visible_size: usize,
    padded_size: usize,
    tile_size: i32,
    cells: Vec<MapCell>,
}

impl TileGrid {
    /// Build the padded grid from a row-major buffer of visible type indices
    ///
    /// Fails when the buffer does not hold exactly `visible_size²` cells.
    /// Classification fields start at their defaults; the caller runs the
    /// classifier pass after construction.
    pub fn from_type_indices(
        visible_size: usize,
        tile_size: i32,
        indices: &[u8],
    ) -> Result<Self> {
        let expected = visible_size * visible_size;
        if indices.len() != expected {
            return Err(SpaceError::MapSizeMismatch {
                expected,
                actual: indices.len(),
            });
        }

        let padded_size = visible_size + 2;
        let mut grid = Self {
            visible_size,
            padded_size,
            tile_size,
            cells: vec![MapCell::default(); padded_size * padded_size],
        };

        for v in 0..visible_size {
            for h in 0..visible_size {
                grid.cells[(v + 1) * padded_size + (h + 1)].type_index =
                    indices[v * visible_size + h];
            }
        }
        grid.fill_border();

        Ok(grid)
    }

    /// Duplicate the interior edge into the border ring
    fn fill_border(&mut self) {
        let last = self.padded_size - 1;

        let corners = [
            ((0, 0), (1, 1)),
            ((last, 0), (last - 1, 1)),
            ((0, last), (1, last - 1)),
            ((last, last), (last - 1, last - 1)),
        ];
        for ((ring_h, ring_v), (src_h, src_v)) in corners {
            let value = self.padded(src_h, src_v).type_index;
            self.padded_mut(ring_h, ring_v).type_index = value;
        }

        for i in 1..last {
            let top = self.padded(i, 1).type_index;
            self.padded_mut(i, 0).type_index = top;
            let bottom = self.padded(i, last - 1).type_index;
            self.padded_mut(i, last).type_index = bottom;
            let left = self.padded(1, i).type_index;
            self.padded_mut(0, i).type_index = left;
            let right = self.padded(last - 1, i).type_index;
            self.padded_mut(last, i).type_index = right;
        }
    }

    /// Refresh the border duplicates next to a mutated visible cell
    ///
    /// Only edge and corner cells of the visible map have duplicates; interior
    /// mutations leave the ring untouched.
    pub(crate) fn sync_border(&mut self, location: TileLocation) {
        let edge = self.visible_size as i32 - 1;
        if location.h == 0 || location.h == edge || location.v == 0 || location.v == edge {
            self.fill_border();
        }
    }

    pub fn visible_size(&self) -> usize {
        self.visible_size
    }

    pub fn tile_size(&self) -> i32 {
        self.tile_size
    }

    pub(crate) fn padded_size(&self) -> usize {
        self.padded_size
    }

    /// Padded-coordinate accessor; callers keep indices in range
    pub(crate) fn padded(&self, ph: usize, pv: usize) -> &MapCell {
        &self.cells[pv * self.padded_size + ph]
    }

    pub(crate) fn padded_mut(&mut self, ph: usize, pv: usize) -> &mut MapCell {
        &mut self.cells[pv * self.padded_size + ph]
    }

    /// True iff both coordinates are inside the visible map
    pub fn is_in_map(&self, location: TileLocation) -> bool {
        location.h >= 0
            && location.v >= 0
            && (location.h as usize) < self.visible_size
            && (location.v as usize) < self.visible_size
    }

    /// Visible-coordinate cell access
    pub fn cell(&self, location: TileLocation) -> Option<&MapCell> {
        if self.is_in_map(location) {
            Some(self.padded(location.h as usize + 1, location.v as usize + 1))
        } else {
            None
        }
    }

    pub(crate) fn cell_mut(&mut self, location: TileLocation) -> Option<&mut MapCell> {
        if self.is_in_map(location) {
            let ph = location.h as usize + 1;
            let pv = location.v as usize + 1;
            Some(self.padded_mut(ph, pv))
        } else {
            None
        }
    }

    /// Tile type at a visible location, NONEXIST_TILE when out of map
    pub fn type_index(&self, location: TileLocation) -> u8 {
        self.cell(location).map_or(NONEXIST_TILE, |c| c.type_index)
    }

    /// World-space center of a tile, on the y = 0 plane
    ///
    /// The grid is laid out symmetrically around the world origin.
    pub fn tile_center_position(&self, location: TileLocation) -> Vec3 {
        let half = (self.visible_size / 2) as i32;
        let x = ((location.h - half) * self.tile_size) as f32 + self.tile_size as f32 * 0.5;
        let z = ((location.v - half) * self.tile_size) as f32 + self.tile_size as f32 * 0.5;
        Vec3::new(x, 0.0, z)
    }

    /// Inverse of `tile_center_position`, clamped into the visible map
    pub fn tile_location(&self, position: Vec3) -> TileLocation {
        if self.visible_size == 0 {
            return crate::core::types::NONEXIST_LOCATION;
        }
        let half = (self.visible_size / 2) as i32;
        let edge = self.visible_size as i32 - 1;
        let h = (position.x / self.tile_size as f32).floor() as i32 + half;
        let v = (position.z / self.tile_size as f32).floor() as i32 + half;
        TileLocation::new(h.clamp(0, edge), v.clamp(0, edge))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform_grid(size: usize, type_index: u8) -> TileGrid {
        let indices = vec![type_index; size * size];
        TileGrid::from_type_indices(size, 10, &indices).unwrap()
    }

    #[test]
    fn test_rejects_wrong_buffer_size() {
        let result = TileGrid::from_type_indices(4, 10, &[0u8; 15]);
        assert_eq!(
            result.unwrap_err(),
            SpaceError::MapSizeMismatch {
                expected: 16,
                actual: 15
            }
        );
    }

    #[test]
    fn test_is_in_map_bounds() {
        let grid = uniform_grid(5, 0);
        for v in 0..5 {
            for h in 0..5 {
                assert!(grid.is_in_map(TileLocation::new(h, v)));
            }
        }
        assert!(!grid.is_in_map(TileLocation::new(-1, 0)));
        assert!(!grid.is_in_map(TileLocation::new(0, -1)));
        assert!(!grid.is_in_map(TileLocation::new(5, 0)));
        assert!(!grid.is_in_map(TileLocation::new(0, 5)));
        assert!(!grid.is_in_map(crate::core::types::NONEXIST_LOCATION));
    }

    #[test]
    fn test_border_ring_duplicates_interior() {
        // 3x3 map with distinct values to pin down every duplicate
        let indices = [1u8, 2, 3, 4, 5, 6, 7, 8, 9];
        let grid = TileGrid::from_type_indices(3, 10, &indices).unwrap();

        // Corners copy the nearest interior corner
        assert_eq!(grid.padded(0, 0).type_index, 1);
        assert_eq!(grid.padded(4, 0).type_index, 3);
        assert_eq!(grid.padded(0, 4).type_index, 7);
        assert_eq!(grid.padded(4, 4).type_index, 9);

        // Edge ring copies the adjacent interior edge cell
        assert_eq!(grid.padded(2, 0).type_index, 2);
        assert_eq!(grid.padded(2, 4).type_index, 8);
        assert_eq!(grid.padded(0, 2).type_index, 4);
        assert_eq!(grid.padded(4, 2).type_index, 6);
    }

    #[test]
    fn test_border_sync_after_edge_mutation() {
        let mut grid = uniform_grid(3, 1);
        let location = TileLocation::new(0, 1);
        grid.cell_mut(location).unwrap().type_index = 2;
        grid.sync_border(location);
        assert_eq!(grid.padded(0, 2).type_index, 2);
    }

    #[test]
    fn test_tile_center_position_layout() {
        let grid = uniform_grid(4, 0);
        // half = 2, tile_size = 10: tile (0,0) spans [-20,-10) with center -15
        assert_eq!(
            grid.tile_center_position(TileLocation::new(0, 0)),
            Vec3::new(-15.0, 0.0, -15.0)
        );
        assert_eq!(
            grid.tile_center_position(TileLocation::new(3, 2)),
            Vec3::new(15.0, 0.0, 5.0)
        );
    }

    #[test]
    fn test_location_position_round_trip() {
        for size in [3usize, 4, 5, 8] {
            let grid = uniform_grid(size, 0);
            for v in 0..size as i32 {
                for h in 0..size as i32 {
                    let location = TileLocation::new(h, v);
                    let center = grid.tile_center_position(location);
                    assert_eq!(grid.tile_location(center), location);
                }
            }
        }
    }

    #[test]
    fn test_tile_location_clamps_to_map() {
        let grid = uniform_grid(4, 0);
        let far = grid.tile_location(Vec3::new(1_000.0, 0.0, -1_000.0));
        assert_eq!(far, TileLocation::new(3, 0));
    }

    #[test]
    fn test_type_index_sentinel_out_of_map() {
        let grid = uniform_grid(4, 2);
        assert_eq!(grid.type_index(TileLocation::new(1, 1)), 2);
        assert_eq!(grid.type_index(TileLocation::new(9, 9)), NONEXIST_TILE);
    }
}
