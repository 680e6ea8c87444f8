//! The tiled space: load orchestration and the query surface
//!
//! A space is described by an info text (tile size, tile palette, helper
//! groups) and a square color-coded map image. Loading runs info parsing,
//! map decoding, border fill, the classification pass and geometry baking in
//! that order, all synchronously. Mutation and queries afterwards go through
//! `TiledSpace`; callers serialize mutation against queries, no internal
//! locking is provided.

pub mod baking;
pub mod classify;
pub mod grid;
pub mod helpers;
pub mod info;
pub mod pathfinding;

use glam::Vec3;
use image::RgbaImage;
use rand::Rng;

use crate::core::error::{Result, SpaceError};
use crate::core::types::{
    Rotation, TileClass, TileLocation, TileType, NONEXIST_LOCATION, NONEXIST_TILE,
};

use self::baking::{BakeRequest, GeometryBaker};
use self::classify::{classify_cell, reclassify};
use self::grid::TileGrid;
use self::helpers::HelperRegistry;
use self::pathfinding::PathError;

/// The bordered tile grid backing one voxel-world space
#[derive(Debug, Default)]
pub struct TiledSpace {
    tile_size: i32,
    tile_types: Vec<TileType>,
    helpers: HelperRegistry,
    grid: Option<TileGrid>,
}

impl TiledSpace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a space from its info text and decoded map image
    ///
    /// Load order: info -> map image -> border fill -> classification ->
    /// geometry baking. Format errors are logged and abort the remaining
    /// load; already-parsed prefix data is retained. The returned error tells
    /// callers whether grid queries are meaningful.
    ///
    /// # Errors
    ///
    /// Returns the first load-time format error: malformed info text, a
    /// non-square map image, or a pixel color missing from the palette.
    pub fn load_space(
        &mut self,
        info_text: &str,
        map: &RgbaImage,
        baker: &mut dyn GeometryBaker,
    ) -> Result<()> {
        self.clear();

        let (parsed, parse_error) = info::parse_space_info(info_text);
        self.tile_size = parsed.tile_size;
        self.tile_types = parsed.tile_types;
        for (name, locations) in parsed.helper_groups {
            self.helpers.insert_group(name, locations);
        }
        if let Some(error) = parse_error {
            return Err(error);
        }

        let indices = self.decode_map(map)?;
        let size = map.width() as usize;
        let mut grid = TileGrid::from_type_indices(size, self.tile_size, &indices)?;

        for v in 0..size as i32 {
            for h in 0..size as i32 {
                reclassify(&mut grid, TileLocation::new(h, v));
            }
        }
        self.helpers.resolve_positions(&grid);
        self.grid = Some(grid);

        for v in 0..size as i32 {
            for h in 0..size as i32 {
                self.bake_cell(TileLocation::new(h, v), baker);
            }
        }
        Ok(())
    }

    /// Drop the loaded map, palette and helpers so a space can be reloaded
    pub fn clear(&mut self) {
        self.tile_size = 0;
        self.tile_types.clear();
        self.helpers.clear();
        self.grid = None;
    }

    /// Match map pixels against the palette colors
    ///
    /// Pixels that are not fully opaque become NONEXIST_TILE holes; an opaque
    /// color missing from the palette aborts the load.
    fn decode_map(&self, map: &RgbaImage) -> Result<Vec<u8>> {
        let (width, height) = map.dimensions();
        if width != height {
            let error = SpaceError::NonSquareMap { width, height };
            tracing::error!("{error}");
            return Err(error);
        }

        let mut indices = Vec::with_capacity((width as usize) * (height as usize));
        for (x, y, pixel) in map.enumerate_pixels() {
            let [r, g, b, a] = pixel.0;
            if a != 0xFF {
                indices.push(NONEXIST_TILE);
                continue;
            }
            let color =
                0xFF00_0000 | (u32::from(b) << 16) | (u32::from(g) << 8) | u32::from(r);
            match self.tile_types.iter().position(|t| t.color == color) {
                Some(index) => indices.push(index as u8),
                None => {
                    let error = SpaceError::UnmatchedColor { x, y, color };
                    tracing::error!("{error}");
                    return Err(error);
                }
            }
        }
        Ok(indices)
    }

    /// Emit a geometry request for one occupied cell
    fn bake_cell(&self, location: TileLocation, baker: &mut dyn GeometryBaker) {
        let Some(grid) = self.grid.as_ref() else {
            return;
        };
        let Some(classification) = classify_cell(grid, location) else {
            return;
        };
        if classification.type_index == NONEXIST_TILE {
            return;
        }
        let Some(model_key) = classification.model_key(&self.tile_types) else {
            tracing::error!(
                "tile at ({}, {}) references a type missing from the palette",
                location.h,
                location.v
            );
            return;
        };
        // Uniform tiles carry no orientation of their own; scatter them
        let rotation = if classification.is_uniform() {
            Rotation::from_quarter_turns(rand::thread_rng().gen_range(0..4u8))
        } else {
            classification.rotation
        };
        baker.bake(BakeRequest {
            location,
            position: grid.tile_center_position(location),
            model_key,
            rotation,
        });
    }

    /// Visible map size in tiles, 0 before a successful load
    pub fn map_size(&self) -> usize {
        self.grid.as_ref().map_or(0, |grid| grid.visible_size())
    }

    /// World units per tile
    pub fn tile_size(&self) -> i32 {
        self.tile_size
    }

    /// The loaded tile palette in type-index order
    pub fn tile_types(&self) -> &[TileType] {
        &self.tile_types
    }

    /// Tile type at a location, NONEXIST_TILE out of map or before load
    pub fn tile_type_index(&self, location: TileLocation) -> u8 {
        let Some(grid) = self.grid.as_ref() else {
            tracing::error!("tile type query before a space was loaded");
            return NONEXIST_TILE;
        };
        if !grid.is_in_map(location) {
            tracing::error!("no tile at ({}, {})", location.h, location.v);
            return NONEXIST_TILE;
        }
        grid.type_index(location)
    }

    /// Autotile class at a location, None out of map or before load
    pub fn tile_class(&self, location: TileLocation) -> Option<TileClass> {
        let Some(grid) = self.grid.as_ref() else {
            tracing::error!("tile class query before a space was loaded");
            return None;
        };
        match grid.cell(location) {
            Some(cell) => Some(cell.class),
            None => {
                tracing::error!("no tile at ({}, {})", location.h, location.v);
                None
            }
        }
    }

    /// World-space center of a tile, Vec3::ZERO before load
    pub fn tile_center_position(&self, location: TileLocation) -> Vec3 {
        self.grid
            .as_ref()
            .map_or(Vec3::ZERO, |grid| grid.tile_center_position(location))
    }

    /// Tile under a world position, clamped into the map
    pub fn tile_location(&self, position: Vec3) -> TileLocation {
        match self.grid.as_ref() {
            Some(grid) => grid.tile_location(position),
            None => {
                tracing::error!("tile location query before a space was loaded");
                NONEXIST_LOCATION
            }
        }
    }

    pub fn helper_count(&self, name: &str) -> usize {
        self.helpers.count(name)
    }

    pub fn helper_position(&self, name: &str, index: usize) -> Option<Vec3> {
        self.helpers.position(name, index)
    }

    pub fn helper_tile_location(&self, name: &str, index: usize) -> Option<TileLocation> {
        self.helpers.location(name, index)
    }

    /// Check the smooth-transition invariant for a prospective type change
    ///
    /// Every cell of the padded 3x3 neighborhood must be within one type
    /// index step of the new value; NONEXIST_TILE compares as its numeric
    /// sentinel.
    pub fn is_tile_type_suitable(&self, location: TileLocation, new_type: u8) -> bool {
        let Some(grid) = self.grid.as_ref() else {
            tracing::error!("tile mutation before a space was loaded");
            return false;
        };
        if !grid.is_in_map(location) {
            tracing::error!("no tile at ({}, {})", location.h, location.v);
            return false;
        }

        // The padded 3x3 window around visible (h, v) starts at padded (h, v)
        let start_h = location.h as usize;
        let start_v = location.v as usize;
        for pv in start_v..=start_v + 2 {
            for ph in start_h..=start_h + 2 {
                let diff = i32::from(grid.padded(ph, pv).type_index) - i32::from(new_type);
                if diff.abs() > 1 {
                    tracing::debug!(
                        "cannot change tile at ({}, {}) to type {}",
                        location.h,
                        location.v,
                        new_type
                    );
                    return false;
                }
            }
        }
        true
    }

    /// Commit a type change and refresh the touched neighborhood
    ///
    /// Returns false and leaves the grid untouched when the change violates
    /// the smooth-transition invariant or the location is out of map. On
    /// success the 3x3 neighborhood is reclassified and re-baked.
    pub fn set_tile_type_index(
        &mut self,
        location: TileLocation,
        new_type: u8,
        baker: &mut dyn GeometryBaker,
    ) -> bool {
        if !self.is_tile_type_suitable(location, new_type) {
            return false;
        }
        let Some(grid) = self.grid.as_mut() else {
            return false;
        };
        if let Some(cell) = grid.cell_mut(location) {
            cell.type_index = new_type;
        }
        grid.sync_border(location);

        let mut touched = Vec::with_capacity(9);
        for dv in -1..=1 {
            for dh in -1..=1 {
                let neighbor = TileLocation::new(location.h + dh, location.v + dv);
                if grid.is_in_map(neighbor) {
                    reclassify(grid, neighbor);
                    touched.push(neighbor);
                }
            }
        }
        for neighbor in touched {
            self.bake_cell(neighbor, baker);
        }
        true
    }

    /// In-map 8-connected neighbors within a tile type range
    pub fn tile_neighbors(
        &self,
        location: TileLocation,
        min_type: u8,
        max_type: u8,
    ) -> Vec<TileLocation> {
        self.grid.as_ref().map_or_else(Vec::new, |grid| {
            pathfinding::tile_neighbors(grid, location, min_type, max_type)
        })
    }

    /// Weighted A* path between two tiles, restricted to a type range
    ///
    /// # Errors
    ///
    /// `PathError::OutOfMap` when an endpoint is outside the map (or no map
    /// is loaded), `PathError::Unreachable` when the goal cannot be settled.
    pub fn find_path(
        &self,
        from: TileLocation,
        to: TileLocation,
        min_type: u8,
        max_type: u8,
    ) -> std::result::Result<Vec<TileLocation>, PathError> {
        let Some(grid) = self.grid.as_ref() else {
            return Err(PathError::OutOfMap(from));
        };
        pathfinding::find_path(grid, from, to, min_type, max_type)
    }
}
