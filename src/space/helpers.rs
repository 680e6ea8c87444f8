//! Named helper points resolved to world-space positions
//!
//! Helpers are fixed grid locations parsed from the space info (spawn points,
//! waypoints and similar). Their world positions are derived once, after the
//! grid and tile size are known.

use std::collections::HashMap;

use glam::Vec3;

use crate::core::types::TileLocation;
use crate::space::grid::TileGrid;

/// One helper point of a named group
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Helper {
    pub location: TileLocation,
    /// Tile-center world position, Vec3::ZERO until resolved
    pub position: Vec3,
}

/// Helper groups keyed by name
#[derive(Debug, Clone, Default)]
pub struct HelperRegistry {
    groups: HashMap<String, Vec<Helper>>,
}

impl HelperRegistry {
    /// Register a named group of grid locations
    pub fn insert_group(&mut self, name: String, locations: Vec<TileLocation>) {
        let helpers = locations
            .into_iter()
            .map(|location| Helper {
                location,
                position: Vec3::ZERO,
            })
            .collect();
        self.groups.insert(name, helpers);
    }

    /// Derive world positions from the loaded grid
    pub(crate) fn resolve_positions(&mut self, grid: &TileGrid) {
        for helpers in self.groups.values_mut() {
            for helper in helpers.iter_mut() {
                helper.position = grid.tile_center_position(helper.location);
            }
        }
    }

    /// Number of helpers in a group, 0 for unknown names
    pub fn count(&self, name: &str) -> usize {
        self.groups.get(name).map_or(0, Vec::len)
    }

    /// World position of one helper, None for unknown name or index
    pub fn position(&self, name: &str, index: usize) -> Option<Vec3> {
        self.groups
            .get(name)
            .and_then(|helpers| helpers.get(index))
            .map(|helper| helper.position)
    }

    /// Grid location of one helper, None for unknown name or index
    pub fn location(&self, name: &str, index: usize) -> Option<TileLocation> {
        self.groups
            .get(name)
            .and_then(|helpers| helpers.get(index))
            .map(|helper| helper.location)
    }

    pub fn clear(&mut self) {
        self.groups.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with_grid() -> (HelperRegistry, TileGrid) {
        let mut registry = HelperRegistry::default();
        registry.insert_group(
            "castle".to_string(),
            vec![TileLocation::new(2, 2), TileLocation::new(0, 1)],
        );
        registry.insert_group("spawn".to_string(), vec![TileLocation::new(4, 0)]);
        let grid = TileGrid::from_type_indices(5, 10, &[0u8; 25]).unwrap();
        (registry, grid)
    }

    #[test]
    fn test_counts() {
        let (registry, _) = registry_with_grid();
        assert_eq!(registry.count("castle"), 2);
        assert_eq!(registry.count("spawn"), 1);
        assert_eq!(registry.count("missing"), 0);
    }

    #[test]
    fn test_positions_resolve_to_tile_centers() {
        let (mut registry, grid) = registry_with_grid();
        assert_eq!(registry.position("castle", 0), Some(Vec3::ZERO));

        registry.resolve_positions(&grid);
        assert_eq!(
            registry.position("castle", 0),
            Some(grid.tile_center_position(TileLocation::new(2, 2)))
        );
        assert_eq!(
            registry.position("spawn", 0),
            Some(grid.tile_center_position(TileLocation::new(4, 0)))
        );
    }

    #[test]
    fn test_soft_failure_on_unknown_lookups() {
        let (registry, _) = registry_with_grid();
        assert_eq!(registry.position("missing", 0), None);
        assert_eq!(registry.position("castle", 5), None);
        assert_eq!(registry.location("missing", 0), None);
        assert_eq!(registry.location("castle", 5), None);
    }

    #[test]
    fn test_locations_survive_resolution() {
        let (mut registry, grid) = registry_with_grid();
        registry.resolve_positions(&grid);
        assert_eq!(registry.location("castle", 1), Some(TileLocation::new(0, 1)));
    }
}
