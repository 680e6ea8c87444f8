//! Weighted A* search over the tile grid
//!
//! Search is restricted to cells whose tile type falls in a caller-supplied
//! range, walks the 8-connected neighborhood at unit edge cost, and breaks
//! ties with the Euclidean distance between tile-center world positions.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use thiserror::Error;

use crate::core::types::TileLocation;
use crate::space::grid::TileGrid;

/// Explicit pathfinding failures
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("location {0:?} is outside the map")]
    OutOfMap(TileLocation),

    #[error("no path from {from:?} to {to:?} within the allowed tile types")]
    Unreachable { from: TileLocation, to: TileLocation },
}

/// The 8-connected neighborhood
const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Node in the A* open set
#[derive(Debug, Clone)]
struct PathNode {
    location: TileLocation,
    f_cost: f32,
}

impl PartialEq for PathNode {
    fn eq(&self, other: &Self) -> bool {
        self.location == other.location
    }
}

impl Eq for PathNode {}

impl Ord for PathNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap
        other
            .f_cost
            .partial_cmp(&self.f_cost)
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for PathNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// In-map 8-connected neighbors whose tile type lies in `[min_type, max_type]`
///
/// Never contains `location` itself; empty when `location` is out of map.
pub fn tile_neighbors(
    grid: &TileGrid,
    location: TileLocation,
    min_type: u8,
    max_type: u8,
) -> Vec<TileLocation> {
    if !grid.is_in_map(location) {
        return Vec::new();
    }
    NEIGHBOR_OFFSETS
        .iter()
        .map(|(dh, dv)| TileLocation::new(location.h + dh, location.v + dv))
        .filter(|neighbor| {
            if !grid.is_in_map(*neighbor) {
                return false;
            }
            let type_index = grid.type_index(*neighbor);
            type_index >= min_type && type_index <= max_type
        })
        .collect()
}

/// A* from `from` to `to` over cells typed within `[min_type, max_type]`
///
/// Returns the full location sequence including both endpoints. The goal must
/// actually be settled by the search; an unreachable target reports
/// `PathError::Unreachable` instead of walking an uninitialized predecessor
/// chain.
pub fn find_path(
    grid: &TileGrid,
    from: TileLocation,
    to: TileLocation,
    min_type: u8,
    max_type: u8,
) -> Result<Vec<TileLocation>, PathError> {
    if !grid.is_in_map(from) {
        return Err(PathError::OutOfMap(from));
    }
    if !grid.is_in_map(to) {
        return Err(PathError::OutOfMap(to));
    }
    if from == to {
        return Ok(vec![from]);
    }

    let goal_center = grid.tile_center_position(to);
    let heuristic =
        |location: TileLocation| grid.tile_center_position(location).distance(goal_center);

    let mut open_set = BinaryHeap::new();
    let mut came_from: HashMap<TileLocation, TileLocation> = HashMap::new();
    let mut g_scores: HashMap<TileLocation, f32> = HashMap::new();

    g_scores.insert(from, 0.0);
    open_set.push(PathNode {
        location: from,
        f_cost: heuristic(from),
    });

    while let Some(current) = open_set.pop() {
        if current.location == to {
            return Ok(reconstruct_path(&came_from, current.location));
        }

        let current_g = *g_scores.get(&current.location).unwrap_or(&f32::INFINITY);

        for neighbor in tile_neighbors(grid, current.location, min_type, max_type) {
            let tentative_g = current_g + 1.0;
            let neighbor_g = *g_scores.get(&neighbor).unwrap_or(&f32::INFINITY);

            if tentative_g < neighbor_g {
                came_from.insert(neighbor, current.location);
                g_scores.insert(neighbor, tentative_g);
                open_set.push(PathNode {
                    location: neighbor,
                    f_cost: tentative_g + heuristic(neighbor),
                });
            }
        }
    }

    Err(PathError::Unreachable { from, to })
}

/// Walk predecessor links back from the settled goal
fn reconstruct_path(
    came_from: &HashMap<TileLocation, TileLocation>,
    mut current: TileLocation,
) -> Vec<TileLocation> {
    let mut path = vec![current];
    while let Some(&prev) = came_from.get(&current) {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_grid(size: usize) -> TileGrid {
        TileGrid::from_type_indices(size, 10, &vec![0u8; size * size]).unwrap()
    }

    /// 5x5 grid of type 0 with the full h = 2 column set to type 1
    fn walled_grid() -> TileGrid {
        let mut indices = vec![0u8; 25];
        for v in 0..5 {
            indices[v * 5 + 2] = 1;
        }
        TileGrid::from_type_indices(5, 10, &indices).unwrap()
    }

    #[test]
    fn test_straight_path_endpoints_and_length() {
        let grid = open_grid(5);
        let from = TileLocation::new(0, 0);
        let to = TileLocation::new(3, 0);

        let path = find_path(&grid, from, to, 0, 0).unwrap();

        assert_eq!(path.len(), 4);
        assert_eq!(path.first(), Some(&from));
        assert_eq!(path.last(), Some(&to));
        for pair in path.windows(2) {
            assert!((pair[1].h - pair[0].h).abs() <= 1);
            assert!((pair[1].v - pair[0].v).abs() <= 1);
        }
    }

    #[test]
    fn test_diagonal_steps_are_single_moves() {
        let grid = open_grid(5);
        let path = find_path(
            &grid,
            TileLocation::new(0, 0),
            TileLocation::new(3, 3),
            0,
            0,
        )
        .unwrap();
        // 8-connectivity reaches the diagonal goal in 3 unit steps
        assert_eq!(path.len(), 4);
    }

    #[test]
    fn test_same_start_and_goal() {
        let grid = open_grid(5);
        let location = TileLocation::new(2, 2);
        let path = find_path(&grid, location, location, 0, 0).unwrap();
        assert_eq!(path, vec![location]);
    }

    #[test]
    fn test_out_of_map_endpoints() {
        let grid = open_grid(5);
        let inside = TileLocation::new(1, 1);
        let outside = TileLocation::new(7, 1);

        assert_eq!(
            find_path(&grid, outside, inside, 0, 0),
            Err(PathError::OutOfMap(outside))
        );
        assert_eq!(
            find_path(&grid, inside, outside, 0, 0),
            Err(PathError::OutOfMap(outside))
        );
    }

    #[test]
    fn test_wall_outside_range_is_unreachable() {
        let grid = walled_grid();
        let from = TileLocation::new(0, 2);
        let to = TileLocation::new(4, 2);

        assert_eq!(
            find_path(&grid, from, to, 0, 0),
            Err(PathError::Unreachable { from, to })
        );
    }

    #[test]
    fn test_widened_range_crosses_the_wall() {
        let grid = walled_grid();
        let from = TileLocation::new(0, 2);
        let to = TileLocation::new(4, 2);

        let path = find_path(&grid, from, to, 0, 1).unwrap();
        assert_eq!(path.first(), Some(&from));
        assert_eq!(path.last(), Some(&to));
        assert!(path.iter().any(|location| location.h == 2));
    }

    #[test]
    fn test_neighbors_exclude_self_and_respect_range() {
        let grid = walled_grid();
        let location = TileLocation::new(1, 2);

        let neighbors = tile_neighbors(&grid, location, 0, 0);
        assert!(!neighbors.contains(&location));
        // The three h = 2 cells are type 1 and filtered out
        assert_eq!(neighbors.len(), 5);
        for neighbor in &neighbors {
            assert_eq!(grid.type_index(*neighbor), 0);
        }
    }

    #[test]
    fn test_neighbor_symmetry() {
        let grid = open_grid(4);
        for v in 0..4 {
            for h in 0..4 {
                let a = TileLocation::new(h, v);
                for b in tile_neighbors(&grid, a, 0, 0) {
                    assert!(
                        tile_neighbors(&grid, b, 0, 0).contains(&a),
                        "{a:?} -> {b:?} not symmetric"
                    );
                }
            }
        }
    }

    #[test]
    fn test_corner_has_three_neighbors() {
        let grid = open_grid(4);
        let neighbors = tile_neighbors(&grid, TileLocation::new(0, 0), 0, 0);
        assert_eq!(neighbors.len(), 3);
    }

    #[test]
    fn test_neighbors_of_out_of_map_location_empty() {
        let grid = open_grid(4);
        assert!(tile_neighbors(&grid, TileLocation::new(-1, 0), 0, 0).is_empty());
    }
}
