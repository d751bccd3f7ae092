//! Grid search: flood-fill reachability and A* shortest paths.
//!
//! Both searches treat occupied cells as walls. Movement is 4-directional
//! with a uniform cost of one per hop, so Manhattan distance is an exact
//! lower bound for A*.
//!
//! Equal-cost paths are broken by heap order. Callers should rely on path
//! length and adjacency, not on the exact cells of a tied path.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};

use rustc_hash::{FxHashMap, FxHashSet};

use super::cell::Coord;
use super::map::Grid;

/// All free cells within `range` hops of `origin`, excluding `origin`.
///
/// Occupied cells are never expanded and never returned, so a unit cannot
/// walk through or stop on another unit. The origin itself may be occupied
/// (it usually holds the mover).
#[must_use]
pub fn reachable_tiles(grid: &Grid, origin: Coord, range: u32) -> FxHashSet<Coord> {
    let mut reachable = FxHashSet::default();
    if !grid.contains(origin) {
        return reachable;
    }

    let mut distances: FxHashMap<Coord, u32> = FxHashMap::default();
    let mut queue = VecDeque::new();
    distances.insert(origin, 0);
    queue.push_back(origin);

    while let Some(current) = queue.pop_front() {
        let dist = distances[&current];
        if dist >= range {
            continue;
        }

        for neighbor in grid.neighbors(current) {
            if distances.contains_key(&neighbor) {
                continue;
            }
            // Record occupied cells too so they are not re-examined.
            distances.insert(neighbor, dist + 1);

            if grid.is_free(neighbor) {
                reachable.insert(neighbor);
                queue.push_back(neighbor);
            }
        }
    }

    reachable
}

/// Free cells reachable from `origin` within `range` hops that sit next to
/// at least one of `targets`.
///
/// Used to find where a charging unit may land.
#[must_use]
pub fn landing_tiles(grid: &Grid, origin: Coord, range: u32, targets: &[Coord]) -> FxHashSet<Coord> {
    reachable_tiles(grid, origin, range)
        .into_iter()
        .filter(|tile| targets.iter().any(|t| tile.is_adjacent(*t)))
        .collect()
}

/// Entry in the A* open set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PathNode {
    coord: Coord,
    f_cost: u32,
}

impl Ord for PathNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for a min-heap on f_cost.
        other
            .f_cost
            .cmp(&self.f_cost)
            .then_with(|| other.coord.cmp(&self.coord))
    }
}

impl PartialOrd for PathNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Shortest free path from `start` to `goal`.
///
/// The returned path begins with `start` and ends with `goal`; every
/// consecutive pair is 4-adjacent and every cell after `start` is free.
/// Returns `None` when the goal is off the grid, occupied, or walled off.
///
/// ```
/// use dino_tactics::grid::{find_path, Coord, Grid};
///
/// let grid = Grid::new(5, 5);
/// let path = find_path(&grid, Coord::new(0, 0), Coord::new(2, 3)).unwrap();
///
/// assert_eq!(path.first(), Some(&Coord::new(0, 0)));
/// assert_eq!(path.last(), Some(&Coord::new(2, 3)));
/// assert_eq!(path.len(), 6);
/// ```
#[must_use]
pub fn find_path(grid: &Grid, start: Coord, goal: Coord) -> Option<Vec<Coord>> {
    if !grid.contains(start) || !grid.is_free(goal) {
        return None;
    }
    if start == goal {
        return Some(vec![start]);
    }

    let mut open_set = BinaryHeap::new();
    let mut came_from: FxHashMap<Coord, Coord> = FxHashMap::default();
    let mut g_scores: FxHashMap<Coord, u32> = FxHashMap::default();
    let mut closed: FxHashSet<Coord> = FxHashSet::default();

    g_scores.insert(start, 0);
    open_set.push(PathNode {
        coord: start,
        f_cost: start.manhattan(goal),
    });

    while let Some(current) = open_set.pop() {
        if current.coord == goal {
            return Some(reconstruct_path(&came_from, goal));
        }
        if !closed.insert(current.coord) {
            continue;
        }

        let current_g = g_scores[&current.coord];

        for neighbor in grid.neighbors(current.coord) {
            if !grid.is_free(neighbor) || closed.contains(&neighbor) {
                continue;
            }

            let tentative_g = current_g + 1;
            let known_g = g_scores.get(&neighbor).copied().unwrap_or(u32::MAX);

            if tentative_g < known_g {
                came_from.insert(neighbor, current.coord);
                g_scores.insert(neighbor, tentative_g);
                open_set.push(PathNode {
                    coord: neighbor,
                    f_cost: tentative_g + neighbor.manhattan(goal),
                });
            }
        }
    }

    None
}

fn reconstruct_path(came_from: &FxHashMap<Coord, Coord>, mut current: Coord) -> Vec<Coord> {
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
    use crate::core::UnitId;

    fn wall(grid: &mut Grid, cells: &[(i32, i32)]) {
        for (i, &(x, z)) in cells.iter().enumerate() {
            grid.set_occupant(Coord::new(x, z), Some(UnitId::new(100 + i as u32)));
        }
    }

    #[test]
    fn test_reachable_open_field() {
        let grid = Grid::new(7, 7);
        let tiles = reachable_tiles(&grid, Coord::new(3, 3), 2);

        // Diamond of radius 2 minus the origin.
        assert_eq!(tiles.len(), 12);
        assert!(!tiles.contains(&Coord::new(3, 3)));
        assert!(tiles.contains(&Coord::new(3, 5)));
        assert!(tiles.contains(&Coord::new(4, 4)));
        assert!(!tiles.contains(&Coord::new(5, 4)));
    }

    #[test]
    fn test_reachable_zero_range() {
        let grid = Grid::new(3, 3);
        assert!(reachable_tiles(&grid, Coord::new(1, 1), 0).is_empty());
    }

    #[test]
    fn test_reachable_clipped_by_edges() {
        let grid = Grid::new(3, 3);
        let tiles = reachable_tiles(&grid, Coord::new(0, 0), 1);
        assert_eq!(tiles.len(), 2);
    }

    #[test]
    fn test_reachable_does_not_pass_through_units() {
        // Corridor one cell wide: origin at (0,1), blocker at (1,1).
        let mut grid = Grid::new(4, 3);
        wall(&mut grid, &[(0, 0), (0, 2), (1, 0), (1, 1), (1, 2)]);

        let tiles = reachable_tiles(&grid, Coord::new(0, 1), 5);
        assert!(tiles.is_empty());
    }

    #[test]
    fn test_reachable_detours_around_units() {
        let mut grid = Grid::new(5, 5);
        wall(&mut grid, &[(2, 1), (2, 2), (2, 3)]);

        // (3,2) is 2 hops straight through, 6 hops around the wall.
        let near = reachable_tiles(&grid, Coord::new(1, 2), 4);
        assert!(!near.contains(&Coord::new(3, 2)));

        let far = reachable_tiles(&grid, Coord::new(1, 2), 6);
        assert!(far.contains(&Coord::new(3, 2)));
        assert!(!far.contains(&Coord::new(2, 2)));
    }

    #[test]
    fn test_landing_tiles() {
        let mut grid = Grid::new(6, 1);
        wall(&mut grid, &[(4, 0)]);

        let landings = landing_tiles(&grid, Coord::new(0, 0), 5, &[Coord::new(4, 0)]);
        assert_eq!(landings.len(), 1);
        assert!(landings.contains(&Coord::new(3, 0)));

        let short = landing_tiles(&grid, Coord::new(0, 0), 2, &[Coord::new(4, 0)]);
        assert!(short.is_empty());
    }

    #[test]
    fn test_path_straight_line() {
        let grid = Grid::new(5, 1);
        let path = find_path(&grid, Coord::new(0, 0), Coord::new(4, 0)).unwrap();

        let expected: Vec<_> = (0..5).map(|x| Coord::new(x, 0)).collect();
        assert_eq!(path, expected);
    }

    #[test]
    fn test_path_around_wall() {
        let mut grid = Grid::new(5, 5);
        wall(&mut grid, &[(2, 0), (2, 1), (2, 2), (2, 3)]);

        let path = find_path(&grid, Coord::new(0, 0), Coord::new(4, 0)).unwrap();

        // Must go up to z=4 and back down.
        assert_eq!(path.len(), 13);
        assert!(path.contains(&Coord::new(2, 4)));
        for pair in path.windows(2) {
            assert!(pair[0].is_adjacent(pair[1]));
        }
    }

    #[test]
    fn test_path_goal_occupied() {
        let mut grid = Grid::new(3, 3);
        wall(&mut grid, &[(2, 2)]);
        assert!(find_path(&grid, Coord::new(0, 0), Coord::new(2, 2)).is_none());
    }

    #[test]
    fn test_path_goal_off_grid() {
        let grid = Grid::new(3, 3);
        assert!(find_path(&grid, Coord::new(0, 0), Coord::new(3, 0)).is_none());
    }

    #[test]
    fn test_path_enclosed_goal() {
        let mut grid = Grid::new(5, 5);
        wall(&mut grid, &[(3, 4), (4, 3)]);
        assert!(find_path(&grid, Coord::new(0, 0), Coord::new(4, 4)).is_none());
    }

    #[test]
    fn test_path_start_may_be_occupied() {
        let mut grid = Grid::new(3, 1);
        wall(&mut grid, &[(0, 0)]);

        let path = find_path(&grid, Coord::new(0, 0), Coord::new(2, 0)).unwrap();
        assert_eq!(path.len(), 3);
    }

    #[test]
    fn test_path_to_self() {
        let grid = Grid::new(2, 2);
        assert_eq!(
            find_path(&grid, Coord::new(1, 1), Coord::new(1, 1)),
            Some(vec![Coord::new(1, 1)])
        );
    }

    #[test]
    fn test_path_length_matches_manhattan_on_open_grid() {
        let grid = Grid::new(12, 12);
        let start = Coord::new(1, 2);
        for goal in [Coord::new(11, 11), Coord::new(0, 0), Coord::new(6, 2)] {
            let path = find_path(&grid, start, goal).unwrap();
            assert_eq!(path.len() as u32, start.manhattan(goal) + 1);
        }
    }
}
