//! Collision System
//!
//! The player is a circle on the XZ plane (a vertical cylinder with no
//! height). Every wall cell contributes its square footprint; if the
//! circle overlaps any of them the whole move is rejected and the
//! player goes back to where the frame started. No sliding.

use serde::{Deserialize, Serialize};
use crate::cubicmap::Grid;
use crate::math::{Rect, Vec2, Vec3};

/// Which wall cells are tested each frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScanMode {
    /// Every cell of the map
    #[default]
    Full,
    /// Only the block around the player's cell, `scan_reach` cells on
    /// each side. Always reports the same hits as `Full`.
    Neighborhood,
}

/// Circle vs axis-aligned rectangle overlap. Touching counts as overlap.
pub fn check_collision_circle_rec(center: Vec2, radius: f32, rec: Rect) -> bool {
    let rc = rec.center();
    let half_w = rec.w / 2.0;
    let half_h = rec.h / 2.0;

    let dx = (center.x - rc.x).abs();
    let dy = (center.y - rc.y).abs();

    if dx > half_w + radius {
        return false;
    }
    if dy > half_h + radius {
        return false;
    }

    if dx <= half_w {
        return true;
    }
    if dy <= half_h {
        return true;
    }

    let corner_distance_sq = (dx - half_w) * (dx - half_w) + (dy - half_h) * (dy - half_h);
    corner_distance_sq <= radius * radius
}

/// Static collision parameters for one map
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionParams {
    /// World position of cell (0, 0)'s center
    pub map_position: Vec3,
    pub cube_size: f32,
    pub radius: f32,
    pub scan: ScanMode,
}

/// Result of a collision pass
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionOutcome {
    /// Position after resolution (either the candidate or the pre-move position)
    pub position: Vec3,
    /// Map cell containing the candidate, clamped into the grid
    pub player_cell: Option<(usize, usize)>,
    /// Wall cells overlapped by the candidate, in scan order
    pub hits: Vec<(usize, usize)>,
}

impl CollisionOutcome {
    pub fn collided(&self) -> bool {
        !self.hits.is_empty()
    }
}

/// Cell under a world position: `trunc(p - map + 0.5)` per axis, clamped.
/// None for an empty grid.
pub fn player_cell(grid: &Grid, params: &CollisionParams, position: Vec3) -> Option<(usize, usize)> {
    if grid.is_empty() {
        return None;
    }
    let s = params.cube_size;
    let cx = ((position.x - params.map_position.x) / s + 0.5) as i64;
    let cz = ((position.z - params.map_position.z) / s + 0.5) as i64;
    let cx = cx.clamp(0, grid.width() as i64 - 1) as usize;
    let cz = cz.clamp(0, grid.height() as i64 - 1) as usize;
    Some((cx, cz))
}

/// Cells on each side of the player cell that the player circle can
/// overlap: `ceil(radius / cube_size) + 1`
pub fn scan_reach(params: &CollisionParams) -> usize {
    (params.radius / params.cube_size).ceil().max(0.0) as usize + 1
}

/// Footprint of the cell at (x, z) on the XZ plane
pub fn cell_footprint(params: &CollisionParams, x: usize, z: usize) -> Rect {
    let s = params.cube_size;
    let center = Vec2::new(
        params.map_position.x + x as f32 * s,
        params.map_position.z + z as f32 * s,
    );
    Rect::from_center(center, s, s)
}

/// Wall cells overlapped by a circle at `position`
pub fn colliding_cells(grid: &Grid, params: &CollisionParams, position: Vec3) -> Vec<(usize, usize)> {
    let Some((px, pz)) = player_cell(grid, params, position) else { return Vec::new() };
    let center = position.xz();

    let (x_range, z_range) = match params.scan {
        ScanMode::Full => (0..grid.width(), 0..grid.height()),
        ScanMode::Neighborhood => {
            let reach = scan_reach(params);
            (
                px.saturating_sub(reach)..(px + reach + 1).min(grid.width()),
                pz.saturating_sub(reach)..(pz + reach + 1).min(grid.height()),
            )
        }
    };

    let mut hits = Vec::new();
    for z in z_range {
        for x in x_range.clone() {
            if grid.is_wall(x as i32, z as i32)
                && check_collision_circle_rec(center, params.radius, cell_footprint(params, x, z))
            {
                hits.push((x, z));
            }
        }
    }
    hits
}

/// Accept `candidate` or roll back to `previous`
pub fn resolve(grid: &Grid, params: &CollisionParams, previous: Vec3, candidate: Vec3) -> CollisionOutcome {
    let hits = colliding_cells(grid, params, candidate);
    CollisionOutcome {
        position: if hits.is_empty() { candidate } else { previous },
        player_cell: player_cell(grid, params, candidate),
        hits,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(radius: f32) -> CollisionParams {
        CollisionParams {
            map_position: Vec3::ZERO,
            cube_size: 1.0,
            radius,
            scan: ScanMode::Full,
        }
    }

    #[test]
    fn test_circle_at_rect_center_collides() {
        let rec = Rect::new(2.0, 3.0, 1.0, 1.0);
        assert!(check_collision_circle_rec(rec.center(), 0.001, rec));
        assert!(check_collision_circle_rec(rec.center(), 10.0, rec));
    }

    #[test]
    fn test_circle_just_past_edge_misses() {
        let rec = Rect::from_center(Vec2::ZERO, 1.0, 1.0);
        let r = 0.1;
        assert!(!check_collision_circle_rec(Vec2::new(0.5 + r + 0.001, 0.0), r, rec));
        assert!(!check_collision_circle_rec(Vec2::new(0.0, -(0.5 + r + 0.001)), r, rec));
    }

    #[test]
    fn test_touching_edge_counts() {
        let rec = Rect::from_center(Vec2::ZERO, 1.0, 1.0);
        assert!(check_collision_circle_rec(Vec2::new(0.75, 0.0), 0.25, rec));
    }

    #[test]
    fn test_corner_region_uses_distance() {
        let rec = Rect::from_center(Vec2::ZERO, 1.0, 1.0);
        // Inside the expanded square but outside the rounded corner
        assert!(!check_collision_circle_rec(Vec2::new(0.58, 0.58), 0.1, rec));
        // Within radius of the corner
        assert!(check_collision_circle_rec(Vec2::new(0.55, 0.55), 0.1, rec));
        // Exactly on the corner distance (3-4-5)
        assert!(check_collision_circle_rec(Vec2::new(0.5 + 0.375, 0.5 + 0.5), 0.625, rec));
    }

    #[test]
    fn test_player_cell_rounds_and_clamps() {
        let grid = Grid::from_ascii("...\n...").unwrap();
        let p = params(0.1);
        assert_eq!(player_cell(&grid, &p, Vec3::new(0.4, 0.0, 0.4)), Some((0, 0)));
        assert_eq!(player_cell(&grid, &p, Vec3::new(0.6, 0.0, 0.4)), Some((1, 0)));
        assert_eq!(player_cell(&grid, &p, Vec3::new(9.0, 0.0, 9.0)), Some((2, 1)));
        assert_eq!(player_cell(&grid, &p, Vec3::new(-4.0, 0.0, -4.0)), Some((0, 0)));
        assert_eq!(player_cell(&Grid::empty(), &p, Vec3::ZERO), None);
    }

    #[test]
    fn test_rollback_is_exact() {
        let grid = Grid::from_ascii("...\n.#.\n...").unwrap();
        let p = params(0.1);
        let previous = Vec3::new(0.123_456_7, 0.587_654_3, 1.0);
        let candidate = Vec3::new(0.7, 0.6, 1.0);
        let outcome = resolve(&grid, &p, previous, candidate);
        assert!(outcome.collided());
        assert_eq!(outcome.hits, vec![(1, 1)]);
        assert_eq!(outcome.position.x.to_bits(), previous.x.to_bits());
        assert_eq!(outcome.position.y.to_bits(), previous.y.to_bits());
        assert_eq!(outcome.position.z.to_bits(), previous.z.to_bits());
    }

    #[test]
    fn test_free_move_is_accepted() {
        let grid = Grid::from_ascii("...\n.#.\n...").unwrap();
        let outcome = resolve(&grid, &params(0.1), Vec3::ZERO, Vec3::new(0.2, 0.6, 0.0));
        assert!(!outcome.collided());
        assert_eq!(outcome.position, Vec3::new(0.2, 0.6, 0.0));
        assert_eq!(outcome.player_cell, Some((0, 0)));
    }

    #[test]
    fn test_approach_rejected_within_half_plus_radius() {
        // Wall at (2, 0), walking +x from the open cell at (0, 0)
        let grid = Grid::from_ascii("..#").unwrap();
        let p = params(0.1);
        let mut pos = Vec3::new(0.0, 0.6, 0.0);
        let step = 0.05;
        loop {
            let candidate = Vec3::new(pos.x + step, pos.y, pos.z);
            let outcome = resolve(&grid, &p, pos, candidate);
            if outcome.collided() {
                assert_eq!(outcome.position, pos);
                assert!(2.0 - candidate.x <= 0.6 + 0.0001);
                break;
            }
            pos = outcome.position;
            assert!(2.0 - pos.x > 0.6 - 0.0001);
        }
        assert!(pos.x > 1.3);
    }

    #[test]
    fn test_open_and_unmapped_cells_never_collide() {
        let grid = Grid::from_ascii(".x").unwrap();
        for x in [0.0, 0.5, 1.0] {
            assert!(colliding_cells(&grid, &params(0.4), Vec3::new(x, 0.0, 0.0)).is_empty());
        }
    }

    #[test]
    fn test_neighborhood_scan_matches_full_scan() {
        let grid = Grid::from_ascii("#####\n#..##\n#.#.#\n#...#\n#####").unwrap();
        let full = params(0.3);
        let near = CollisionParams { scan: ScanMode::Neighborhood, ..full };
        for zi in 0..50 {
            for xi in 0..50 {
                let pos = Vec3::new(xi as f32 * 0.1 - 0.5, 0.0, zi as f32 * 0.1 - 0.5);
                assert_eq!(
                    colliding_cells(&grid, &full, pos),
                    colliding_cells(&grid, &near, pos),
                    "at {:?}",
                    pos
                );
            }
        }
    }

    #[test]
    fn test_scan_reach_grows_with_radius() {
        assert_eq!(scan_reach(&params(0.1)), 2);
        assert_eq!(scan_reach(&params(0.5)), 2);
        assert_eq!(scan_reach(&params(1.2)), 3);
        let big_cubes = CollisionParams { cube_size: 4.0, ..params(1.2) };
        assert_eq!(scan_reach(&big_cubes), 2);
    }

    #[test]
    fn test_neighborhood_finds_distant_wall_for_large_radius() {
        // Wall two cells from the player cell, inside the circle
        let grid = Grid::from_ascii("...#").unwrap();
        let full = params(1.2);
        let near = CollisionParams { scan: ScanMode::Neighborhood, ..full };
        let pos = Vec3::new(1.4, 0.6, 0.0);
        assert_eq!(colliding_cells(&grid, &full, pos), vec![(3, 0)]);
        assert_eq!(colliding_cells(&grid, &near, pos), vec![(3, 0)]);

        let outcome = resolve(&grid, &near, Vec3::new(0.0, 0.6, 0.0), pos);
        assert!(outcome.collided());
        assert_eq!(outcome.position, Vec3::new(0.0, 0.6, 0.0));
    }

    #[test]
    fn test_neighborhood_matches_full_for_any_radius() {
        let grid = Grid::from_ascii("#######\n#.....#\n#.#.#.#\n#.....#\n#######").unwrap();
        for radius in [0.05, 0.5, 0.9, 1.2, 2.3] {
            let full = params(radius);
            let near = CollisionParams { scan: ScanMode::Neighborhood, ..full };
            for zi in 0..30 {
                for xi in 0..40 {
                    let pos = Vec3::new(xi as f32 * 0.17 - 0.5, 0.0, zi as f32 * 0.17 - 0.5);
                    assert_eq!(
                        colliding_cells(&grid, &full, pos),
                        colliding_cells(&grid, &near, pos),
                        "radius {} at {:?}",
                        radius,
                        pos
                    );
                }
            }
        }
    }

    #[test]
    fn test_map_offset_and_cube_size() {
        let grid = Grid::from_ascii("#").unwrap();
        let p = CollisionParams {
            map_position: Vec3::new(10.0, 0.0, -5.0),
            cube_size: 2.0,
            radius: 0.1,
            scan: ScanMode::Full,
        };
        assert_eq!(colliding_cells(&grid, &p, Vec3::new(10.9, 0.0, -5.0)), vec![(0, 0)]);
        assert!(colliding_cells(&grid, &p, Vec3::new(11.2, 0.0, -5.0)).is_empty());
    }
}
