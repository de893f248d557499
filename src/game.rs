//! Maze game state
//!
//! Owns the loaded grid, the first-person camera and the collision
//! parameters. `update` runs one simulation step from an input snapshot:
//! camera first, then collision against the grid, rolling the camera
//! back to its pre-frame position on any wall overlap. What happened is
//! returned as a `FrameReport` for the caller to log.

use crate::camera::FirstPersonCamera;
use crate::collision::{self, CollisionParams};
use crate::config::GameConfig;
use crate::cubicmap::Grid;
use crate::input::{Action, InputState};
use crate::math::Vec3;

/// What happened during one update
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    /// Camera position after collision resolution
    pub position: Vec3,
    /// Map cell of the attempted position (clamped), None for an empty map
    pub player_cell: Option<(usize, usize)>,
    /// The move was rejected
    pub collided: bool,
    /// Cell reported this frame because ReportCell was pressed
    pub reported_cell: Option<(usize, usize)>,
}

pub struct MazeGame {
    grid: Grid,
    camera: FirstPersonCamera,
    collision: CollisionParams,
    frame: u64,
}

impl MazeGame {
    pub fn new(grid: Grid, config: &GameConfig) -> Self {
        let camera = FirstPersonCamera::new(config.start_position, config.camera.clone());
        Self {
            grid,
            camera,
            collision: config.collision_params(),
            frame: 0,
        }
    }

    pub fn camera(&self) -> &FirstPersonCamera {
        &self.camera
    }

    /// Number of updates run so far
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Advance one frame
    pub fn update(&mut self, input: &InputState) -> FrameReport {
        let previous = self.camera.position;
        self.camera.update(&input.camera_input());

        let outcome = collision::resolve(&self.grid, &self.collision, previous, self.camera.position);
        self.camera.position = outcome.position;
        if outcome.collided() {
            tracing::trace!("Move rejected, hit {:?}", outcome.hits);
        }

        let reported_cell = input
            .action_pressed(Action::ReportCell)
            .then_some(outcome.player_cell)
            .flatten();

        self.frame += 1;
        FrameReport {
            position: outcome.position,
            player_cell: outcome.player_cell,
            collided: outcome.collided(),
            reported_cell,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{ActionSet, InputSample};
    use crate::math::Vec2;

    const MAZE: &str = "\
#####
#...#
#.#.#
#...#
#####";

    fn game() -> MazeGame {
        let mut config = GameConfig::default();
        config.start_position = Vec3::new(1.0, 0.6, 3.0);
        MazeGame::new(Grid::from_ascii(MAZE).unwrap(), &config)
    }

    fn frame(input: &mut InputState, actions: &[Action]) {
        input.begin_frame(InputSample {
            actions: actions.iter().copied().collect::<ActionSet>(),
            buttons: [false; 3],
            mouse: Vec2::ZERO,
        });
    }

    #[test]
    fn test_walk_along_open_corridor() {
        let mut game = game();
        let mut input = InputState::new();
        // Forward is -z at zero yaw; (1, 2) and (1, 1) are open
        for _ in 0..20 {
            frame(&mut input, &[Action::MoveFront]);
            let report = game.update(&input);
            assert!(!report.collided);
        }
        assert!((game.camera().position.z - 2.0).abs() < 0.001);
        assert_eq!(game.frame(), 20);
    }

    #[test]
    fn test_wall_stops_player() {
        let mut game = game();
        let mut input = InputState::new();
        let mut collided = false;
        for _ in 0..100 {
            frame(&mut input, &[Action::MoveLeft]);
            let before = game.camera().position;
            let report = game.update(&input);
            if report.collided {
                assert_eq!(report.position, before);
                collided = true;
            }
        }
        assert!(collided);
        // Wall column at x = 0 keeps the player at least radius + half a cube away
        assert!(game.camera().position.x >= 0.6 - 0.0001);
    }

    #[test]
    fn test_report_cell_only_on_press() {
        let mut game = game();
        let mut input = InputState::new();
        frame(&mut input, &[]);
        assert_eq!(game.update(&input).reported_cell, None);

        frame(&mut input, &[Action::ReportCell]);
        assert_eq!(game.update(&input).reported_cell, Some((1, 3)));

        frame(&mut input, &[Action::ReportCell]);
        assert_eq!(game.update(&input).reported_cell, None);
    }

    #[test]
    fn test_empty_map_never_collides() {
        let mut game = MazeGame::new(Grid::empty(), &GameConfig::default());
        let mut input = InputState::new();
        frame(&mut input, &[Action::MoveFront, Action::ReportCell]);
        frame(&mut input, &[Action::MoveFront, Action::ReportCell]);
        let report = game.update(&input);
        assert!(!report.collided);
        assert_eq!(report.player_cell, None);
        assert_eq!(report.reported_cell, None);
    }
}
