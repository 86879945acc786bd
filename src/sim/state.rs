//! Game state and core simulation types
//!
//! A `GameSession` is built once per game and replaced wholesale when the next
//! game starts. Only the ball changes while a game is in play.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::boundary::{SetupError, build_boundaries, cell_size};
use super::collision::CollisionParams;
use super::segment::Segment2D;
use crate::maze::Maze;
use crate::settings::Settings;

/// Current phase of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Boundary, ball and hole constructed, not yet ticking
    Setup,
    /// Ticks advance the ball
    InPlay,
    /// Ball reached the hole, ticking stopped
    Won,
    /// Fading out the old game and in the new one
    Transitioning,
}

/// The rolling ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Ball {
    pub fn new(pos: Vec2, radius: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius,
        }
    }
}

/// The goal the ball has to drop into
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hole {
    pub pos: Vec2,
    pub radius: f32,
}

/// Axis-aligned wall rectangle for drawing (x, y is the top-left corner)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Everything the presenter needs to draw a new game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub area: Vec2,
    pub walls: Vec<WallRect>,
    pub hole: Hole,
    pub ball_radius: f32,
}

/// Which corner cell the ball starts in; the hole takes the opposite one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartCorner {
    pub left: bool,
    pub top: bool,
}

impl StartCorner {
    pub fn random(rng: &mut impl Rng) -> Self {
        Self {
            left: rng.random_bool(0.5),
            top: rng.random_bool(0.5),
        }
    }
}

/// RNG state wrapper so corner placement can be replayed from a seed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// One game: boundary set, ball, hole, and phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSession {
    pub phase: GamePhase,
    pub ball: Ball,
    pub hole: Hole,
    /// Collidable walls, fixed for the game
    boundaries: Vec<Segment2D>,
    layout: Layout,
    params: SessionParams,
}

/// Physics constants captured from settings when the game was built
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SessionParams {
    pub gravity: f32,
    pub bounce: f32,
    pub selection: crate::settings::BounceSelection,
}

impl GameSession {
    /// Build a game over `area` with the ball and hole in opposite corners
    pub fn new(
        maze: &impl Maze,
        area: Vec2,
        settings: &Settings,
        corner: StartCorner,
    ) -> Result<Self, SetupError> {
        settings
            .validate()
            .map_err(|err| SetupError::InvalidSettings(err.to_string()))?;
        let boundaries = build_boundaries(maze, area, settings.wall_width, settings.ball_radius)?;
        let cell = cell_size(maze, area)?;
        let (width, height) = (maze.width() as f32, maze.height() as f32);

        // Centre of the first or last cell along each axis, in half-cell units
        let near = |near_side: bool, cells: f32, extent: f32| {
            let halves = if near_side { 1.0 } else { 2.0 * cells - 1.0 };
            halves * extent / 2.0
        };

        let ball_pos = Vec2::new(
            near(corner.left, width, cell.x),
            near(corner.top, height, cell.y),
        );
        let hole = Hole {
            pos: Vec2::new(
                near(!corner.left, width, cell.x),
                near(!corner.top, height, cell.y),
            ),
            radius: settings.hole_radius,
        };

        let layout = Layout {
            area,
            walls: wall_rects(maze, cell, settings.wall_width),
            hole,
            ball_radius: settings.ball_radius,
        };

        log::info!(
            "New game: {}x{} maze, {} walls ({}), ball at {:?}, hole at {:?}",
            maze.width(),
            maze.height(),
            boundaries.len(),
            settings.bounce_selection.as_str(),
            ball_pos,
            hole.pos
        );

        Ok(Self {
            phase: GamePhase::Setup,
            ball: Ball::new(ball_pos, settings.ball_radius),
            hole,
            boundaries,
            layout,
            params: SessionParams {
                gravity: settings.gravity,
                bounce: settings.bounce,
                selection: settings.bounce_selection,
            },
        })
    }

    pub fn boundaries(&self) -> &[Segment2D] {
        &self.boundaries
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn params(&self) -> &SessionParams {
        &self.params
    }

    pub fn collision_params(&self) -> CollisionParams {
        CollisionParams {
            ball_radius: self.ball.radius,
            bounce: self.params.bounce,
            selection: self.params.selection,
        }
    }

    /// Start ticking
    pub fn start(&mut self) {
        if self.phase == GamePhase::Setup {
            self.phase = GamePhase::InPlay;
        }
    }
}

/// Drawing rectangles for every wall flag; each side draws half the wall
/// thickness, the neighbouring cell draws the other half
pub fn wall_rects(maze: &impl Maze, cell: Vec2, wall_width: f32) -> Vec<WallRect> {
    let half = wall_width / 2.0;
    let mut rects = Vec::new();

    for x in 0..maze.width() {
        for y in 0..maze.height() {
            let walls = maze.cell(x, y);
            let (fx, fy) = (x as f32, y as f32);

            if walls.left {
                rects.push(WallRect {
                    x: fx * cell.x,
                    y: fy * cell.y - half,
                    width: half,
                    height: cell.y + wall_width,
                });
            }
            if walls.right {
                rects.push(WallRect {
                    x: (fx + 1.0) * cell.x - half,
                    y: fy * cell.y - half,
                    width: half,
                    height: cell.y + wall_width,
                });
            }
            if walls.top {
                rects.push(WallRect {
                    x: fx * cell.x - half,
                    y: fy * cell.y,
                    width: cell.x + wall_width,
                    height: half,
                });
            }
            if walls.bottom {
                rects.push(WallRect {
                    x: fx * cell.x - half,
                    y: (fy + 1.0) * cell.y - half,
                    width: cell.x + wall_width,
                    height: half,
                });
            }
        }
    }

    rects
}
