//! Wall boundary construction
//!
//! Turns per-cell wall flags into the collidable segment set for one game. Every
//! wall becomes three connected segments tracing half the wall thickness around
//! the nominal cell edge: a short cap into the corner, the main run, and a second
//! cap. Caps fill the corners so the ball cannot slip through the seam where two
//! walls meet at a T-junction or right angle.

use glam::Vec2;
use thiserror::Error;

use super::segment::Segment2D;
use crate::maze::Maze;

/// Why a new game could not be set up
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SetupError {
    #[error("maze has no cells ({width}x{height})")]
    EmptyMaze { width: usize, height: usize },
    #[error("play area must be positive and finite, got {width}x{height}")]
    InvalidPlayArea { width: f32, height: f32 },
    #[error("wall thickness must be finite and non-negative, got {0}")]
    InvalidWallThickness(f32),
    #[error("ball radius must be finite and non-negative, got {0}")]
    InvalidBallRadius(f32),
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
    #[error("cells of {cell_width}x{cell_height} px cannot fit a ball of radius {ball_radius} between walls")]
    CellTooSmall {
        cell_width: f32,
        cell_height: f32,
        ball_radius: f32,
    },
}

/// Cell size in pixels for a maze stretched over the play area
pub fn cell_size(maze: &impl Maze, area: Vec2) -> Result<Vec2, SetupError> {
    let (width, height) = (maze.width(), maze.height());
    if width == 0 || height == 0 {
        return Err(SetupError::EmptyMaze { width, height });
    }
    if !area.is_finite() || area.x <= 0.0 || area.y <= 0.0 {
        return Err(SetupError::InvalidPlayArea {
            width: area.x,
            height: area.y,
        });
    }
    Ok(Vec2::new(area.x / width as f32, area.y / height as f32))
}

/// Build the boundary set for a maze stretched over `area`
///
/// Segments are emitted cell by cell (column-major), walls in left, top, right,
/// bottom order. Each segment's normal faces the cell interior it borders.
pub fn build_boundaries(
    maze: &impl Maze,
    area: Vec2,
    wall_thickness: f32,
    ball_radius: f32,
) -> Result<Vec<Segment2D>, SetupError> {
    let cell = cell_size(maze, area)?;
    if !wall_thickness.is_finite() || wall_thickness < 0.0 {
        return Err(SetupError::InvalidWallThickness(wall_thickness));
    }
    if !ball_radius.is_finite() || ball_radius < 0.0 {
        return Err(SetupError::InvalidBallRadius(ball_radius));
    }
    let clearance = wall_thickness + 2.0 * ball_radius;
    if cell.x <= clearance || cell.y <= clearance {
        return Err(SetupError::CellTooSmall {
            cell_width: cell.x,
            cell_height: cell.y,
            ball_radius,
        });
    }

    let half = wall_thickness / 2.0;
    let right = Vec2::new(half, 0.0);
    let left = -right;
    let down = Vec2::new(0.0, half);
    let up = -down;

    let mut borders = Vec::new();

    for x in 0..maze.width() {
        for y in 0..maze.height() {
            let walls = maze.cell(x, y);
            let (fx, fy) = (x as f32, y as f32);
            let ll = Vec2::new(fx * cell.x, (fy + 1.0) * cell.y);
            let ul = Vec2::new(fx * cell.x, fy * cell.y);
            let ur = Vec2::new((fx + 1.0) * cell.x, fy * cell.y);
            let lr = Vec2::new((fx + 1.0) * cell.x, (fy + 1.0) * cell.y);

            if walls.left {
                push_wall(&mut borders, [ll + down, ll + down + right, ul + up + right, ul + up]);
            }
            if walls.top {
                push_wall(&mut borders, [ul + left, ul + left + down, ur + right + down, ur + right]);
            }
            if walls.right {
                push_wall(&mut borders, [ur + up, ur + up + left, lr + down + left, lr + down]);
            }
            if walls.bottom {
                push_wall(&mut borders, [lr + right, lr + right + up, ll + left + up, ll + left]);
            }
        }
    }

    log::debug!(
        "Built {} boundary segments for {}x{} maze over {}x{} px",
        borders.len(),
        maze.width(),
        maze.height(),
        area.x,
        area.y
    );

    Ok(borders)
}

/// Cap, main run, cap
fn push_wall(borders: &mut Vec<Segment2D>, [a, b, c, d]: [Vec2; 4]) {
    borders.push(Segment2D::new(a, b));
    borders.push(Segment2D::new(b, c));
    borders.push(Segment2D::new(c, d));
}
