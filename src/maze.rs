//! Maze collaborator interface
//!
//! The physics core never decides which walls exist; it only reads a grid of
//! wall flags. `WallGrid` is a plain owned grid that checks the shared-wall
//! invariant on construction so a hand-written or loaded layout cannot disagree
//! with itself.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Wall flags for one chamber
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cell {
    pub left: bool,
    pub top: bool,
    pub right: bool,
    pub bottom: bool,
}

impl Cell {
    /// All four walls
    pub const CLOSED: Cell = Cell {
        left: true,
        top: true,
        right: true,
        bottom: true,
    };
}

/// A rectangular maze of chambers
pub trait Maze {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    /// Wall flags for `0 <= x < width`, `0 <= y < height`
    fn cell(&self, x: usize, y: usize) -> Cell;
}

/// Supplies one maze per game
pub trait MazeSource {
    type Maze: Maze;
    fn next_maze(&mut self) -> Self::Maze;
}

#[derive(Debug, Error)]
pub enum MazeError {
    #[error("expected {expected} cells for a {width}x{height} maze, got {actual}")]
    CellCount {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },
    #[error("a {width}x{height} maze has too many cells to index")]
    TooLarge { width: usize, height: usize },
    #[error("wall between ({x}, {y}) and its {side} neighbour is only set on one side")]
    InconsistentWall { x: usize, y: usize, side: &'static str },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Serialized form, validated into a `WallGrid`
#[derive(Deserialize)]
struct RawGrid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

/// Owned grid of wall flags, stored row-major
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGrid")]
pub struct WallGrid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl TryFrom<RawGrid> for WallGrid {
    type Error = MazeError;

    fn try_from(raw: RawGrid) -> Result<Self, Self::Error> {
        WallGrid::from_cells(raw.width, raw.height, raw.cells)
    }
}

impl WallGrid {
    /// Build from row-major cells, rejecting layouts whose shared walls disagree
    pub fn from_cells(width: usize, height: usize, cells: Vec<Cell>) -> Result<Self, MazeError> {
        let expected = width
            .checked_mul(height)
            .ok_or(MazeError::TooLarge { width, height })?;
        if cells.len() != expected {
            return Err(MazeError::CellCount {
                width,
                height,
                expected,
                actual: cells.len(),
            });
        }
        let grid = Self {
            width,
            height,
            cells,
        };
        grid.check_shared_walls()?;
        Ok(grid)
    }

    /// A single open room: walls only around the outside
    pub fn enclosed(width: usize, height: usize) -> Self {
        let cells = (0..height)
            .flat_map(|y| {
                (0..width).map(move |x| Cell {
                    left: x == 0,
                    top: y == 0,
                    right: x + 1 == width,
                    bottom: y + 1 == height,
                })
            })
            .collect();
        Self {
            width,
            height,
            cells,
        }
    }

    /// Load a grid from a JSON file
    pub fn load(path: &Path) -> Result<Self, MazeError> {
        let json = std::fs::read_to_string(path)?;
        let grid: WallGrid = serde_json::from_str(&json)?;
        log::info!(
            "Loaded {}x{} maze from {}",
            grid.width,
            grid.height,
            path.display()
        );
        Ok(grid)
    }

    fn check_shared_walls(&self) -> Result<(), MazeError> {
        for y in 0..self.height {
            for x in 0..self.width {
                let here = self.cell(x, y);
                if x + 1 < self.width && here.right != self.cell(x + 1, y).left {
                    return Err(MazeError::InconsistentWall { x, y, side: "right" });
                }
                if y + 1 < self.height && here.bottom != self.cell(x, y + 1).top {
                    return Err(MazeError::InconsistentWall { x, y, side: "bottom" });
                }
            }
        }
        Ok(())
    }
}

impl Maze for WallGrid {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn cell(&self, x: usize, y: usize) -> Cell {
        self.cells[y * self.width + x]
    }
}

/// A fixed layout replays the same maze every game
impl MazeSource for WallGrid {
    type Maze = WallGrid;

    fn next_maze(&mut self) -> WallGrid {
        self.clone()
    }
}
