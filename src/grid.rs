// Discretized occupancy grid over the continuous board
//
// Rebuilt from scratch every turn. Several pieces can quantize into the same cell; the
// last write wins and the precision loss is accepted.

use crate::types::{CellPos, PieceId, Pieces, Point};

/// Contents of one grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Opponent,
    Owned(PieceId),
}

/// Row-major `rows x cols` occupancy map. Row 0 is the bottom edge (-height/2),
/// column 0 the left edge (-width/2).
#[derive(Debug, Clone)]
pub struct OccupancyGrid {
    width: f64,
    height: f64,
    resolution: f64,
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl OccupancyGrid {
    /// Creates an empty grid covering a `width` x `height` board
    ///
    /// # Arguments
    /// * `width` - Full board width in board units
    /// * `height` - Full board height in board units
    /// * `resolution` - Side length of one cell in board units
    pub fn new(width: f64, height: f64, resolution: f64) -> Self {
        let rows = (height / resolution).floor().max(0.0) as usize;
        let cols = (width / resolution).floor().max(0.0) as usize;
        OccupancyGrid {
            width,
            height,
            resolution,
            rows,
            cols,
            cells: vec![Cell::Empty; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Clears every cell to Empty
    pub fn reset(&mut self) {
        self.cells.iter_mut().for_each(|c| *c = Cell::Empty);
    }

    pub fn record_opponent<'a, I>(&mut self, positions: I)
    where
        I: IntoIterator<Item = &'a Point>,
    {
        for p in positions {
            self.set(p, Cell::Opponent);
        }
    }

    pub fn record_own(&mut self, pieces: &Pieces) {
        for (&id, p) in pieces {
            self.set(p, Cell::Owned(id));
        }
    }

    /// Reset followed by opponent then own pieces, so own pieces win shared cells
    pub fn rebuild(&mut self, own: &Pieces, opponent: &Pieces) {
        self.reset();
        self.record_opponent(opponent.values());
        self.record_own(own);
    }

    pub fn get(&self, cell: &CellPos) -> Option<Cell> {
        self.index(cell).map(|i| self.cells[i])
    }

    /// Row-major position of `cell` in a `rows * cols` buffer, or None outside the grid
    pub fn index(&self, cell: &CellPos) -> Option<usize> {
        if cell.row < self.rows && cell.col < self.cols {
            Some(cell.row * self.cols + cell.col)
        } else {
            None
        }
    }

    pub fn is_opponent(&self, cell: &CellPos) -> bool {
        self.get(cell) == Some(Cell::Opponent)
    }

    pub fn is_free(&self, cell: &CellPos) -> bool {
        self.get(cell) == Some(Cell::Empty)
    }

    /// Unclamped row index for a continuous y
    pub fn row_index(&self, y: f64) -> i64 {
        ((y + self.height / 2.0) / self.resolution).floor() as i64
    }

    /// Unclamped column index for a continuous x
    pub fn col_index(&self, x: f64) -> i64 {
        ((x + self.width / 2.0) / self.resolution).floor() as i64
    }

    /// Cell containing `p`, clamped into the grid
    pub fn cell_of(&self, p: &Point) -> CellPos {
        CellPos::new(
            clamp_index(self.row_index(p.y), self.rows),
            clamp_index(self.col_index(p.x), self.cols),
        )
    }

    /// Continuous x of a column's left edge
    pub fn column_x(&self, col: usize) -> f64 {
        col as f64 * self.resolution - self.width / 2.0
    }

    /// Continuous y of a row's bottom edge
    pub fn row_y(&self, row: usize) -> f64 {
        row as f64 * self.resolution - self.height / 2.0
    }

    pub fn center_of(&self, cell: &CellPos) -> Point {
        let half = self.resolution / 2.0;
        Point::new(self.column_x(cell.col) + half, self.row_y(cell.row) + half)
    }

    /// Iterates over every cell in row-major order
    pub fn cells(&self) -> impl Iterator<Item = (CellPos, Cell)> + '_ {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &c)| (CellPos::new(i / cols, i % cols), c))
    }

    fn set(&mut self, p: &Point, value: Cell) {
        if let Some(i) = self.index(&self.cell_of(p)) {
            self.cells[i] = value;
        }
    }
}

fn clamp_index(index: i64, len: usize) -> usize {
    if index <= 0 {
        0
    } else {
        (index as usize).min(len.saturating_sub(1))
    }
}
