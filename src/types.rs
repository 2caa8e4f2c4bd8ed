// Flip domain and wire types
// Positions are continuous board coordinates; grid cells are discrete (row, col) pairs.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Stable identifier of a piece within one player's set
pub type PieceId = u32;

/// Piece positions keyed by id; ordered so every scan is deterministic
pub type Pieces = BTreeMap<PieceId, Point>;

/// Continuous position on the board
#[derive(Deserialize, Serialize, Debug, PartialEq, Clone, Copy, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    /// Reflects the point across the lateral axis (x -> -x)
    pub fn mirrored(&self) -> Point {
        Point { x: -self.x, y: self.y }
    }

    /// Position reached after one step of `length` along `angle` (radians)
    pub fn step(&self, angle: f64, length: f64) -> Point {
        Point {
            x: self.x + length * angle.cos(),
            y: self.y + length * angle.sin(),
        }
    }
}

/// A proposed move: piece `id` ends up at `to`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Move {
    pub id: PieceId,
    pub to: Point,
}

impl Move {
    pub fn mirrored(&self) -> Move {
        Move {
            id: self.id,
            to: self.to.mirrored(),
        }
    }
}

/// Mirrors every position of a piece set
pub fn mirror_pieces(pieces: &Pieces) -> Pieces {
    pieces.iter().map(|(&id, p)| (id, p.mirrored())).collect()
}

/// Discrete grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellPos {
    pub row: usize,
    pub col: usize,
}

impl CellPos {
    pub fn new(row: usize, col: usize) -> Self {
        CellPos { row, col }
    }

    pub fn manhattan(&self, other: &CellPos) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

/// The four grid directions. Up increases the row index (towards +y).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns all possible directions in expansion order
    pub fn all() -> [Direction; 4] {
        [Direction::Up, Direction::Down, Direction::Left, Direction::Right]
    }

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Neighbouring cell in this direction, or None when it would leave a
    /// `rows` x `cols` grid
    pub fn apply(&self, cell: &CellPos, rows: usize, cols: usize) -> Option<CellPos> {
        match self {
            Direction::Up if cell.row + 1 < rows => Some(CellPos::new(cell.row + 1, cell.col)),
            Direction::Down if cell.row > 0 => Some(CellPos::new(cell.row - 1, cell.col)),
            Direction::Left if cell.col > 0 => Some(CellPos::new(cell.row, cell.col - 1)),
            Direction::Right if cell.col + 1 < cols => Some(CellPos::new(cell.row, cell.col + 1)),
            _ => None,
        }
    }
}

/// Piece as it travels over the wire
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
pub struct WirePiece {
    pub id: PieceId,
    pub x: f64,
    pub y: f64,
}

impl From<Move> for WirePiece {
    fn from(m: Move) -> Self {
        WirePiece {
            id: m.id,
            x: m.to.x,
            y: m.to.y,
        }
    }
}

impl From<WirePiece> for Move {
    fn from(w: WirePiece) -> Self {
        Move {
            id: w.id,
            to: Point::new(w.x, w.y),
        }
    }
}

/// Collects wire pieces into an ordered piece set
pub fn pieces_from_wire(wire: &[WirePiece]) -> Pieces {
    wire.iter().map(|w| (w.id, Point::new(w.x, w.y))).collect()
}

/// One-time match setup sent by the host
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct InitRequest {
    pub match_id: String,
    pub pieces: Vec<WirePiece>,
    pub piece_count: usize,
    pub turn_budget: f64,
    pub is_first_mover: bool,
    pub piece_diameter: f64,
}

/// Per-turn move request sent by the host
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct MovesRequest {
    pub match_id: String,
    pub turn: u32,
    pub count: usize,
    pub own: Vec<WirePiece>,
    pub opponent: Vec<WirePiece>,
    pub is_first_mover: bool,
}

/// Ordered moves returned for a turn
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct MovesResponse {
    pub moves: Vec<WirePiece>,
}

/// Match teardown
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct EndRequest {
    pub match_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_apply_respects_bounds() {
        let corner = CellPos::new(0, 0);
        assert_eq!(Direction::Down.apply(&corner, 3, 3), None);
        assert_eq!(Direction::Left.apply(&corner, 3, 3), None);
        assert_eq!(Direction::Up.apply(&corner, 3, 3), Some(CellPos::new(1, 0)));
        assert_eq!(Direction::Right.apply(&corner, 3, 3), Some(CellPos::new(0, 1)));
        assert_eq!(Direction::Up.apply(&CellPos::new(2, 0), 3, 3), None);
    }

    #[test]
    fn test_opposite_round_trips() {
        for dir in Direction::all() {
            assert_eq!(dir.opposite().opposite(), dir);
            assert_ne!(dir.opposite(), dir);
        }
    }

    #[test]
    fn test_mirror_flips_only_x() {
        let p = Point::new(3.5, -2.0);
        assert_eq!(p.mirrored(), Point::new(-3.5, -2.0));
        assert_eq!(p.mirrored().mirrored(), p);
    }
}
