// Geometry oracle for the continuous Flip board
//
// The strategy code never measures distances or tests collisions directly; it asks a
// `BoardGeometry`. `FlipBoard` encodes the rules the Flip host validates moves with.

use crate::config::BoardConfig;
use crate::types::{Move, Pieces, Point};

/// Primitive geometric queries the agent relies on
pub trait BoardGeometry {
    fn distance(&self, a: &Point, b: &Point) -> f64;

    /// Equality within the board tolerance
    fn almost_equal(&self, a: f64, b: f64) -> bool;

    /// True if `mv` would overlap any piece in `pieces` other than the moving piece itself
    fn collides(&self, pieces: &Pieces, mv: &Move) -> bool;

    /// True if a piece centred at `p` lies entirely on the board
    fn within_bounds(&self, p: &Point) -> bool;
}

/// Standard Flip board: a `width` x `height` rectangle centred on the origin
#[derive(Debug, Clone)]
pub struct FlipBoard {
    half_width: f64,
    half_height: f64,
    piece_diameter: f64,
    tolerance: f64,
}

impl FlipBoard {
    pub fn new(board: &BoardConfig, piece_diameter: f64) -> Self {
        FlipBoard {
            half_width: board.half_width(),
            half_height: board.half_height(),
            piece_diameter,
            tolerance: board.tolerance,
        }
    }

    pub fn piece_diameter(&self) -> f64 {
        self.piece_diameter
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }
}

impl BoardGeometry for FlipBoard {
    fn distance(&self, a: &Point, b: &Point) -> f64 {
        (b.y - a.y).hypot(b.x - a.x)
    }

    fn almost_equal(&self, a: f64, b: f64) -> bool {
        (a - b).abs() < self.tolerance
    }

    fn collides(&self, pieces: &Pieces, mv: &Move) -> bool {
        pieces
            .iter()
            .filter(|(id, _)| **id != mv.id)
            .any(|(_, p)| self.distance(p, &mv.to) + self.tolerance < self.piece_diameter)
    }

    fn within_bounds(&self, p: &Point) -> bool {
        let r = self.piece_diameter / 2.0;
        p.x.abs() + r <= self.half_width + self.tolerance
            && p.y.abs() + r <= self.half_height + self.tolerance
    }
}
