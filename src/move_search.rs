// Converts a desired destination into a concrete legal single-step move
//
// Every move in Flip displaces a piece by exactly one step length (the piece diameter).
// `best_direction` picks the ideal bearing; `find_legal_step` sweeps outwards from it
// until the step is collision-free and on the board.

use std::f64::consts::PI;

use crate::geometry::BoardGeometry;
use crate::types::{Move, PieceId, Pieces, Point};

/// Everything the search needs to judge a candidate step
pub struct MoveSearch<'a, G: BoardGeometry> {
    geometry: &'a G,
    step: f64,
    tolerance: f64,
    angle_increment: f64,
}

impl<'a, G: BoardGeometry> MoveSearch<'a, G> {
    /// # Arguments
    /// * `geometry` - Oracle used for distances, collisions and bounds
    /// * `step` - Required displacement of every move
    /// * `tolerance` - Slack on "target is exactly one step away"
    /// * `angle_increment` - Radians the search window grows by per iteration
    pub fn new(geometry: &'a G, step: f64, tolerance: f64, angle_increment: f64) -> Self {
        MoveSearch {
            geometry,
            step,
            tolerance,
            angle_increment,
        }
    }

    /// Bearing (radians) a piece at `from` should step along to approach `to`
    ///
    /// Far targets (at least two steps) and targets exactly one step away are aimed at
    /// directly. For anything in between, a direct step would overshoot, so the bearing
    /// is rotated to where the one-step circles around `from` and `to` intersect, so the
    /// next step can land on the target. The first intersection is used if legal,
    /// otherwise the second.
    pub fn best_direction(
        &self,
        id: PieceId,
        from: &Point,
        to: &Point,
        own: &Pieces,
        opponent: &Pieces,
    ) -> f64 {
        let distance = self.geometry.distance(from, to);
        let bearing = (to.y - from.y).atan2(to.x - from.x);

        if (self.step - distance).abs() < self.tolerance || distance >= 2.0 * self.step {
            return bearing;
        }

        let offset = (distance / 2.0 / self.step).acos();
        let first = bearing + offset;
        let second = bearing - offset;

        let candidate = Move {
            id,
            to: from.step(first, self.step),
        };
        if self.is_legal(from, &candidate, own, opponent) {
            first
        } else {
            second
        }
    }

    /// Nearest legal step to `bearing`, alternating either side of it
    ///
    /// # Returns
    /// * `Some(Move)` - Exactly one step from `from`, collision-free and in bounds
    /// * `None` - The window reached pi without a legal step; skip this piece
    pub fn find_legal_step(
        &self,
        id: PieceId,
        from: &Point,
        bearing: f64,
        own: &Pieces,
        opponent: &Pieces,
    ) -> Option<Move> {
        let mut window = 0.0;
        while window < PI {
            for sign in [1.0, -1.0] {
                let candidate = Move {
                    id,
                    to: from.step(bearing + sign * window, self.step),
                };
                if self.is_legal(from, &candidate, own, opponent) {
                    return Some(candidate);
                }
            }
            window += self.angle_increment;
        }
        None
    }

    /// Adjacency, collision and bounds checks, all delegated to the oracle
    pub fn is_legal(&self, from: &Point, candidate: &Move, own: &Pieces, opponent: &Pieces) -> bool {
        self.geometry
            .almost_equal(self.geometry.distance(from, &candidate.to), self.step)
            && !self.geometry.collides(own, candidate)
            && !self.geometry.collides(opponent, candidate)
            && self.geometry.within_bounds(&candidate.to)
    }
}
