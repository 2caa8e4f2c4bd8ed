// Priority queue of per-piece destinations
//
// Lower priority values are serviced first. Urgent (wall-holding) destinations use a
// negative priority so they always precede normal ones. Once an urgent destination is
// reached its piece is committed for the rest of the match and never scheduled again.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

use log::debug;

use crate::geometry::BoardGeometry;
use crate::types::{PieceId, Pieces, Point};

/// Priority of wall-holding destinations; below every normal priority (which are >= 0)
pub const URGENT_PRIORITY: f64 = -1.0;

/// Priority given to the runner at init
pub const RUNNER_PRIORITY: f64 = 0.0;

/// A target assignment for one piece
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Destination {
    pub priority: f64,
    pub piece: PieceId,
    pub target: Point,
}

impl Destination {
    pub fn new(priority: f64, piece: PieceId, target: Point) -> Self {
        Destination {
            priority,
            piece,
            target,
        }
    }

    pub fn is_urgent(&self) -> bool {
        self.priority <= URGENT_PRIORITY
    }
}

/// Heap entry; the sequence number keeps equal priorities in insertion order
#[derive(Debug, Clone, Copy)]
struct Entry {
    seq: u64,
    destination: Destination,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    // Reversed so the max-heap yields the smallest priority, then the oldest entry
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .destination
            .priority
            .total_cmp(&self.destination.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

#[derive(Debug, Clone)]
pub struct DestinationScheduler {
    queue: BinaryHeap<Entry>,
    committed: HashSet<PieceId>,
    deferred: Vec<Destination>,
    next_seq: u64,
    piece_diameter: f64,
}

impl DestinationScheduler {
    pub fn new(piece_diameter: f64) -> Self {
        DestinationScheduler {
            queue: BinaryHeap::new(),
            committed: HashSet::new(),
            deferred: Vec::new(),
            next_seq: 0,
            piece_diameter,
        }
    }

    /// Builds the opening schedule
    ///
    /// The piece closest to `pick_point` becomes the runner and races to that point with
    /// the top normal priority. Every piece, the runner included, also heads for
    /// `forward_line_x` on its own row, ordered by how close it already is to the lateral
    /// centre.
    ///
    /// # Returns
    /// The runner's id, or None for an empty piece set
    pub fn schedule_initial<G: BoardGeometry>(
        &mut self,
        pieces: &Pieces,
        pick_point: Point,
        forward_line_x: f64,
        geometry: &G,
    ) -> Option<PieceId> {
        let runner = pieces
            .iter()
            .min_by(|a, b| {
                geometry
                    .distance(a.1, &pick_point)
                    .total_cmp(&geometry.distance(b.1, &pick_point))
            })
            .map(|(&id, _)| id);

        if let Some(id) = runner {
            debug!("Runner is piece {}", id);
            self.schedule(Destination::new(RUNNER_PRIORITY, id, pick_point));
        }

        for (&id, p) in pieces {
            self.schedule(Destination::new(p.x.abs(), id, Point::new(forward_line_x, p.y)));
        }

        runner
    }

    pub fn schedule(&mut self, destination: Destination) {
        self.queue.push(Entry {
            seq: self.next_seq,
            destination,
        });
        self.next_seq += 1;
    }

    /// Inserts a wall-holding destination ahead of all normal work
    pub fn schedule_urgent(&mut self, piece: PieceId, target: Point) {
        self.schedule(Destination::new(URGENT_PRIORITY, piece, target));
    }

    pub fn has_pending_urgent(&self) -> bool {
        self.pending_urgent_count() > 0
    }

    /// Urgent destinations still queued or deferred
    pub fn pending_urgent_count(&self) -> usize {
        self.queue
            .iter()
            .map(|e| &e.destination)
            .chain(self.deferred.iter())
            .filter(|d| d.is_urgent())
            .count()
    }

    pub fn peek(&self) -> Option<&Destination> {
        self.queue.peek().map(|e| &e.destination)
    }

    pub fn pop(&mut self) -> Option<Destination> {
        self.queue.pop().map(|e| e.destination)
    }

    /// Pops the top destination if its piece has arrived
    ///
    /// Arrival means being within half a piece diameter of the target. An arrived urgent
    /// destination commits its piece permanently.
    pub fn consume<G: BoardGeometry>(
        &mut self,
        positions: &Pieces,
        geometry: &G,
    ) -> Option<Destination> {
        let top = *self.peek()?;
        let current = positions.get(&top.piece)?;
        if geometry.distance(current, &top.target) >= self.piece_diameter / 2.0 {
            return None;
        }

        self.pop();
        if top.is_urgent() {
            debug!("Piece {} now holds the wall gap", top.piece);
            self.committed.insert(top.piece);
        }
        Some(top)
    }

    /// First destination whose piece is still free to move
    ///
    /// Destinations of committed pieces are dropped on the way. The returned destination
    /// stays queued.
    pub fn next_movable(&mut self) -> Option<Destination> {
        while let Some(top) = self.peek().copied() {
            if !self.committed.contains(&top.piece) {
                return Some(top);
            }
            self.pop();
        }
        None
    }

    /// Sets the top destination aside until `restore_deferred`
    pub fn defer_top(&mut self) -> Option<Destination> {
        let top = self.pop()?;
        self.deferred.push(top);
        Some(top)
    }

    /// Re-queues every deferred destination with its priority unchanged
    pub fn restore_deferred(&mut self) {
        for destination in std::mem::take(&mut self.deferred) {
            self.schedule(destination);
        }
    }

    /// Pieces with a queued or deferred destination
    pub fn pending_pieces(&self) -> HashSet<PieceId> {
        self.queue
            .iter()
            .map(|e| e.destination.piece)
            .chain(self.deferred.iter().map(|d| d.piece))
            .collect()
    }

    pub fn is_committed(&self, piece: PieceId) -> bool {
        self.committed.contains(&piece)
    }

    pub fn committed(&self) -> &HashSet<PieceId> {
        &self.committed
    }

    pub fn piece_diameter(&self) -> f64 {
        self.piece_diameter
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
