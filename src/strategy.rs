// Per-match strategy session
//
// One `Strategy` is created when a match starts and threaded through every turn. It owns
// the occupancy grid and the destination schedule. All reasoning happens in the canonical
// orientation (our pieces advance towards +x); the first mover's positions are mirrored
// on the way in and the chosen moves mirrored back on the way out.

use std::time::Instant;

use log::{debug, info, warn};

use crate::config::Config;
use crate::geometry::FlipBoard;
use crate::grid::OccupancyGrid;
use crate::move_search::MoveSearch;
use crate::profile;
use crate::scheduler::{Destination, DestinationScheduler};
use crate::simple_profiler::record_skipped_piece;
use crate::types::{mirror_pieces, Move, PieceId, Pieces, Point};
use crate::wall::{WallAnalyzer, WallContext};

const GOAL_EPSILON: f64 = 1e-7;

pub struct Strategy {
    config: Config,
    geometry: FlipBoard,
    grid: OccupancyGrid,
    scheduler: DestinationScheduler,
    runner: Option<PieceId>,
    piece_count: usize,
    turn_budget: f64,
    turn: u32,
}

impl Strategy {
    /// Sets up a session for a new match
    ///
    /// # Arguments
    /// * `config` - Tunables for this match
    /// * `pieces` - Our starting positions, in the host's orientation
    /// * `piece_count` - Number of pieces per player
    /// * `turn_budget` - Total turns (or time) available for the match
    /// * `is_first_mover` - Whether we move first; the first mover plays mirrored
    /// * `piece_diameter` - Diameter of a piece, also the length of every step
    pub fn init(
        config: Config,
        pieces: &Pieces,
        piece_count: usize,
        turn_budget: f64,
        is_first_mover: bool,
        piece_diameter: f64,
    ) -> Self {
        let geometry = FlipBoard::new(&config.board, piece_diameter);
        let grid = OccupancyGrid::new(
            config.board.width,
            config.board.height,
            config.grid.resolution,
        );
        let mut scheduler = DestinationScheduler::new(piece_diameter);

        let canonical = orient(pieces, is_first_mover);
        let pick_point = Point::new(config.board.runner_pick_x, config.board.runner_pick_y);
        let runner = scheduler.schedule_initial(
            &canonical,
            pick_point,
            config.board.forward_line_x,
            &geometry,
        );

        info!(
            "Strategy ready: {} pieces, budget {}, first mover: {}, runner: {:?}",
            piece_count, turn_budget, is_first_mover, runner
        );

        Strategy {
            config,
            geometry,
            grid,
            scheduler,
            runner,
            piece_count,
            turn_budget,
            turn: 0,
        }
    }

    /// Chooses up to `count` moves for this turn
    ///
    /// Moves are applied to a working copy of our pieces as they are chosen, so each
    /// move treats the earlier ones as obstacles. A piece with no legal step is skipped
    /// for the turn and its destination kept for the next one.
    pub fn get_moves(
        &mut self,
        count: usize,
        own: &Pieces,
        opponent: &Pieces,
        is_first_mover: bool,
    ) -> Vec<Move> {
        let start_time = Instant::now();
        self.turn += 1;

        let mut working = orient(own, is_first_mover);
        let opponent = orient(opponent, is_first_mover);

        profile!("grid_rebuild", {
            self.grid.rebuild(&working, &opponent);
        });
        profile!("wall_analysis", {
            self.detect_wall(&working);
        });

        let step = self.geometry.piece_diameter();
        let search = MoveSearch::new(
            &self.geometry,
            step,
            self.config.board.tolerance,
            self.config.move_search.angle_increment,
        );

        let mut moves = Vec::with_capacity(count);
        let mut skipped = 0;
        let mut refilled = false;

        while moves.len() < count {
            while self.scheduler.consume(&working, &self.geometry).is_some() {}

            let Some(destination) = self.scheduler.next_movable() else {
                if refilled {
                    break;
                }
                refilled = true;
                let added =
                    profile!("schedule", { refill(&mut self.scheduler, &self.config, &working) });
                if added {
                    continue;
                }
                break;
            };

            let Some(from) = working.get(&destination.piece).copied() else {
                warn!(
                    "Dropping destination for unknown piece {}",
                    destination.piece
                );
                self.scheduler.pop();
                continue;
            };

            let found = profile!("move_search", {
                let bearing = search.best_direction(
                    destination.piece,
                    &from,
                    &destination.target,
                    &working,
                    &opponent,
                );
                search.find_legal_step(destination.piece, &from, bearing, &working, &opponent)
            });

            match found {
                Some(mv) => {
                    debug!(
                        "Piece {} -> ({:.2}, {:.2}) heading for ({:.2}, {:.2})",
                        mv.id, mv.to.x, mv.to.y, destination.target.x, destination.target.y
                    );
                    working.insert(mv.id, mv.to);
                    moves.push(mv);
                    self.scheduler.consume(&working, &self.geometry);
                }
                None => {
                    debug!("No legal step for piece {}, skipping it this turn", destination.piece);
                    self.scheduler.defer_top();
                    record_skipped_piece();
                    skipped += 1;
                }
            }
        }

        self.scheduler.restore_deferred();

        info!(
            "Turn {}: {} of {} moves, {} skipped, {} queued (time: {}ms)",
            self.turn,
            moves.len(),
            count,
            skipped,
            self.scheduler.len(),
            start_time.elapsed().as_millis()
        );

        if is_first_mover {
            moves.iter().map(Move::mirrored).collect()
        } else {
            moves
        }
    }

    /// Wall phase: analysis failures are logged and the turn continues without it
    fn detect_wall(&mut self, own: &Pieces) {
        let assessment =
            WallAnalyzer::new(&self.grid, &self.config.wall).assess(own, self.scheduler.committed());

        match assessment {
            Err(e) => warn!("Wall analysis failed, ignoring walls this turn: {}", e),
            Ok(None) => {}
            Ok(Some(ctx)) => self.respond_to_wall(&ctx, own),
        }
    }

    fn respond_to_wall(&mut self, ctx: &WallContext, own: &Pieces) {
        let half = self.geometry.piece_diameter() / 2.0;

        let held = self.scheduler.committed().iter().any(|id| {
            own.get(id)
                .map_or(false, |p| (ctx.column_x - p.x).abs() <= half)
        });
        if held || self.scheduler.has_pending_urgent() {
            return;
        }

        let Some((blocker, position)) = ctx
            .blocker
            .and_then(|id| own.get(&id).map(|p| (id, *p)))
        else {
            return;
        };
        if (ctx.column_x - position.x).abs() <= half {
            return;
        }

        if let Some(contest) = ctx.contest {
            if contest.advantage < self.config.wall.min_contest_advantage {
                debug!(
                    "Wall at x={:.1} not worth contesting (advantage {})",
                    ctx.column_x, contest.advantage
                );
                return;
            }
        }

        info!(
            "Block wall, move {} to ({:.1}, {:.1})",
            blocker, ctx.column_x, ctx.hole_y
        );
        self.scheduler
            .schedule_urgent(blocker, Point::new(ctx.column_x, ctx.hole_y));
    }

    pub fn runner(&self) -> Option<PieceId> {
        self.runner
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn piece_count(&self) -> usize {
        self.piece_count
    }

    pub fn turn_budget(&self) -> f64 {
        self.turn_budget
    }

    pub fn scheduler(&self) -> &DestinationScheduler {
        &self.scheduler
    }

    pub fn grid(&self) -> &OccupancyGrid {
        &self.grid
    }

    pub fn geometry(&self) -> &FlipBoard {
        &self.geometry
    }
}

/// Re-schedules every free piece that hasn't crossed the goal line yet
///
/// # Returns
/// Whether anything was scheduled
fn refill(scheduler: &mut DestinationScheduler, config: &Config, own: &Pieces) -> bool {
    let pending = scheduler.pending_pieces();
    let goal = config.board.goal_line_x;
    let half = scheduler.piece_diameter() / 2.0;
    let mut added = 0;

    for (&id, p) in own {
        if scheduler.is_committed(id) || pending.contains(&id) {
            continue;
        }
        if p.x - half + GOAL_EPSILON < goal {
            scheduler.schedule(Destination::new(
                p.x.abs(),
                id,
                Point::new(config.board.forward_line_x, p.y),
            ));
            added += 1;
        }
    }

    if added > 0 {
        debug!("Refilled schedule with {} pieces", added);
    }
    added > 0
}

fn orient(pieces: &Pieces, is_first_mover: bool) -> Pieces {
    if is_first_mover {
        mirror_pieces(pieces)
    } else {
        pieces.clone()
    }
}
