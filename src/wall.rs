// Wall detection and gap contest heuristics
//
// A "wall" is a grid column densely packed with opponent pieces, usually built to block
// the corridor our pieces race through. The analyzer finds the leftmost such column, the
// weakest row in it (the gap), the piece of ours best placed to plug that gap, and how
// the race for the gap compares against the opponent's cost of refilling it.

use std::collections::HashSet;

use log::debug;
use thiserror::Error;

use crate::config::WallConfig;
use crate::grid::{Cell, OccupancyGrid};
use crate::pathfinding::nearest_occupied_cell;
use crate::types::{CellPos, PieceId, Pieces};

/// Failures at the wall-analysis boundary; callers log them and carry on
#[derive(Debug, Error, PartialEq)]
pub enum WallError {
    #[error("occupancy grid has no cells")]
    EmptyGrid,
    #[error("wall scan range [{x_min}, {x_max}) is empty")]
    InvalidScanRange { x_min: f64, x_max: f64 },
}

/// Result of racing for one candidate gap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContestedGap {
    /// First row of the gap (inclusive)
    pub row_low: usize,
    /// Last row of the gap (exclusive)
    pub row_high: usize,
    pub mid_row: usize,
    /// Greedy total distance for the opponent to refill every row of the gap
    pub opponent_cost: i64,
    /// Distance from our runner to the gap midpoint
    pub own_cost: i64,
    pub advantage: i64,
}

/// Per-turn wall assessment
#[derive(Debug, Clone, PartialEq)]
pub struct WallContext {
    pub column_x: f64,
    pub hole_y: f64,
    /// Our piece chosen to plug the hole
    pub blocker: Option<PieceId>,
    /// Best gap in the column from the blocker's point of view
    pub contest: Option<ContestedGap>,
}

pub struct WallAnalyzer<'a> {
    grid: &'a OccupancyGrid,
    config: &'a WallConfig,
}

impl<'a> WallAnalyzer<'a> {
    pub fn new(grid: &'a OccupancyGrid, config: &'a WallConfig) -> Self {
        WallAnalyzer { grid, config }
    }

    /// Leftmost column in `[x_min, x_max)` whose opponent fraction strictly exceeds the
    /// density threshold, as the column's continuous x
    pub fn find_crowded_column(&self, x_min: f64, x_max: f64) -> Option<f64> {
        self.crowded_column_index(x_min, x_max)
            .map(|col| self.grid.column_x(col))
    }

    fn crowded_column_index(&self, x_min: f64, x_max: f64) -> Option<usize> {
        let rows = self.grid.rows();
        if rows == 0 {
            return None;
        }
        let from = bounded(self.grid.col_index(x_min), self.grid.cols());
        let to = bounded(self.grid.col_index(x_max), self.grid.cols());

        (from..to).find(|&col| {
            let occupied = (0..rows)
                .filter(|&row| self.grid.is_opponent(&CellPos::new(row, col)))
                .count();
            occupied as f64 / rows as f64 > self.config.density_threshold
        })
    }

    /// Row of the column at `x` with the most empty cells around it, as continuous y
    ///
    /// Ties go to the row nearest the vertical centre of the grid.
    pub fn find_gap_row(&self, x: f64) -> Option<f64> {
        let col = bounded(self.grid.col_index(x), self.grid.cols().saturating_sub(1));
        self.gap_row_index(col).map(|row| self.grid.row_y(row))
    }

    fn gap_row_index(&self, col: usize) -> Option<usize> {
        let rows = self.grid.rows();
        let cols = self.grid.cols();
        let center = rows / 2;
        let mut best: Option<(usize, usize)> = None;

        for row in 0..rows {
            let mut blanks = 0;
            for r in row.saturating_sub(1)..(row + 2).min(rows) {
                for c in col.saturating_sub(1)..(col + 2).min(cols) {
                    if self.grid.is_free(&CellPos::new(r, c)) {
                        blanks += 1;
                    }
                }
            }

            let better = match best {
                None => true,
                Some((best_row, best_blanks)) => {
                    blanks > best_blanks
                        || (blanks == best_blanks
                            && row.abs_diff(center) < best_row.abs_diff(center))
                }
            };
            if better {
                best = Some((row, blanks));
            }
        }

        best.map(|(row, _)| row)
    }

    /// Picks the gap in `[row_low, row_high)` of `column` we can best defend
    ///
    /// Candidate gaps are windows of `gap_span_rows` rows scanned bottom-up. For each,
    /// every row greedily claims the nearest unclaimed opponent cell right of `column`;
    /// the claimed distances are the opponent's refill cost. The advantage is that cost
    /// minus our runner's Manhattan distance to the gap midpoint. Ties keep the later
    /// window.
    pub fn contested_gap_advantage(
        &self,
        row_low: usize,
        row_high: usize,
        column: usize,
        runner_row: usize,
        runner_col: usize,
    ) -> Option<ContestedGap> {
        let row_high = row_high.min(self.grid.rows());
        if row_low >= row_high {
            return None;
        }

        let defenders: Vec<CellPos> = self
            .grid
            .cells()
            .filter(|(pos, cell)| *cell == Cell::Opponent && pos.col > column)
            .map(|(pos, _)| pos)
            .collect();
        let unreachable = (self.grid.rows() + self.grid.cols()) as i64;
        let runner = CellPos::new(runner_row, runner_col);

        let span = self.config.gap_span_rows.max(1).min(row_high - row_low);
        let mut best: Option<ContestedGap> = None;

        for start in row_low..=(row_high - span) {
            let mut used = vec![false; defenders.len()];
            let mut opponent_cost = 0i64;

            for row in start..start + span {
                let slot = CellPos::new(row, column);
                let mut nearest: Option<(usize, usize)> = None;
                for (i, defender) in defenders.iter().enumerate() {
                    if used[i] {
                        continue;
                    }
                    let d = defender.manhattan(&slot);
                    if nearest.map_or(true, |(_, best_d)| d < best_d) {
                        nearest = Some((i, d));
                    }
                }
                match nearest {
                    Some((i, d)) => {
                        used[i] = true;
                        opponent_cost += d as i64;
                    }
                    None => opponent_cost += unreachable,
                }
            }

            let mid_row = start + span / 2;
            let own_cost = runner.manhattan(&CellPos::new(mid_row, column)) as i64;
            let candidate = ContestedGap {
                row_low: start,
                row_high: start + span,
                mid_row,
                opponent_cost,
                own_cost,
                advantage: opponent_cost - own_cost,
            };
            if best.map_or(true, |b| candidate.advantage >= b.advantage) {
                best = Some(candidate);
            }
        }

        best
    }

    /// Full wall assessment for this turn
    ///
    /// # Arguments
    /// * `own` - Our pieces, canonical orientation
    /// * `committed` - Pieces already holding a gap; never chosen as blocker
    ///
    /// # Returns
    /// * `Ok(None)` - No column in the scan range is crowded
    /// * `Ok(Some(ctx))` - A wall, its hole and the blocker/contest evaluation
    /// * `Err(WallError)` - The grid can't support the analysis this turn
    pub fn assess(
        &self,
        own: &Pieces,
        committed: &HashSet<PieceId>,
    ) -> Result<Option<WallContext>, WallError> {
        if self.grid.is_empty() {
            return Err(WallError::EmptyGrid);
        }
        let (x_min, x_max) = (self.config.scan_x_min, self.config.scan_x_max);
        if x_min >= x_max {
            return Err(WallError::InvalidScanRange { x_min, x_max });
        }

        let Some(col) = self.crowded_column_index(x_min, x_max) else {
            return Ok(None);
        };
        let column_x = self.grid.column_x(col);

        let hole_row = self.gap_row_index(col).ok_or(WallError::EmptyGrid)?;
        let hole_y = self.grid.row_y(hole_row);
        let hole = CellPos::new(hole_row, col);

        let blocker = match nearest_occupied_cell(self.grid, hole) {
            Some(path) if !committed.contains(&path.piece) => {
                debug!(
                    "Piece {} reaches gap {:?} in {} cells",
                    path.piece,
                    hole,
                    path.len()
                );
                Some(path.piece)
            }
            _ => own
                .iter()
                .filter(|(id, _)| !committed.contains(*id))
                .min_by(|a, b| {
                    (column_x - a.1.x)
                        .abs()
                        .total_cmp(&(column_x - b.1.x).abs())
                })
                .map(|(&id, _)| id),
        };

        let contest = blocker.and_then(|id| own.get(&id)).and_then(|p| {
            let runner = self.grid.cell_of(p);
            self.contested_gap_advantage(0, self.grid.rows(), col, runner.row, runner.col)
        });

        Ok(Some(WallContext {
            column_x,
            hole_y,
            blocker,
            contest,
        }))
    }
}

fn bounded(index: i64, max: usize) -> usize {
    if index <= 0 {
        0
    } else {
        (index as usize).min(max)
    }
}
