//! Wall Detection Tests
//!
//! Crowded-column detection, gap selection, the contest heuristic and the full
//! per-turn assessment.

use std::collections::HashSet;

use flip_agent::config::{Config, WallConfig};
use flip_agent::grid::OccupancyGrid;
use flip_agent::types::{Pieces, Point};
use flip_agent::wall::{ContestedGap, WallAnalyzer};

fn wall_config() -> WallConfig {
    Config::default_hardcoded().wall
}

/// Opponent pieces placed at the centre of `col` for each row in `rows` on the standard
/// 120x40 board at resolution 2
fn column_of_opponents(col: usize, rows: impl IntoIterator<Item = usize>) -> Pieces {
    rows.into_iter()
        .enumerate()
        .map(|(i, row)| {
            (
                i as u32,
                Point::new(col as f64 * 2.0 - 59.0, row as f64 * 2.0 - 19.0),
            )
        })
        .collect()
}

fn standard_grid(own: &Pieces, opponent: &Pieces) -> OccupancyGrid {
    let mut grid = OccupancyGrid::new(120.0, 40.0, 2.0);
    grid.rebuild(own, opponent);
    grid
}

#[test]
fn test_dense_column_is_detected_at_its_left_edge() {
    let grid = standard_grid(&Pieces::new(), &column_of_opponents(15, 0..9));
    let config = wall_config();
    let analyzer = WallAnalyzer::new(&grid, &config);

    // 9 of 20 rows = 0.45 > 0.2
    assert_eq!(analyzer.find_crowded_column(-60.0, 60.0), Some(-30.0));
}

#[test]
fn test_sparse_column_is_not_a_wall() {
    // 4 of 20 rows = 0.2, which does not strictly exceed the threshold
    let grid = standard_grid(&Pieces::new(), &column_of_opponents(15, 5..9));
    let config = wall_config();
    let analyzer = WallAnalyzer::new(&grid, &config);

    assert_eq!(analyzer.find_crowded_column(-60.0, 60.0), None);
}

#[test]
fn test_leftmost_wall_wins() {
    let mut opponent = column_of_opponents(40, 0..10);
    for (i, p) in column_of_opponents(15, 5..15).into_values().enumerate() {
        opponent.insert(100 + i as u32, p);
    }
    let grid = standard_grid(&Pieces::new(), &opponent);
    let config = wall_config();
    let analyzer = WallAnalyzer::new(&grid, &config);

    assert_eq!(analyzer.find_crowded_column(-60.0, 60.0), Some(-30.0));
    // Restricting the scan skips the first wall
    assert_eq!(analyzer.find_crowded_column(-22.0, 60.0), Some(20.0));
}

#[test]
fn test_gap_row_is_the_emptiest_neighbourhood() {
    let rows = (0..20).filter(|r| !(4..=6).contains(r));
    let grid = standard_grid(&Pieces::new(), &column_of_opponents(15, rows));
    let config = wall_config();
    let analyzer = WallAnalyzer::new(&grid, &config);

    // Row 5 is the only row whose 3x3 neighbourhood is entirely empty
    assert_eq!(analyzer.find_gap_row(-30.0), Some(-10.0));
}

#[test]
fn test_gap_row_ties_go_to_the_centre() {
    let grid = standard_grid(&Pieces::new(), &Pieces::new());
    let config = wall_config();
    let analyzer = WallAnalyzer::new(&grid, &config);

    // Every interior row is equally empty; row 10 is the centre of 20 rows
    assert_eq!(analyzer.find_gap_row(-30.0), Some(0.0));
}

#[test]
fn test_contest_claims_each_defender_once() {
    // 20x20 board at resolution 2 gives a 10x10 grid; cell (r, c) is centred at
    // (2c - 9, 2r - 9)
    let mut grid = OccupancyGrid::new(20.0, 20.0, 2.0);
    let mut opponent = Pieces::new();
    opponent.insert(0, Point::new(2.0 * 3.0 - 9.0, 2.0 * 5.0 - 9.0)); // (5, 3)
    opponent.insert(1, Point::new(2.0 * 1.0 - 9.0, 2.0 * 8.0 - 9.0)); // (8, 1), left of column
    grid.rebuild(&Pieces::new(), &opponent);

    let config = wall_config();
    let analyzer = WallAnalyzer::new(&grid, &config);
    let contest = analyzer.contested_gap_advantage(0, 10, 2, 9, 9);

    // Rows 7..10: row 7 claims (5, 3) at distance 3, the other two rows find nothing
    // and cost rows + cols = 20 each. The runner at (9, 9) is 8 cells from (8, 2).
    assert_eq!(
        contest,
        Some(ContestedGap {
            row_low: 7,
            row_high: 10,
            mid_row: 8,
            opponent_cost: 43,
            own_cost: 8,
            advantage: 35,
        })
    );
}

/// Centre of cell (row, col) on a 20x20 board at resolution 2
fn small_board_cell(row: usize, col: usize) -> Point {
    Point::new(col as f64 * 2.0 - 9.0, row as f64 * 2.0 - 9.0)
}

#[test]
fn test_contest_ties_keep_the_later_window() {
    let mut grid = OccupancyGrid::new(20.0, 20.0, 2.0);
    let mut opponent = Pieces::new();
    opponent.insert(0, small_board_cell(0, 3));
    grid.rebuild(&Pieces::new(), &opponent);

    let mut config = wall_config();
    config.gap_span_rows = 1;
    let analyzer = WallAnalyzer::new(&grid, &config);

    // With the runner at (0, 2), row r costs the opponent r + 1 and us r, so every
    // single-row window has advantage 1
    let contest = analyzer
        .contested_gap_advantage(0, 10, 2, 0, 2)
        .expect("rows to contest");

    assert_eq!(contest.advantage, 1);
    assert_eq!(contest.row_low, 9, "Equal advantages keep the last window scanned");
    assert_eq!(contest.opponent_cost, 10);
    assert_eq!(contest.own_cost, 9);
}

#[test]
fn test_contest_equidistant_defenders_claimed_in_scan_order() {
    let mut grid = OccupancyGrid::new(20.0, 20.0, 2.0);
    let mut opponent = Pieces::new();
    opponent.insert(0, small_board_cell(5, 3));
    opponent.insert(1, small_board_cell(3, 3));
    grid.rebuild(&Pieces::new(), &opponent);

    let mut config = wall_config();
    config.gap_span_rows = 2;
    let analyzer = WallAnalyzer::new(&grid, &config);

    // Row 4 is 2 away from both defenders and claims (3, 3), first in row-major order.
    // Row 5 then takes (5, 3) at distance 1. The other way round would cost 2 + 3.
    let contest = analyzer
        .contested_gap_advantage(4, 6, 2, 4, 2)
        .expect("one window");

    assert_eq!(contest.row_low, 4);
    assert_eq!(contest.opponent_cost, 3);
    assert_eq!(contest.own_cost, 1);
    assert_eq!(contest.advantage, 2);
}

#[test]
fn test_contest_on_empty_range_is_none() {
    let grid = OccupancyGrid::new(20.0, 20.0, 2.0);
    let config = wall_config();
    let analyzer = WallAnalyzer::new(&grid, &config);
    assert_eq!(analyzer.contested_gap_advantage(6, 6, 2, 0, 0), None);
}

/// Wall in column 30 (x = 0) with a three-row hole around the centre
fn walled_board(own: &Pieces) -> OccupancyGrid {
    let rows = (0..20).filter(|r| !(9..=11).contains(r));
    standard_grid(own, &column_of_opponents(30, rows))
}

#[test]
fn test_assess_picks_nearest_reachable_blocker() {
    let mut own = Pieces::new();
    own.insert(0, Point::new(-10.0, 1.0));
    own.insert(1, Point::new(-40.0, 15.0));
    let grid = walled_board(&own);
    let config = wall_config();
    let analyzer = WallAnalyzer::new(&grid, &config);

    let ctx = analyzer
        .assess(&own, &HashSet::new())
        .expect("assessment should succeed")
        .expect("wall should be found");

    assert_eq!(ctx.column_x, 0.0);
    assert_eq!(ctx.hole_y, 0.0);
    assert_eq!(ctx.blocker, Some(0));
    let contest = ctx.contest.expect("blocker should be evaluated");
    assert!(contest.advantage > 0, "No defenders right of the wall: {:?}", contest);
}

#[test]
fn test_assess_never_picks_committed_piece() {
    let mut own = Pieces::new();
    own.insert(0, Point::new(-10.0, 1.0));
    own.insert(1, Point::new(-40.0, 15.0));
    own.insert(2, Point::new(-50.0, -15.0));
    let grid = walled_board(&own);
    let config = wall_config();
    let analyzer = WallAnalyzer::new(&grid, &config);

    let committed: HashSet<u32> = [0].into_iter().collect();
    let ctx = analyzer
        .assess(&own, &committed)
        .expect("assessment should succeed")
        .expect("wall should be found");

    // Falls back to the free piece laterally closest to the wall
    assert_eq!(ctx.blocker, Some(1));
}
