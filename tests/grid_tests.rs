//! Occupancy Grid Tests
//!
//! Quantization of continuous positions into cells and the per-turn rebuild.

use flip_agent::grid::{Cell, OccupancyGrid};
use flip_agent::types::{CellPos, Pieces, Point};

fn standard_grid() -> OccupancyGrid {
    OccupancyGrid::new(120.0, 40.0, 2.0)
}

#[test]
fn test_origin_opponent_lands_in_centre_cell() {
    let mut grid = standard_grid();
    assert_eq!(grid.rows(), 20, "Height 40 at resolution 2 gives 20 rows");
    assert_eq!(grid.cols(), 60, "Width 120 at resolution 2 gives 60 columns");

    grid.record_opponent([Point::new(0.0, 0.0)].iter());

    assert_eq!(grid.get(&CellPos::new(10, 30)), Some(Cell::Opponent));
    assert_eq!(
        grid.cells().filter(|(_, c)| *c != Cell::Empty).count(),
        1,
        "Only one cell should be marked"
    );
}

#[test]
fn test_rebuild_reflects_only_current_positions() {
    let mut grid = standard_grid();

    let mut own = Pieces::new();
    own.insert(0, Point::new(-40.0, 5.0));
    let mut opponent = Pieces::new();
    opponent.insert(0, Point::new(10.0, -5.0));
    grid.rebuild(&own, &opponent);

    // Everything moves; the old cells must be cleared
    let mut own_next = Pieces::new();
    own_next.insert(0, Point::new(-38.0, 5.0));
    let mut opponent_next = Pieces::new();
    opponent_next.insert(0, Point::new(12.0, -5.0));
    grid.rebuild(&own_next, &opponent_next);

    let marked: Vec<(CellPos, Cell)> = grid.cells().filter(|(_, c)| *c != Cell::Empty).collect();
    assert_eq!(marked.len(), 2);
    assert_eq!(
        grid.get(&grid.cell_of(&Point::new(-38.0, 5.0))),
        Some(Cell::Owned(0))
    );
    assert_eq!(
        grid.get(&grid.cell_of(&Point::new(12.0, -5.0))),
        Some(Cell::Opponent)
    );
    assert!(grid.is_free(&grid.cell_of(&Point::new(-40.0, 5.0))));
}

#[test]
fn test_own_piece_wins_shared_cell() {
    let mut grid = standard_grid();
    let mut own = Pieces::new();
    own.insert(3, Point::new(0.2, 0.2));
    let mut opponent = Pieces::new();
    opponent.insert(9, Point::new(0.8, 0.8));

    grid.rebuild(&own, &opponent);

    assert_eq!(grid.get(&CellPos::new(10, 30)), Some(Cell::Owned(3)));
}

#[test]
fn test_cell_centre_is_within_resolution_of_position() {
    let grid = standard_grid();
    for &(x, y) in &[(0.0, 0.0), (-59.0, 19.0), (33.3, -7.7), (-0.1, 0.1), (21.0, 12.5)] {
        let p = Point::new(x, y);
        let centre = grid.center_of(&grid.cell_of(&p));
        assert!(
            (centre.x - p.x).abs() <= grid.resolution() && (centre.y - p.y).abs() <= grid.resolution(),
            "Centre {:?} too far from {:?}",
            centre,
            p
        );
    }
}

#[test]
fn test_column_and_row_edges() {
    let grid = standard_grid();
    assert_eq!(grid.column_x(0), -60.0);
    assert_eq!(grid.column_x(15), -30.0);
    assert_eq!(grid.row_y(0), -20.0);
    assert_eq!(grid.row_y(10), 0.0);
    assert_eq!(grid.col_index(-30.0), 15);
    assert_eq!(grid.row_index(-0.5), 9);
}
