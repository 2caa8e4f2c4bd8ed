// Replay module for analyzing logged matches and debugging decision-making
//
// This module provides functionality to:
// 1. Parse JSONL debug logs
// 2. Re-run a match through a fresh strategy session, turn by turn
// 3. Compare logged vs replayed moves
// 4. Audit every logged move against the board rules

use log::{info, warn};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use crate::config::Config;
use crate::debug_logger::{LogEntry, LogEvent};
use crate::geometry::{BoardGeometry, FlipBoard};
use crate::strategy::Strategy;
use crate::types::{pieces_from_wire, InitRequest, Move, MovesRequest, WirePiece};

/// Positions closer than this are considered the same move
const POSITION_EPSILON: f64 = 1e-6;

/// Result of replaying a single turn
#[derive(Debug, Clone)]
pub struct ReplayResult {
    pub turn: u32,
    pub logged_moves: Vec<WirePiece>,
    pub replayed_moves: Vec<WirePiece>,
    pub matches: bool,
    /// Rule violations found in the logged moves
    pub violations: Vec<String>,
    pub computation_time_ms: u128,
}

/// Statistics for a complete replay session
#[derive(Debug, Default)]
pub struct ReplayStats {
    pub total_turns: usize,
    pub matches: usize,
    pub mismatches: usize,
    pub illegal_turns: usize,
    pub match_rate: f64,
}

/// Replay engine for analyzing debug logs
pub struct ReplayEngine {
    config: Config,
    verbose: bool,
}

impl ReplayEngine {
    /// Creates a new replay engine with the given configuration
    pub fn new(config: Config, verbose: bool) -> Self {
        ReplayEngine { config, verbose }
    }

    /// Loads all log entries from a JSONL file
    pub fn load_log_file<P: AsRef<Path>>(&self, log_path: P) -> Result<Vec<LogEntry>, String> {
        let file =
            File::open(log_path.as_ref()).map_err(|e| format!("Failed to open log file: {}", e))?;

        let reader = BufReader::new(file);
        let mut lines = Vec::new();
        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| format!("Failed to read line {}: {}", line_num + 1, e))?;
            lines.push(line);
        }

        let entries = Self::parse_entries(lines.iter().map(String::as_str))?;
        info!("Loaded {} log entries", entries.len());
        Ok(entries)
    }

    /// Parses JSONL lines, skipping blank ones
    pub fn parse_entries<'a, I>(lines: I) -> Result<Vec<LogEntry>, String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut entries = Vec::new();
        for (line_num, line) in lines.into_iter().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let entry: LogEntry = serde_json::from_str(line).map_err(|e| {
                format!("Failed to parse JSON on line {}: {}", line_num + 1, e)
            })?;
            entries.push(entry);
        }
        Ok(entries)
    }

    /// Match ids in order of first appearance
    pub fn match_ids(entries: &[LogEntry]) -> Vec<String> {
        let mut ids: Vec<String> = Vec::new();
        for entry in entries {
            let id = entry.event.match_id();
            if !ids.iter().any(|known| known == id) {
                ids.push(id.to_string());
            }
        }
        ids
    }

    /// Replays one match from its init entry through every logged turn
    pub fn replay_match(
        &self,
        entries: &[LogEntry],
        match_id: &str,
    ) -> Result<Vec<ReplayResult>, String> {
        let init = entries
            .iter()
            .find_map(|e| match &e.event {
                LogEvent::Init { request } if request.match_id == match_id => Some(request),
                _ => None,
            })
            .ok_or_else(|| format!("No init entry for match '{}'", match_id))?;

        let mut strategy = Strategy::init(
            self.config.clone(),
            &pieces_from_wire(&init.pieces),
            init.piece_count,
            init.turn_budget,
            init.is_first_mover,
            init.piece_diameter,
        );
        let board = FlipBoard::new(&self.config.board, init.piece_diameter);

        let mut results = Vec::new();
        for entry in entries {
            let LogEvent::Turn { request, response } = &entry.event else {
                continue;
            };
            if request.match_id != match_id {
                continue;
            }

            let start_time = Instant::now();
            let replayed: Vec<WirePiece> = strategy
                .get_moves(
                    request.count,
                    &pieces_from_wire(&request.own),
                    &pieces_from_wire(&request.opponent),
                    request.is_first_mover,
                )
                .into_iter()
                .map(WirePiece::from)
                .collect();
            let computation_time_ms = start_time.elapsed().as_millis();

            let matches = same_moves(&response.moves, &replayed);
            let violations = audit_moves(&board, init, request, &response.moves);

            if self.verbose {
                if matches {
                    info!("Turn {}: ✓ MATCH ({} moves)", request.turn, replayed.len());
                } else {
                    warn!(
                        "Turn {}: ✗ MISMATCH - logged {:?}, replayed {:?}",
                        request.turn, response.moves, replayed
                    );
                }
                for violation in &violations {
                    warn!("Turn {}: illegal logged move: {}", request.turn, violation);
                }
            }

            results.push(ReplayResult {
                turn: request.turn,
                logged_moves: response.moves.clone(),
                replayed_moves: replayed,
                matches,
                violations,
                computation_time_ms,
            });
        }

        Ok(results)
    }

    /// Replays every match in the log
    pub fn replay_all(&self, entries: &[LogEntry]) -> Result<Vec<ReplayResult>, String> {
        let mut results = Vec::new();

        for match_id in Self::match_ids(entries) {
            match self.replay_match(entries, &match_id) {
                Ok(r) => results.extend(r),
                Err(e) => warn!("Failed to replay match {}: {}", match_id, e),
            }
        }

        Ok(results)
    }

    /// Generates statistics from replay results
    pub fn generate_stats(&self, results: &[ReplayResult]) -> ReplayStats {
        let total_turns = results.len();
        let matches = results.iter().filter(|r| r.matches).count();
        let illegal_turns = results.iter().filter(|r| !r.violations.is_empty()).count();
        let match_rate = if total_turns > 0 {
            (matches as f64 / total_turns as f64) * 100.0
        } else {
            0.0
        };

        ReplayStats {
            total_turns,
            matches,
            mismatches: total_turns - matches,
            illegal_turns,
            match_rate,
        }
    }

    /// Prints a detailed report of replay results
    pub fn print_report(&self, results: &[ReplayResult]) {
        let stats = self.generate_stats(results);

        println!("\n═══════════════════════════════════════════════════════════");
        println!("                    REPLAY REPORT");
        println!("═══════════════════════════════════════════════════════════");
        println!("Total Turns:    {}", stats.total_turns);
        println!("Matches:        {} ({:.1}%)", stats.matches, stats.match_rate);
        println!("Mismatches:     {}", stats.mismatches);
        println!("Illegal Turns:  {}", stats.illegal_turns);
        println!("═══════════════════════════════════════════════════════════\n");

        if !results.is_empty() {
            let avg_time: f64 = results
                .iter()
                .map(|r| r.computation_time_ms as f64)
                .sum::<f64>()
                / results.len() as f64;
            println!("Average Computation Time:   {:.1}ms\n", avg_time);
        }

        let flagged: Vec<_> = results
            .iter()
            .filter(|r| !r.matches || !r.violations.is_empty())
            .collect();
        if !flagged.is_empty() {
            println!("═══════════════════════════════════════════════════════════");
            println!("                  DETAILED FINDINGS");
            println!("═══════════════════════════════════════════════════════════");

            for result in flagged {
                if !result.matches {
                    println!(
                        "Turn {}: logged {} move(s), replayed {} move(s)",
                        result.turn,
                        result.logged_moves.len(),
                        result.replayed_moves.len()
                    );
                }
                for violation in &result.violations {
                    println!("Turn {}: {}", result.turn, violation);
                }
            }
            println!();
        }
    }
}

fn same_moves(a: &[WirePiece], b: &[WirePiece]) -> bool {
    a.len() == b.len()
        && a.iter().zip(b).all(|(m, n)| {
            m.id == n.id
                && (m.x - n.x).abs() < POSITION_EPSILON
                && (m.y - n.y).abs() < POSITION_EPSILON
        })
}

/// Checks logged moves in order, applying each before judging the next
///
/// # Returns
/// One human-readable description per violated rule
pub fn audit_moves<G: BoardGeometry>(
    board: &G,
    init: &InitRequest,
    request: &MovesRequest,
    moves: &[WirePiece],
) -> Vec<String> {
    let mut own = pieces_from_wire(&request.own);
    let opponent = pieces_from_wire(&request.opponent);
    let mut violations = Vec::new();

    if moves.len() > request.count {
        violations.push(format!(
            "{} moves returned but only {} requested",
            moves.len(),
            request.count
        ));
    }

    for wire in moves {
        let mv = Move::from(*wire);
        let Some(from) = own.get(&mv.id).copied() else {
            violations.push(format!("piece {} is not ours", mv.id));
            continue;
        };

        if !board.almost_equal(board.distance(&from, &mv.to), init.piece_diameter) {
            violations.push(format!("piece {} did not move exactly one step", mv.id));
        }
        if board.collides(&own, &mv) {
            violations.push(format!("piece {} collides with our pieces", mv.id));
        }
        if board.collides(&opponent, &mv) {
            violations.push(format!("piece {} collides with opponent pieces", mv.id));
        }
        if !board.within_bounds(&mv.to) {
            violations.push(format!("piece {} leaves the board", mv.id));
        }

        own.insert(mv.id, mv.to);
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_request() -> InitRequest {
        InitRequest {
            match_id: "m1".to_string(),
            pieces: vec![WirePiece { id: 0, x: -30.0, y: 0.0 }],
            piece_count: 1,
            turn_budget: 100.0,
            is_first_mover: false,
            piece_diameter: 2.0,
        }
    }

    fn moves_request() -> MovesRequest {
        MovesRequest {
            match_id: "m1".to_string(),
            turn: 1,
            count: 1,
            own: vec![WirePiece { id: 0, x: -30.0, y: 0.0 }],
            opponent: vec![WirePiece { id: 0, x: -27.0, y: 0.0 }],
            is_first_mover: false,
        }
    }

    #[test]
    fn test_audit_accepts_legal_step() {
        let board = FlipBoard::new(&Config::default_hardcoded().board, 2.0);
        let moves = vec![WirePiece { id: 0, x: -30.0, y: 2.0 }];
        assert!(audit_moves(&board, &init_request(), &moves_request(), &moves).is_empty());
    }

    #[test]
    fn test_audit_flags_collision_and_short_step() {
        let board = FlipBoard::new(&Config::default_hardcoded().board, 2.0);
        let moves = vec![WirePiece { id: 0, x: -28.5, y: 0.0 }];
        let violations = audit_moves(&board, &init_request(), &moves_request(), &moves);
        assert_eq!(violations.len(), 2);
    }

    #[test]
    fn test_blank_lines_are_skipped_and_bad_json_reports_line() {
        let err = ReplayEngine::parse_entries(vec!["", "  ", "{not json"]).unwrap_err();
        assert!(err.contains("line 3"), "unexpected error: {}", err);
    }
}
