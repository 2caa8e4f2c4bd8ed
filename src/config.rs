// Configuration module for reading Flip.toml
// Every tunable used by the agent lives here so strategies can be adjusted without rebuilding

use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub board: BoardConfig,
    pub grid: GridConfig,
    pub wall: WallConfig,
    pub move_search: MoveSearchConfig,
    pub debug: DebugConfig,
}

/// Board geometry and strategic lines, expressed in the canonical orientation
/// (pieces advance towards +x)
#[derive(Debug, Deserialize, Clone)]
pub struct BoardConfig {
    pub width: f64,
    pub height: f64,
    /// A piece has scored once it is fully beyond this x
    pub goal_line_x: f64,
    /// x coordinate pieces are scheduled towards
    pub forward_line_x: f64,
    /// The runner is the piece closest to this point at init
    pub runner_pick_x: f64,
    pub runner_pick_y: f64,
    /// Tolerance used by the "almost equal" comparison
    pub tolerance: f64,
}

impl BoardConfig {
    pub fn half_width(&self) -> f64 {
        self.width / 2.0
    }

    pub fn half_height(&self) -> f64 {
        self.height / 2.0
    }
}

/// Occupancy grid constants
#[derive(Debug, Deserialize, Clone)]
pub struct GridConfig {
    pub resolution: f64,
}

/// Wall detection and contest constants
#[derive(Debug, Deserialize, Clone)]
pub struct WallConfig {
    /// Opponent fraction a column must strictly exceed to count as a wall
    pub density_threshold: f64,
    pub scan_x_min: f64,
    pub scan_x_max: f64,
    /// Height in rows of one candidate gap in the contest evaluation
    pub gap_span_rows: usize,
    /// Minimum (opponent cost - own cost) before a blocker is sent
    pub min_contest_advantage: i64,
}

/// Angular legal-step search constants
#[derive(Debug, Deserialize, Clone)]
pub struct MoveSearchConfig {
    /// Radians added to the search window after each failed pair of candidates
    pub angle_increment: f64,
}

/// Debug configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DebugConfig {
    pub enabled: bool,
    pub log_file_path: String,
}

impl Config {
    /// Loads configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the Flip.toml configuration file
    ///
    /// # Returns
    /// * `Result<Config, String>` - Parsed configuration or error message
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        toml::from_str(&contents).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Loads default configuration from Flip.toml in the project root
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("Flip.toml")
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the constants defined in Flip.toml
    pub fn default_hardcoded() -> Self {
        Config {
            board: BoardConfig {
                width: 120.0,
                height: 40.0,
                goal_line_x: 20.0,
                forward_line_x: 21.0,
                runner_pick_x: 0.0,
                runner_pick_y: 0.0,
                tolerance: 0.01,
            },
            grid: GridConfig { resolution: 2.0 },
            wall: WallConfig {
                density_threshold: 0.2,
                scan_x_min: -22.0,
                scan_x_max: 22.0,
                gap_span_rows: 3,
                min_contest_advantage: 0,
            },
            move_search: MoveSearchConfig {
                angle_increment: 0.01,
            },
            debug: DebugConfig {
                enabled: false,
                log_file_path: "flip_debug.jsonl".to_string(),
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            log::warn!(
                "Could not load Flip.toml ({}), using hardcoded defaults",
                e
            );
            Self::default_hardcoded()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_half_extents() {
        let config = Config::default_hardcoded();
        assert_eq!(config.board.half_width(), 60.0);
        assert_eq!(config.board.half_height(), 20.0);
    }

    #[test]
    fn test_flip_toml_can_be_parsed() {
        let result = Config::from_file("Flip.toml");
        assert!(
            result.is_ok(),
            "Failed to parse Flip.toml: {:?}",
            result.err()
        );
    }

    #[test]
    fn test_all_config_values_match_hardcoded_defaults() {
        let file_config = Config::from_file("Flip.toml").expect("Flip.toml should be parseable");
        let hardcoded = Config::default_hardcoded();

        assert_eq!(file_config.board.width, hardcoded.board.width);
        assert_eq!(file_config.board.height, hardcoded.board.height);
        assert_eq!(file_config.board.goal_line_x, hardcoded.board.goal_line_x);
        assert_eq!(file_config.board.forward_line_x, hardcoded.board.forward_line_x);
        assert_eq!(file_config.board.tolerance, hardcoded.board.tolerance);
        assert_eq!(file_config.grid.resolution, hardcoded.grid.resolution);
        assert_eq!(
            file_config.wall.density_threshold,
            hardcoded.wall.density_threshold
        );
        assert_eq!(file_config.wall.scan_x_min, hardcoded.wall.scan_x_min);
        assert_eq!(file_config.wall.scan_x_max, hardcoded.wall.scan_x_max);
        assert_eq!(file_config.wall.gap_span_rows, hardcoded.wall.gap_span_rows);
        assert_eq!(
            file_config.wall.min_contest_advantage,
            hardcoded.wall.min_contest_advantage
        );
        assert_eq!(
            file_config.move_search.angle_increment,
            hardcoded.move_search.angle_increment
        );
        assert!(!file_config.debug.log_file_path.is_empty());
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let result = Config::from_file("nonexistent.toml");
        assert!(result.is_err());
    }
}
