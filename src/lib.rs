// Library exports for the Flip agent
// This allows the replay tool and the integration tests to use the core decision logic

pub mod bot;
pub mod config;
pub mod debug_logger;
pub mod geometry;
pub mod grid;
pub mod move_search;
pub mod pathfinding;
pub mod replay;
pub mod scheduler;
pub mod simple_profiler;
pub mod strategy;
pub mod types;
pub mod wall;
