// Flip agent with one strategy session per match
//
// The HTTP handlers and the replay tool both drive the agent through this type. It owns
// the static configuration and a registry of live sessions keyed by match id.

use log::{info, warn};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::config::Config;
use crate::strategy::Strategy;
use crate::types::{
    pieces_from_wire, EndRequest, InitRequest, MovesRequest, MovesResponse, WirePiece,
};

/// Flip agent exposing methods corresponding to the host's calls
pub struct Bot {
    config: Config,
    sessions: Mutex<HashMap<String, Strategy>>,
}

impl Bot {
    /// Creates a new Bot instance with the given configuration
    ///
    /// # Arguments
    /// * `config` - Static configuration shared by every match
    pub fn new(config: Config) -> Self {
        Bot {
            config,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Returns agent metadata
    /// Corresponds to GET / endpoint
    pub fn info(&self) -> Value {
        info!("INFO");

        json!({
            "apiversion": "1",
            "author": "g2a",
            "game": "flip",
            "strategy": "runner-wall",
        })
    }

    /// Starts a match, replacing any session with the same id
    /// Corresponds to POST /init endpoint
    pub fn init(&self, req: &InitRequest) {
        info!("MATCH START {}", req.match_id);

        let strategy = Strategy::init(
            self.config.clone(),
            &pieces_from_wire(&req.pieces),
            req.piece_count,
            req.turn_budget,
            req.is_first_mover,
            req.piece_diameter,
        );

        if self
            .sessions
            .lock()
            .insert(req.match_id.clone(), strategy)
            .is_some()
        {
            warn!("Match {} was re-initialised", req.match_id);
        }
    }

    /// Computes this turn's moves
    /// Corresponds to POST /moves endpoint
    ///
    /// # Returns
    /// * `Some(MovesResponse)` - Moves in host orientation
    /// * `None` - No session exists for the match id
    pub fn get_moves(&self, req: &MovesRequest) -> Option<MovesResponse> {
        let mut sessions = self.sessions.lock();
        let strategy = sessions.get_mut(&req.match_id)?;

        let moves = strategy.get_moves(
            req.count,
            &pieces_from_wire(&req.own),
            &pieces_from_wire(&req.opponent),
            req.is_first_mover,
        );

        Some(MovesResponse {
            moves: moves.into_iter().map(WirePiece::from).collect(),
        })
    }

    /// Drops the match's session
    /// Corresponds to POST /end endpoint
    pub fn end(&self, req: &EndRequest) -> bool {
        info!("MATCH OVER {}", req.match_id);
        self.sessions.lock().remove(&req.match_id).is_some()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.lock().len()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
