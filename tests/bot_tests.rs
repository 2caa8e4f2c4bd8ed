//! Session Registry Tests
//!
//! The Bot keeps one strategy session per match id across init, moves and end.

use flip_agent::bot::Bot;
use flip_agent::config::Config;
use flip_agent::types::{EndRequest, InitRequest, MovesRequest, WirePiece};

fn pieces(x: f64) -> Vec<WirePiece> {
    (0..4)
        .map(|i| WirePiece {
            id: i,
            x,
            y: -6.0 + 4.0 * i as f64,
        })
        .collect()
}

fn init_request(match_id: &str) -> InitRequest {
    InitRequest {
        match_id: match_id.to_string(),
        pieces: pieces(-40.0),
        piece_count: 4,
        turn_budget: 100.0,
        is_first_mover: false,
        piece_diameter: 2.0,
    }
}

fn moves_request(match_id: &str, turn: u32) -> MovesRequest {
    MovesRequest {
        match_id: match_id.to_string(),
        turn,
        count: 2,
        own: pieces(-40.0),
        opponent: pieces(40.0),
        is_first_mover: false,
    }
}

#[test]
fn test_full_match_lifecycle() {
    let bot = Bot::new(Config::default_hardcoded());
    bot.init(&init_request("m1"));
    assert_eq!(bot.session_count(), 1);

    let response = bot
        .get_moves(&moves_request("m1", 1))
        .expect("session exists");
    assert_eq!(response.moves.len(), 2);

    assert!(bot.end(&EndRequest {
        match_id: "m1".to_string()
    }));
    assert_eq!(bot.session_count(), 0);
    assert!(!bot.end(&EndRequest {
        match_id: "m1".to_string()
    }));
}

#[test]
fn test_unknown_match_has_no_moves() {
    let bot = Bot::new(Config::default_hardcoded());
    assert!(bot.get_moves(&moves_request("nope", 1)).is_none());
}

#[test]
fn test_sessions_are_independent() {
    let bot = Bot::new(Config::default_hardcoded());
    bot.init(&init_request("a"));
    bot.init(&init_request("b"));

    let first = bot.get_moves(&moves_request("a", 1)).expect("session a");
    let other = bot.get_moves(&moves_request("b", 1)).expect("session b");
    assert_eq!(first.moves, other.moves, "Same inputs give the same decisions");

    // Re-initialising replaces the session rather than adding one
    bot.init(&init_request("a"));
    assert_eq!(bot.session_count(), 2);
}

#[test]
fn test_info_identifies_the_game() {
    let bot = Bot::new(Config::default_hardcoded());
    assert_eq!(bot.info()["game"], "flip");
}
