// HTTP handler bindings for the Flip host protocol
//
// This module provides thin wrapper functions that bind Rocket HTTP routes
// to the Bot's core logic methods. Handlers are responsible for:
// - Deserializing incoming JSON requests
// - Extracting Bot and DebugLogger instances from Rocket's managed state
// - Delegating to Bot methods
// - Serializing responses

use rocket::http::Status;
use rocket::serde::json::Json;
use serde_json::Value;

use flip_agent::bot::Bot;
use flip_agent::debug_logger::DebugLogger;
use flip_agent::types::{EndRequest, InitRequest, MovesRequest, MovesResponse};

/// GET / endpoint
/// Returns agent metadata
#[get("/")]
pub fn index(bot: &rocket::State<Bot>) -> Json<Value> {
    Json(bot.info())
}

/// POST /init endpoint
/// Called once per match before the first turn
#[post("/init", format = "json", data = "<init_req>")]
pub fn init(
    bot: &rocket::State<Bot>,
    logger: &rocket::State<DebugLogger>,
    init_req: Json<InitRequest>,
) -> Status {
    bot.init(&init_req);
    logger.log_init(init_req.into_inner());

    Status::Ok
}

/// POST /moves endpoint
/// Called each turn to compute and return the moves
#[post("/moves", format = "json", data = "<moves_req>")]
pub fn get_moves(
    bot: &rocket::State<Bot>,
    logger: &rocket::State<DebugLogger>,
    moves_req: Json<MovesRequest>,
) -> Result<Json<MovesResponse>, Status> {
    let response = bot.get_moves(&moves_req).ok_or(Status::NotFound)?;
    logger.log_turn(moves_req.into_inner(), response.clone());

    Ok(Json(response))
}

/// POST /end endpoint
/// Called when a match ends - drops the session
#[post("/end", format = "json", data = "<end_req>")]
pub fn end(bot: &rocket::State<Bot>, end_req: Json<EndRequest>) -> Status {
    if bot.end(&end_req) {
        Status::Ok
    } else {
        Status::NotFound
    }
}
