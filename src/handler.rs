// HTTP handler bindings for the decision engine endpoints
//
// This module provides thin wrapper functions that bind Rocket HTTP routes
// to the Bot's methods. Handlers are responsible for:
// - Deserializing incoming JSON requests
// - Extracting Bot instance from Rocket's managed state
// - Delegating to Bot methods
// - Serializing responses

use log::warn;
use rocket::http::Status;
use rocket::serde::json::Json;
use serde_json::{json, Value};

use snake_arbiter::bot::Bot;
use snake_arbiter::types::{GameRequest, MoveRequest, OutcomeRequest};

/// GET / endpoint
/// Returns engine metadata and current weights
#[get("/")]
pub fn index(bot: &rocket::State<Bot>) -> Json<Value> {
    Json(bot.info())
}

/// POST /start endpoint
#[post("/start", format = "json", data = "<start_req>")]
pub fn start(bot: &rocket::State<Bot>, start_req: Json<GameRequest>) -> Status {
    bot.start(&start_req);

    Status::Ok
}

/// POST /move endpoint
/// Called each tick to compute and return the next move
#[post("/move", format = "json", data = "<move_req>")]
pub async fn get_move(
    bot: &rocket::State<Bot>,
    move_req: Json<MoveRequest>,
) -> Result<Json<Value>, (Status, Json<Value>)> {
    match bot.get_move(&move_req).await {
        Ok(decision) => Ok(Json(json!(decision))),
        Err(e) => {
            warn!("Rejected move request for turn {}: {}", move_req.turn, e);
            Err((Status::UnprocessableEntity, Json(json!({ "error": e }))))
        }
    }
}

/// POST /outcome endpoint
/// Called only for ticks that ate food or ended in a collision
#[post("/outcome", format = "json", data = "<outcome_req>")]
pub fn outcome(bot: &rocket::State<Bot>, outcome_req: Json<OutcomeRequest>) -> Status {
    bot.report_outcome(outcome_req.positive);

    Status::Ok
}

/// POST /end endpoint
#[post("/end", format = "json", data = "<end_req>")]
pub fn end(bot: &rocket::State<Bot>, end_req: Json<GameRequest>) -> Status {
    bot.end(&end_req);

    Status::Ok
}
