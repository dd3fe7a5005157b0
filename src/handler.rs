// HTTP handler bindings for the tic-tac-toe API endpoints
//
// This module provides thin wrapper functions that bind Rocket HTTP routes
// to the Bot's methods. Handlers are responsible for:
// - Resolving the session id from the session cookie (issuing one if absent)
// - Deserializing incoming JSON requests
// - Delegating to Bot methods
// - Serializing responses and mapping errors to status codes
//
// Catchers at the bottom keep failures that never reach a handler (unknown
// routes, unparseable bodies) in the same `{"error": message}` shape.

use rocket::http::{Cookie, CookieJar, Status};
use rocket::Request;
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use rocket::State;
use serde_json::{json, Value};

use minimax_tictactoe::bot::Bot;
use minimax_tictactoe::error::SessionError;
use minimax_tictactoe::session::{
    MoveRequest, ResetRequest, SelectPlayerRequest, SessionStore, StateView,
};

type ApiResult = Result<Json<StateView>, Custom<Json<Value>>>;

/// Session id from the cookie jar, issuing a new cookie on first contact
fn session_id(bot: &Bot, cookies: &CookieJar<'_>) -> String {
    if let Some(cookie) = cookies.get(bot.cookie_name()) {
        return cookie.value().to_string();
    }

    let id = SessionStore::new_id();
    cookies.add(Cookie::new(bot.cookie_name().to_string(), id.clone()));
    id
}

/// Maps a session failure to `{"error": message}` with the matching status
fn error_response(err: SessionError) -> Custom<Json<Value>> {
    let status = Status::from_code(err.status_code()).unwrap_or(Status::InternalServerError);
    Custom(status, Json(json!({ "error": err.to_string() })))
}

/// GET / endpoint
/// Returns server metadata
#[get("/")]
pub fn index(bot: &State<Bot>) -> Json<Value> {
    Json(bot.info())
}

/// GET /state endpoint
#[get("/state")]
pub fn state(bot: &State<Bot>, cookies: &CookieJar<'_>) -> Json<StateView> {
    let id = session_id(bot, cookies);
    Json(bot.state(&id))
}

/// POST /select-player endpoint
/// Starts a new game with the human on the requested mark
#[post("/select-player", data = "<select_req>")]
pub async fn select_player(
    bot: &State<Bot>,
    cookies: &CookieJar<'_>,
    select_req: Json<SelectPlayerRequest>,
) -> ApiResult {
    let id = session_id(bot, cookies);
    bot.select_player(&id, select_req.into_inner())
        .await
        .map(Json)
        .map_err(error_response)
}

/// POST /move endpoint
/// Applies the human move and the AI reply
#[post("/move", data = "<move_req>")]
pub async fn make_move(
    bot: &State<Bot>,
    cookies: &CookieJar<'_>,
    move_req: Json<MoveRequest>,
) -> ApiResult {
    let id = session_id(bot, cookies);
    bot.make_move(&id, move_req.into_inner())
        .await
        .map(Json)
        .map_err(error_response)
}

/// POST /ai-move endpoint
#[post("/ai-move")]
pub async fn ai_move(bot: &State<Bot>, cookies: &CookieJar<'_>) -> ApiResult {
    let id = session_id(bot, cookies);
    bot.ai_move(&id).await.map(Json).map_err(error_response)
}

/// POST /reset endpoint
/// The body is optional; without one the player selection is cleared
#[post("/reset", data = "<reset_req>")]
pub async fn reset(
    bot: &State<Bot>,
    cookies: &CookieJar<'_>,
    reset_req: Option<Json<ResetRequest>>,
) -> ApiResult {
    let id = session_id(bot, cookies);
    let request = reset_req.map(|r| r.into_inner()).unwrap_or_default();
    bot.reset(&id, request)
        .await
        .map(Json)
        .map_err(error_response)
}

/// Body is not valid JSON
#[catch(400)]
pub fn bad_request(_req: &Request<'_>) -> Json<Value> {
    Json(json!({ "error": "Malformed JSON body" }))
}

#[catch(404)]
pub fn not_found(req: &Request<'_>) -> Json<Value> {
    Json(json!({ "error": format!("No route for {} {}", req.method(), req.uri()) }))
}

/// Body is JSON but does not fit the request type (e.g. a non-integer row)
#[catch(422)]
pub fn unprocessable(_req: &Request<'_>) -> Json<Value> {
    Json(json!({ "error": "Invalid request body" }))
}
