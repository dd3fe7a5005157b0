#[macro_use]
extern crate rocket;

use log::info;
use rocket::fairing::AdHoc;
use rocket::{Build, Rocket};
use std::env;

use minimax_tictactoe::bot::Bot;
use minimax_tictactoe::config::Config;
use minimax_tictactoe::debug_logger::DebugLogger;

mod handler;

#[launch]
async fn rocket() -> _ {
    // Lots of web hosting services expect you to bind to the port specified by the `PORT`
    // environment variable. However, Rocket looks at the `ROCKET_PORT` environment variable.
    // If we find a value for `PORT`, we set `ROCKET_PORT` to that value.
    if let Ok(port) = env::var("PORT") {
        env::set_var("ROCKET_PORT", &port);
    }

    // We default to 'info' level logging. But if the `RUST_LOG` environment variable is set,
    // we keep that value instead.
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }

    env_logger::init();

    info!("Starting Tic-Tac-Toe Server...");

    // Load configuration once at startup
    let config = Config::load_or_default();
    let logger = DebugLogger::new(config.debug.enabled, &config.debug.log_file_path).await;
    build(Bot::new(config, logger))
}

/// Assembles the server around `bot`: routes, JSON error catchers and the Server header
fn build(bot: Bot) -> Rocket<Build> {
    rocket::build()
        .manage(bot)
        .attach(AdHoc::on_response("Server ID Middleware", |_, res| {
            Box::pin(async move {
                res.set_raw_header("Server", "minimax-tictactoe");
            })
        }))
        .mount(
            "/",
            routes![
                handler::index,
                handler::state,
                handler::select_player,
                handler::make_move,
                handler::ai_move,
                handler::reset
            ],
        )
        .register(
            "/",
            catchers![
                handler::bad_request,
                handler::not_found,
                handler::unprocessable
            ],
        )
}
