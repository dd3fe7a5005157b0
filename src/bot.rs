// Game server logic behind the HTTP endpoints
//
// The Bot owns the configuration, the search engine, the session table and the
// move logger. Each public async method corresponds to one endpoint: it loads
// the caller's session, runs the pure session transition on the blocking pool
// (the AI search is CPU-bound), stores the result and returns the state view.

use log::{info, warn};
use serde_json::{json, Value};
use std::time::Instant;

use crate::config::Config;
use crate::debug_logger::DebugLogger;
use crate::error::SessionError;
use crate::search::Engine;
use crate::session::{
    GameSession, MoveRequest, ResetRequest, SelectPlayerRequest, SessionStore, SessionUpdate,
    StateView,
};

/// Tic-tac-toe server with OOP-style API
/// Takes static configuration dependencies and exposes methods corresponding to API endpoints
pub struct Bot {
    config: Config,
    engine: Engine,
    sessions: SessionStore,
    logger: DebugLogger,
}

impl Bot {
    /// Creates a new Bot instance with the given configuration
    ///
    /// # Arguments
    /// * `config` - Static configuration that does not change during the bot's lifetime
    /// * `logger` - Move logger, possibly disabled
    pub fn new(config: Config, logger: DebugLogger) -> Self {
        let num_cpus = rayon::current_num_threads();
        let strategy = config.search.root_strategy(num_cpus);
        info!("Selected strategy: {:?} (cpus={})", strategy, num_cpus);

        Bot {
            engine: Engine::new(strategy),
            sessions: SessionStore::new(config.session.max_sessions),
            config,
            logger,
        }
    }

    /// Name of the cookie carrying the session id
    pub fn cookie_name(&self) -> &str {
        &self.config.session.cookie_name
    }

    /// Returns server metadata
    /// Corresponds to GET / endpoint
    pub fn info(&self) -> Value {
        info!("INFO");

        json!({
            "name": env!("CARGO_PKG_NAME"),
            "author": env!("CARGO_PKG_AUTHORS"),
            "version": env!("CARGO_PKG_VERSION"),
        })
    }

    /// Current state of the caller's game
    /// Corresponds to GET /state endpoint
    pub fn state(&self, session_id: &str) -> StateView {
        self.sessions.load(session_id).view()
    }

    /// Corresponds to POST /select-player endpoint
    pub async fn select_player(
        &self,
        session_id: &str,
        request: SelectPlayerRequest,
    ) -> Result<StateView, SessionError> {
        self.run(session_id, "select-player", move |session, engine| {
            session.select_player(request.symbol(), engine)
        })
        .await
    }

    /// Corresponds to POST /move endpoint
    pub async fn make_move(
        &self,
        session_id: &str,
        request: MoveRequest,
    ) -> Result<StateView, SessionError> {
        self.run(session_id, "move", move |session, engine| {
            session.play_move(request.row, request.col, engine)
        })
        .await
    }

    /// Corresponds to POST /ai-move endpoint
    pub async fn ai_move(&self, session_id: &str) -> Result<StateView, SessionError> {
        self.run(session_id, "ai-move", |session, engine| session.ai_move(engine))
            .await
    }

    /// Corresponds to POST /reset endpoint
    pub async fn reset(
        &self,
        session_id: &str,
        request: ResetRequest,
    ) -> Result<StateView, SessionError> {
        self.run(session_id, "reset", move |session, engine| {
            session.reset(request.keep_player, engine)
        })
        .await
    }

    /// Loads the session, applies `transition` off the async workers, then stores the result
    async fn run<F>(
        &self,
        session_id: &str,
        endpoint: &str,
        transition: F,
    ) -> Result<StateView, SessionError>
    where
        F: FnOnce(GameSession, &Engine) -> Result<SessionUpdate, SessionError> + Send + 'static,
    {
        let start_time = Instant::now();
        let session = self.sessions.load(session_id);
        let engine = self.engine;

        let update = tokio::task::spawn_blocking(move || transition(session, &engine))
            .await
            .map_err(|e| SessionError::Internal(format!("search task failed: {}", e)))?;

        let update = match update {
            Ok(update) => update,
            Err(e) => {
                warn!("{} rejected for session {}: {}", endpoint, session_id, e);
                return Err(e);
            }
        };

        if let Some(ai) = update.ai_decision {
            info!(
                "Session {}: AI played {} as {} (value: {}, time: {}ms)",
                session_id,
                ai.decision.action,
                ai.board.player_to_move(),
                ai.decision.value,
                start_time.elapsed().as_millis()
            );
            self.logger.log_move(session_id, ai.board, ai.decision.action);
        }

        self.sessions.save(session_id, update.session);
        Ok(update.session.view())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_info_names_the_server() {
        let bot = Bot::new(Config::default_hardcoded(), DebugLogger::disabled());
        let info = bot.info();
        assert_eq!(info["name"], "minimax-tictactoe");
        assert_eq!(info["version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(info["author"], "minimax-tictactoe developers");
        assert!(info.get("apiversion").is_none());
    }
}
