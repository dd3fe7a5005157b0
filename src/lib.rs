// Library exports for the tic-tac-toe engine and server
// This allows the replay tool and the integration tests to use the core logic

pub mod board;
pub mod bot;
pub mod config;
pub mod debug_logger;
pub mod error;
pub mod replay;
pub mod search;
pub mod session;
pub mod types;
