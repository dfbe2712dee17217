//! DokiAnime server: HTTP API over saved anime site snapshots.

pub mod api;
pub mod cli;
pub mod config;
pub mod server;
pub mod state;

pub use api::create_router;
pub use config::{ConfigError, ConfigOverrides, ServerConfig};
pub use state::AppState;
