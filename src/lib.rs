//! News gateway: one HTTP entry point in front of the news source, the comment
//! store and the moderation service.

pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

pub use config::Config;
pub use error::{AppError, Result};
pub use routes::build_router;
pub use state::AppState;
