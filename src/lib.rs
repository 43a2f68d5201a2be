// Library root for the smart-vocab API

pub mod auth;
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;

// Re-export commonly used types
pub use config::Config;
pub use db::Database;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
pub use store::{MemoryStore, Store};
