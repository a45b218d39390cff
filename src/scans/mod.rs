//! Persisted scans, history listing and trend summaries.

mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;
mod services;
pub mod trend;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::scan_routes()
}
