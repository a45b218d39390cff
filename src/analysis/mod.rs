//! Face detection, quality gate and skin scoring.

use crate::state::AppState;
use axum::Router;

pub mod detector;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod pipeline;
pub mod pixels;
pub mod quality;
mod report;
pub mod rustface_backend;
pub mod scorers;
pub mod scoring;
mod stats;

pub fn router() -> Router<AppState> {
    handlers::analyze_routes()
}
