//! HTTP surface: the index page, the processing endpoint and the directory
//! browser API.

pub mod directories;
pub mod pages;
pub mod process;

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::rename_engine::RenameEngine;

/// State shared by all handlers
#[derive(Debug, Clone)]
pub struct AppState {
    pub engine: Arc<RenameEngine>,
}

impl AppState {
    pub fn new(engine: RenameEngine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }
}

pub fn router(state: AppState, static_dir: &Path) -> Router {
    Router::new()
        .route("/", get(pages::index))
        .route("/api/process", post(process::process_files))
        .route("/api/directories", get(directories::list_directories))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
