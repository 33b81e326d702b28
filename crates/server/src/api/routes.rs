use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::{handlers, pipelines};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // Pipelines
        .route("/pipelines", post(pipelines::submit_pipeline))
        .route("/pipelines", get(pipelines::list_pipelines))
        .route("/pipelines/{id}", get(pipelines::get_pipeline))
        // Notifier processes
        .route("/notifiers", get(pipelines::list_notifiers))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/metrics", get(handlers::metrics))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
