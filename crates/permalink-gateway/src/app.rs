use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    create_permalink_handler, get_permalink_handler, health_handler, reporter_handler,
};
use crate::state::AppState;

pub struct App {}

impl App {
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/", get(reporter_handler))
            .route("/health", get(health_handler))
            .route("/v1/permalinks", post(create_permalink_handler))
            .route("/v1/permalinks/{id}", get(get_permalink_handler))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }
}
