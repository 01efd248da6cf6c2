mod handlers;
mod middleware;

use std::sync::Arc;

use axum::{middleware::from_fn, routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::store::Catalog;

pub fn create_router(catalog: Arc<Catalog>) -> Router {
    let api = Router::new()
        // Models
        .route("/models", get(handlers::list_models))
        .route("/{model}/sectors", get(handlers::list_sectors))
        .route("/{model}/indicators", get(handlers::list_indicators))
        .route("/{model}/matrix/{name}", get(handlers::get_matrix))
        // Default model, consumed by the demand page
        .route("/sectors", get(handlers::default_sectors));

    Router::new()
        .route("/", get(handlers::demand_page))
        .nest("/api", api)
        .layer(from_fn(middleware::no_cache))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(catalog)
}
