use axum::{routing::get, Router};

use crate::handlers;
use crate::AppState;

/// Create browsing routes
pub fn browse_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // Directory listings
        .route("/", get(handlers::index))
        .route("/browse", get(handlers::index))
        .route("/browse/", get(handlers::index))
        .route("/browse/*path", get(handlers::browse))
        // File content
        .route("/images/*path", get(handlers::serve_image))
        .route("/view/*path", get(handlers::view_html))
}
