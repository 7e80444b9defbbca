/**
 * Router Configuration
 *
 * This module provides the main router creation function that combines
 * all route configurations into a single Axum router.
 *
 * # Route Order
 *
 * 1. API routes under `/v1` (health, version, boards)
 * 2. Static files for everything else, from the configured web root
 *
 * # Middleware
 *
 * The request-id middleware and the trace layer wrap the whole router;
 * authentication is a route layer applied only to the board routes, so
 * health and version probes stay open.
 */

use axum::middleware;
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::backend::middleware::request_id_middleware;
use crate::backend::routes::api_routes::{configure_api_routes, configure_open_routes};
use crate::backend::server::state::AppState;

/// Create the Axum router with all routes configured.
///
/// # Arguments
///
/// * `app_state` - Application state (store, idempotency cache)
/// * `web_root` - Directory served for non-API paths
pub fn create_router(app_state: AppState, web_root: &str) -> Router<()> {
    let api = configure_open_routes(Router::new());
    let api = configure_api_routes(api);

    Router::new()
        .nest("/v1", api)
        .fallback_service(ServeDir::new(web_root))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
