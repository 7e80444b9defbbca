/**
 * Server Initialization
 *
 * This module builds the Axum application: state creation and route
 * configuration. Everything lives in memory, so there is no persistence
 * layer to restore from.
 *
 * # Initialization Process
 *
 * 1. Create the shared entity store and idempotency cache
 * 2. Assemble the router with middleware and static file serving
 */

use axum::Router;

use crate::backend::routes::router::create_router;
use crate::backend::server::config::ServerConfig;
use crate::backend::server::state::AppState;

/// Create and configure the Axum application.
///
/// # Returns
///
/// Configured Axum Router ready to serve requests.
pub fn create_app(config: &ServerConfig) -> Router<()> {
    tracing::info!("Initializing corkboard server");

    let app_state = AppState::new();
    let app = create_router(app_state, &config.web_root);

    tracing::info!(web_root = %config.web_root, "Router configured");

    app
}
