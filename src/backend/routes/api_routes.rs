/**
 * API Route Handlers
 *
 * Route tables for the `/v1` API plus the two unauthenticated probe
 * endpoints.
 *
 * # Routes
 *
 * ## Probes (no authentication)
 * - `GET /v1/health` - liveness probe
 * - `GET /v1/version` - build version
 *
 * ## Boards (bearer authentication)
 * - `POST /v1/boards` - create a board
 * - `GET /v1/boards` - list visible boards
 * - `GET /v1/boards/{boardId}` - full board view
 * - `POST /v1/boards/{boardId}/members` - invite a member
 * - `POST /v1/boards/{boardId}/columns` - create a column
 * - `POST /v1/boards/{boardId}/columns/{columnId}:move` - move a column
 * - `POST /v1/boards/{boardId}/columns/{columnId}/cards` - create a card
 * - `POST /v1/boards/{boardId}/cards/{cardId}:move` - move a card
 *
 * The `:move` suffix rides inside the final path parameter; the handlers
 * split it off themselves since the router matches whole segments.
 */

use axum::middleware;
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use serde_json::{json, Value};

use crate::backend::boards::handlers::{
    create_board, create_card, create_column, get_board, invite_member, list_boards, move_card,
    move_column,
};
use crate::backend::middleware::auth_middleware;
use crate::backend::server::state::AppState;

/// Liveness probe.
async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Build version, from the crate manifest.
async fn version() -> Json<Value> {
    Json(json!({ "version": env!("CARGO_PKG_VERSION") }))
}

/// Configure the unauthenticated probe routes.
pub fn configure_open_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/health", get(health))
        .route("/version", get(version))
}

/// Configure the authenticated board routes.
///
/// The auth middleware is a route layer, so it runs only for the routes
/// added here and a 404 never turns into a 401.
pub fn configure_api_routes(router: Router<AppState>) -> Router<AppState> {
    let boards = Router::new()
        .route("/boards", post(create_board).get(list_boards))
        .route("/boards/{board_id}", get(get_board))
        .route("/boards/{board_id}/members", post(invite_member))
        .route("/boards/{board_id}/columns", post(create_column))
        .route("/boards/{board_id}/columns/{column_ref}", post(move_column))
        .route(
            "/boards/{board_id}/columns/{column_id}/cards",
            post(create_card),
        )
        .route("/boards/{board_id}/cards/{card_ref}", post(move_card))
        .route_layer(middleware::from_fn(auth_middleware));

    router.merge(boards)
}
