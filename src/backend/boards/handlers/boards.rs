/**
 * Board Handlers
 *
 * Create, list, and fetch boards.
 *
 * # Endpoints
 *
 * - `POST /v1/boards` - create a board (idempotent via `Idempotency-Key`)
 * - `GET /v1/boards` - boards the caller owns or belongs to
 * - `GET /v1/boards/{id}` - full board view with ordered columns and cards
 */

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use uuid::Uuid;

use super::trimmed;
use super::types::{BoardListResponse, BoardResponse, BoardViewResponse, CreateBoardRequest};
use crate::backend::error::ApiError;
use crate::backend::idempotency::token_from_headers;
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;

/// Create a board owned by the caller.
///
/// The caller becomes the board's admin. Board names are 1..=140 chars
/// after trimming.
pub async fn create_board(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    headers: HeaderMap,
    Json(request): Json<CreateBoardRequest>,
) -> Response {
    let Some(name) = trimmed(&request.name, 140) else {
        return ApiError::validation("name must be 1..140", [("name", "required_non_empty")])
            .into_response();
    };

    let token = token_from_headers(&headers);
    let store = state.store.clone();
    state
        .idempotency
        .execute(token, move || async move {
            match store
                .create_board(&user.user_id, name, request.description)
                .await
            {
                Ok(board) => {
                    tracing::info!(board_id = %board.id, owner = %board.owner, "board created");
                    (StatusCode::CREATED, Json(BoardResponse::just_created(&board)))
                        .into_response()
                }
                Err(err) => ApiError::from(err).into_response(),
            }
        })
        .await
}

/// List boards the caller can see.
pub async fn list_boards(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Json<BoardListResponse> {
    let boards = state
        .store
        .list_boards(&user.user_id)
        .await
        .iter()
        .map(BoardResponse::from)
        .collect();
    Json(BoardListResponse {
        boards,
        next_cursor: None,
    })
}

/// Fetch one board with its columns and cards in display order.
pub async fn get_board(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(board_id): Path<Uuid>,
) -> Result<Json<BoardViewResponse>, ApiError> {
    let view = state.store.board_view(board_id, &user.user_id).await?;
    let Some(role) = view.access.role else {
        return Err(ApiError::Forbidden("Not a member"));
    };
    Ok(Json(BoardViewResponse::new(&view, role)))
}
