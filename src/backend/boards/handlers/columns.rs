/**
 * Column Handlers
 *
 * Create and reorder columns on a board. Both writes require a writing
 * role (owner, admin, or writer) and run through the idempotency wrapper;
 * the fractional key assignment itself happens inside the store's
 * per-board critical section.
 *
 * # Endpoints
 *
 * - `POST /v1/boards/{id}/columns` - create a column
 * - `POST /v1/boards/{id}/columns/{columnId}:move` - re-anchor a column
 */

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use uuid::Uuid;

use super::types::{ColumnResponse, CreateColumnRequest, MoveColumnRequest, MoveColumnResponse};
use super::{parse_move_ref, trimmed};
use crate::backend::error::ApiError;
use crate::backend::idempotency::token_from_headers;
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;

/// Create a column, placed by optional before/after anchors (end of the
/// board when no anchor is given).
pub async fn create_column(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(board_id): Path<Uuid>,
    headers: HeaderMap,
    Json(request): Json<CreateColumnRequest>,
) -> Response {
    let access = match state.store.access(board_id, &user.user_id).await {
        Ok(access) => access,
        Err(err) => return ApiError::from(err).into_response(),
    };
    if !access.can_write() {
        return ApiError::Forbidden("Insufficient permissions").into_response();
    }
    let Some(name) = trimmed(&request.name, 80) else {
        return ApiError::validation("name must be 1..80", [("name", "required_non_empty")])
            .into_response();
    };

    let token = token_from_headers(&headers);
    let store = state.store.clone();
    state
        .idempotency
        .execute(token, move || async move {
            match store
                .create_column(
                    board_id,
                    name,
                    request.before_column_id,
                    request.after_column_id,
                )
                .await
            {
                Ok(column) => {
                    tracing::info!(
                        column_id = %column.id,
                        board_id = %board_id,
                        sort_key = %column.sort_key,
                        "column created"
                    );
                    (StatusCode::CREATED, Json(ColumnResponse::from(&column))).into_response()
                }
                Err(err) => ApiError::from(err).into_response(),
            }
        })
        .await
}

/// Move a column to the position the anchors describe.
pub async fn move_column(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path((board_id, column_ref)): Path<(Uuid, String)>,
    headers: HeaderMap,
    Json(request): Json<MoveColumnRequest>,
) -> Response {
    let column_id = match parse_move_ref(&column_ref, "Column") {
        Ok(id) => id,
        Err(err) => return err.into_response(),
    };
    let access = match state.store.access(board_id, &user.user_id).await {
        Ok(access) => access,
        Err(err) => return ApiError::from(err).into_response(),
    };
    if !access.can_write() {
        return ApiError::Forbidden("Insufficient permissions").into_response();
    }

    let token = token_from_headers(&headers);
    let store = state.store.clone();
    state
        .idempotency
        .execute(token, move || async move {
            match store
                .move_column(
                    board_id,
                    column_id,
                    request.before_column_id,
                    request.after_column_id,
                )
                .await
            {
                Ok(column) => {
                    tracing::info!(
                        column_id = %column_id,
                        board_id = %board_id,
                        sort_key = %column.sort_key,
                        "column moved"
                    );
                    Json(MoveColumnResponse { status: "ok" }).into_response()
                }
                Err(err) => ApiError::from(err).into_response(),
            }
        })
        .await
}
