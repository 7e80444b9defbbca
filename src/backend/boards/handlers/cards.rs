/**
 * Card Handlers
 *
 * Create cards inside a column and move them, within a column or across
 * columns of the same board. Card moves carry an optional expected
 * version for optimistic concurrency; a mismatch is rejected with 412
 * before anything changes.
 *
 * # Endpoints
 *
 * - `POST /v1/boards/{id}/columns/{columnId}/cards` - create a card
 * - `POST /v1/boards/{id}/cards/{cardId}:move` - re-anchor a card
 */

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use uuid::Uuid;

use super::types::{CardResponse, CreateCardRequest, MoveCardRequest, MoveCardResponse};
use super::{parse_move_ref, trimmed};
use crate::backend::error::ApiError;
use crate::backend::idempotency::token_from_headers;
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;

/// Create a card in a column, placed by optional before/after anchors.
pub async fn create_card(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path((board_id, column_id)): Path<(Uuid, Uuid)>,
    headers: HeaderMap,
    Json(request): Json<CreateCardRequest>,
) -> Response {
    let access = match state.store.access(board_id, &user.user_id).await {
        Ok(access) => access,
        Err(err) => return ApiError::from(err).into_response(),
    };
    if !access.can_write() {
        return ApiError::Forbidden("Insufficient permissions").into_response();
    }
    let Some(title) = trimmed(&request.title, 200) else {
        return ApiError::validation("title must be 1..200", [("title", "required_non_empty")])
            .into_response();
    };

    let token = token_from_headers(&headers);
    let store = state.store.clone();
    state
        .idempotency
        .execute(token, move || async move {
            match store
                .create_card(
                    board_id,
                    column_id,
                    title,
                    request.description,
                    request.before_card_id,
                    request.after_card_id,
                )
                .await
            {
                Ok(card) => {
                    tracing::info!(
                        card_id = %card.id,
                        column_id = %column_id,
                        sort_key = %card.sort_key,
                        "card created"
                    );
                    (StatusCode::CREATED, Json(CardResponse::from(&card))).into_response()
                }
                Err(err) => ApiError::from(err).into_response(),
            }
        })
        .await
}

/// Move a card. `toColumnId` may name another column of the same board;
/// anchors resolve against the destination column's cards.
pub async fn move_card(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path((board_id, card_ref)): Path<(Uuid, String)>,
    headers: HeaderMap,
    Json(request): Json<MoveCardRequest>,
) -> Response {
    let card_id = match parse_move_ref(&card_ref, "Card") {
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
                .move_card(
                    board_id,
                    card_id,
                    request.to_column_id,
                    request.before_card_id,
                    request.after_card_id,
                    request.expected_version,
                )
                .await
            {
                Ok(version) => {
                    tracing::info!(card_id = %card_id, version, "card moved");
                    Json(MoveCardResponse {
                        status: "ok",
                        version,
                    })
                    .into_response()
                }
                Err(err) => ApiError::from(err).into_response(),
            }
        })
        .await
}
