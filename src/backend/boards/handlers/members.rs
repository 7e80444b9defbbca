/**
 * Membership Handlers
 *
 * Invite people onto a board. Only the board owner may invite. An invite
 * names either a known user id (a pending membership is recorded right
 * away) or an email address (only the invitation is recorded).
 */

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use uuid::Uuid;

use super::types::{
    InvitationResponse, InviteMemberRequest, InviteMemberResponse, MembershipSummaryResponse,
};
use crate::backend::error::ApiError;
use crate::backend::idempotency::token_from_headers;
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;
use crate::backend::store::records::{MembershipStatus, Role};

/// Invite a member by user id or email. Owner only.
pub async fn invite_member(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(board_id): Path<Uuid>,
    headers: HeaderMap,
    Json(request): Json<InviteMemberRequest>,
) -> Response {
    let access = match state.store.access(board_id, &user.user_id).await {
        Ok(access) => access,
        Err(err) => return ApiError::from(err).into_response(),
    };
    if !access.is_owner {
        return ApiError::Forbidden("Only owner/admin may invite").into_response();
    }

    let Ok(role) = request.role.parse::<Role>() else {
        return ApiError::validation("Invalid role", [("role", "invalid")]).into_response();
    };
    let email = request
        .email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(str::to_string);
    let user_id = request
        .user_id
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .map(str::to_string);
    if email.is_none() && user_id.is_none() {
        return ApiError::validation("email or userId required", [("target", "required")])
            .into_response();
    }

    let token = token_from_headers(&headers);
    let store = state.store.clone();
    let inviter = user.user_id.clone();
    state
        .idempotency
        .execute(token, move || async move {
            match store
                .invite_member(board_id, &inviter, email, user_id, role)
                .await
            {
                Ok(outcome) => {
                    tracing::info!(
                        board_id = %board_id,
                        role = ?role,
                        direct = outcome.membership.is_some(),
                        "member invited"
                    );
                    let membership = match &outcome.membership {
                        Some(m) => MembershipSummaryResponse {
                            board_id: m.board_id,
                            role: m.role,
                            status: m.status,
                        },
                        // Email-only invite: nobody is on the board yet.
                        None => MembershipSummaryResponse {
                            board_id,
                            role,
                            status: MembershipStatus::Pending,
                        },
                    };
                    let response = InviteMemberResponse {
                        membership,
                        invitation: InvitationResponse::from(&outcome.invitation),
                    };
                    (StatusCode::CREATED, Json(response)).into_response()
                }
                Err(err) => ApiError::from(err).into_response(),
            }
        })
        .await
}
