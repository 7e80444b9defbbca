/**
 * Request/Response Types
 *
 * Wire shapes for the board API. Field names are camelCase on the wire;
 * timestamps serialize as RFC 3339 via chrono. These types shape store
 * records for transport and never leak back into the store.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::store::records::{
    BoardRecord, CardRecord, ColumnRecord, InvitationRecord, MembershipStatus, Role,
};
use crate::backend::store::{BoardSummary, BoardView};

// ---------------------------------------------------------------------------
// Requests

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBoardRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateColumnRequest {
    pub name: String,
    #[serde(default)]
    pub before_column_id: Option<Uuid>,
    #[serde(default)]
    pub after_column_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveColumnRequest {
    #[serde(default)]
    pub before_column_id: Option<Uuid>,
    #[serde(default)]
    pub after_column_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCardRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub before_card_id: Option<Uuid>,
    #[serde(default)]
    pub after_card_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveCardRequest {
    #[serde(default)]
    pub to_column_id: Option<Uuid>,
    #[serde(default)]
    pub before_card_id: Option<Uuid>,
    #[serde(default)]
    pub after_card_id: Option<Uuid>,
    #[serde(default)]
    pub expected_version: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteMemberRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    pub role: String,
}

// ---------------------------------------------------------------------------
// Responses

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub owner: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub my_role: Role,
    pub members_count: usize,
}

impl BoardResponse {
    pub fn new(board: &BoardRecord, my_role: Role, members_count: usize) -> Self {
        Self {
            id: board.id,
            name: board.name.clone(),
            description: board.description.clone(),
            owner: board.owner.clone(),
            created_at: board.created_at,
            updated_at: board.updated_at,
            my_role,
            members_count,
        }
    }

    /// Shape for a freshly created board: the creator is the sole member.
    pub fn just_created(board: &BoardRecord) -> Self {
        Self::new(board, Role::Admin, 1)
    }
}

impl From<&BoardSummary> for BoardResponse {
    fn from(summary: &BoardSummary) -> Self {
        Self::new(&summary.board, summary.my_role, summary.members_count)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardListResponse {
    pub boards: Vec<BoardResponse>,
    /// Always absent for now; the listing is not paginated.
    pub next_cursor: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnResponse {
    pub id: Uuid,
    pub board_id: Uuid,
    pub name: String,
    pub sort_key: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&ColumnRecord> for ColumnResponse {
    fn from(column: &ColumnRecord) -> Self {
        Self {
            id: column.id,
            board_id: column.board_id,
            name: column.name.clone(),
            sort_key: column.sort_key.clone(),
            created_at: column.created_at,
            updated_at: column.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardResponse {
    pub id: Uuid,
    pub board_id: Uuid,
    pub column_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub sort_key: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: u64,
}

impl From<&CardRecord> for CardResponse {
    fn from(card: &CardRecord) -> Self {
        Self {
            id: card.id,
            board_id: card.board_id,
            column_id: card.column_id,
            title: card.title.clone(),
            description: card.description.clone(),
            sort_key: card.sort_key.clone(),
            created_at: card.created_at,
            updated_at: card.updated_at,
            version: card.version,
        }
    }
}

/// Full board payload for `GET /v1/boards/{id}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardViewResponse {
    pub board: BoardResponse,
    pub columns: Vec<ColumnResponse>,
    pub cards: Vec<CardResponse>,
}

impl BoardViewResponse {
    pub fn new(view: &BoardView, my_role: Role) -> Self {
        Self {
            board: BoardResponse::new(&view.board, my_role, view.members_count),
            columns: view.columns.iter().map(ColumnResponse::from).collect(),
            cards: view.cards.iter().map(CardResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveColumnResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveCardResponse {
    pub status: &'static str,
    pub version: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationResponse {
    pub id: Uuid,
    pub board_id: Uuid,
    pub email: Option<String>,
    pub role: Role,
    pub status: MembershipStatus,
    pub token: Uuid,
}

impl From<&InvitationRecord> for InvitationResponse {
    fn from(invitation: &InvitationRecord) -> Self {
        Self {
            id: invitation.id,
            board_id: invitation.board_id,
            email: invitation.email.clone(),
            role: invitation.role,
            status: invitation.status,
            token: invitation.token,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipSummaryResponse {
    pub board_id: Uuid,
    pub role: Role,
    pub status: MembershipStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteMemberResponse {
    pub membership: MembershipSummaryResponse,
    pub invitation: InvitationResponse,
}
