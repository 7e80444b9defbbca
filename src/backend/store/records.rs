/**
 * Store Records
 *
 * Plain in-memory records owned by the entity store. Records are addressed
 * by id and reference their parents (board, column) by id only; nothing
 * outside the store holds a live reference into it. HTTP-facing shapes live
 * with the handlers, not here.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A board: the root of one collaboration scope.
#[derive(Debug, Clone)]
pub struct BoardRecord {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// User id of the creator. The owner always acts as an admin.
    pub owner: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An ordered column on a board. Sibling scope: all columns of the board.
#[derive(Debug, Clone)]
pub struct ColumnRecord {
    pub id: Uuid,
    pub board_id: Uuid,
    pub name: String,
    /// Fractional ordering key; see the rank module.
    pub sort_key: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An ordered card in a column. Sibling scope: all cards of the column.
#[derive(Debug, Clone)]
pub struct CardRecord {
    pub id: Uuid,
    pub board_id: Uuid,
    pub column_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    /// Fractional ordering key; see the rank module.
    pub sort_key: String,
    /// Optimistic concurrency counter. Starts at 0, +1 per accepted move;
    /// nothing else touches it.
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// What a member may do on a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Writer,
    Reader,
}

impl Role {
    /// Readers may look but not mutate.
    pub fn can_write(self) -> bool {
        !matches!(self, Role::Reader)
    }
}

impl std::str::FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "writer" => Ok(Role::Writer),
            "reader" => Ok(Role::Reader),
            _ => Err(()),
        }
    }
}

/// Lifecycle of a membership or invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipStatus {
    Pending,
    Active,
}

/// A user's membership on a board.
#[derive(Debug, Clone)]
pub struct MembershipRecord {
    pub board_id: Uuid,
    pub user_id: String,
    pub role: Role,
    pub status: MembershipStatus,
    pub invited_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An outstanding invitation onto a board.
#[derive(Debug, Clone)]
pub struct InvitationRecord {
    pub id: Uuid,
    pub board_id: Uuid,
    pub email: Option<String>,
    pub role: Role,
    pub status: MembershipStatus,
    pub token: Uuid,
}

/// The caller's standing on a board, resolved inside the board's critical
/// section. The owner is an implicit admin without a membership record.
#[derive(Debug, Clone, Copy)]
pub struct BoardAccess {
    pub role: Option<Role>,
    pub is_owner: bool,
}

impl BoardAccess {
    pub fn is_member(self) -> bool {
        self.role.is_some()
    }

    pub fn can_write(self) -> bool {
        self.role.is_some_and(Role::can_write)
    }
}
