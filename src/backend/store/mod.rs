/**
 * Entity Store
 *
 * Concurrency-guarded owner of all board, column, card, and membership
 * records. The store is sharded per board: each board's record set sits
 * behind one async mutex, and every operation that reads a sibling
 * snapshot and writes a key derived from it runs inside that single
 * critical section. Two concurrent inserts into the same sibling scope can
 * therefore never observe the same snapshot, which is what keeps sort keys
 * pairwise distinct.
 *
 * # Locking
 *
 * - Shard registry and the column→board index use brief std locks, never
 *   held across an await.
 * - A board shard's mutex spans snapshot → midpoint → write. Card scopes
 *   are column-level, but every column belongs to exactly one board and
 *   cross-board card moves are rejected, so the board lock covers every
 *   multi-scope operation without any lock-ordering protocol.
 *
 * # Failure discipline
 *
 * Normal outcomes (not found, bad anchor, stale version) are ordinary
 * error values. [`StoreError::Invariant`] marks programming-error states
 * (duplicate ids, index corruption); it is logged at error level and never
 * produced by well-formed requests. No operation applies partially: every
 * method either commits all of its writes or leaves the shard untouched.
 */

pub mod records;

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, RwLock};

use chrono::Utc;
use thiserror::Error;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::backend::rank;
use records::{
    BoardAccess, BoardRecord, CardRecord, ColumnRecord, InvitationRecord, MembershipRecord,
    MembershipStatus, Role,
};

/// Ways a store operation can fail.
///
/// Everything except `Invariant` is a normal, caller-visible outcome.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("board not found")]
    BoardNotFound,
    #[error("column not found")]
    ColumnNotFound,
    #[error("card not found")]
    CardNotFound,
    /// An insert-before/after anchor does not resolve to a sibling in the
    /// target scope. The operation has no side effects.
    #[error("anchor not found in target scope")]
    AnchorNotFound,
    /// Card move names a column that exists nowhere.
    #[error("target column not found")]
    TargetColumnNotFound,
    /// Card move names a column on a different board.
    #[error("card can be moved only within the same board")]
    CrossBoardMove,
    /// Optimistic concurrency check failed; the card is untouched.
    #[error("stale version: expected {expected}, current {current}")]
    StaleVersion { expected: u64, current: u64 },
    /// Broken store discipline (duplicate id, corrupt index). Fatal class.
    #[error("store invariant violated: {0}")]
    Invariant(String),
}

/// Everything belonging to one board, guarded as a unit.
struct BoardState {
    board: BoardRecord,
    columns: HashMap<Uuid, ColumnRecord>,
    cards: HashMap<Uuid, CardRecord>,
    memberships: HashMap<String, MembershipRecord>,
    invitations: HashMap<Uuid, InvitationRecord>,
}

struct BoardShard {
    state: Mutex<BoardState>,
}

/// A board plus the caller's relation to it, for listings.
#[derive(Debug, Clone)]
pub struct BoardSummary {
    pub board: BoardRecord,
    pub my_role: Role,
    pub members_count: usize,
}

/// Full board contents with siblings in display order.
#[derive(Debug, Clone)]
pub struct BoardView {
    pub board: BoardRecord,
    pub access: BoardAccess,
    pub members_count: usize,
    pub columns: Vec<ColumnRecord>,
    /// Cards of all columns, grouped in column order, ordered within each
    /// group.
    pub cards: Vec<CardRecord>,
}

/// Result of inviting someone onto a board.
#[derive(Debug, Clone)]
pub struct InviteOutcome {
    pub invitation: InvitationRecord,
    /// Present when the invite named a concrete user id.
    pub membership: Option<MembershipRecord>,
}

/// The shared in-memory entity store.
pub struct Store {
    shards: RwLock<HashMap<Uuid, Arc<BoardShard>>>,
    /// column id → owning board id. Lets a card move distinguish "no such
    /// column" from "column on another board" without touching a second
    /// shard's lock.
    column_index: StdMutex<HashMap<Uuid, Uuid>>,
}

impl Store {
    pub fn new() -> Self {
        Self {
            shards: RwLock::new(HashMap::new()),
            column_index: StdMutex::new(HashMap::new()),
        }
    }

    fn shard(&self, board_id: Uuid) -> Result<Arc<BoardShard>, StoreError> {
        self.shards
            .read()
            .expect("board registry poisoned")
            .get(&board_id)
            .cloned()
            .ok_or(StoreError::BoardNotFound)
    }

    /// Create a board owned by `owner`.
    pub async fn create_board(
        &self,
        owner: &str,
        name: String,
        description: Option<String>,
    ) -> Result<BoardRecord, StoreError> {
        let now = Utc::now();
        let board = BoardRecord {
            id: Uuid::new_v4(),
            name,
            description,
            owner: owner.to_string(),
            created_at: now,
            updated_at: now,
        };
        let shard = Arc::new(BoardShard {
            state: Mutex::new(BoardState {
                board: board.clone(),
                columns: HashMap::new(),
                cards: HashMap::new(),
                memberships: HashMap::new(),
                invitations: HashMap::new(),
            }),
        });
        let mut shards = self.shards.write().expect("board registry poisoned");
        if shards.insert(board.id, shard).is_some() {
            return Err(StoreError::Invariant(format!(
                "duplicate board id {}",
                board.id
            )));
        }
        Ok(board)
    }

    /// Boards `user` can see (as owner or member), oldest first.
    pub async fn list_boards(&self, user: &str) -> Vec<BoardSummary> {
        let shards: Vec<Arc<BoardShard>> = self
            .shards
            .read()
            .expect("board registry poisoned")
            .values()
            .cloned()
            .collect();

        let mut summaries = Vec::new();
        for shard in shards {
            let state = shard.state.lock().await;
            let access = state.access_of(user);
            if let Some(role) = access.role {
                summaries.push(BoardSummary {
                    board: state.board.clone(),
                    my_role: role,
                    members_count: state.members_count(),
                });
            }
        }
        summaries.sort_by(|a, b| {
            a.board
                .created_at
                .cmp(&b.board.created_at)
                .then(a.board.id.cmp(&b.board.id))
        });
        summaries
    }

    /// Resolve `user`'s standing on a board without exposing its contents.
    pub async fn access(&self, board_id: Uuid, user: &str) -> Result<BoardAccess, StoreError> {
        let shard = self.shard(board_id)?;
        let state = shard.state.lock().await;
        Ok(state.access_of(user))
    }

    /// A board with its columns and cards in display order. The caller is
    /// responsible for acting on `access` before revealing the contents.
    pub async fn board_view(&self, board_id: Uuid, user: &str) -> Result<BoardView, StoreError> {
        let shard = self.shard(board_id)?;
        let state = shard.state.lock().await;
        let columns = state.columns_sorted();
        let mut cards = Vec::new();
        for column in &columns {
            cards.extend(state.cards_sorted(column.id));
        }
        Ok(BoardView {
            board: state.board.clone(),
            access: state.access_of(user),
            members_count: state.members_count(),
            columns,
            cards,
        })
    }

    /// Insert a column, placed by the optional anchors. Snapshot, key
    /// computation, and insert share the board's critical section.
    pub async fn create_column(
        &self,
        board_id: Uuid,
        name: String,
        before: Option<Uuid>,
        after: Option<Uuid>,
    ) -> Result<ColumnRecord, StoreError> {
        let shard = self.shard(board_id)?;
        let mut state = shard.state.lock().await;

        let siblings = state.columns_sorted();
        let (left, right) = resolve_bounds(
            siblings.iter().map(|c| (c.id, c.sort_key.as_str())),
            before,
            after,
        )?;
        let sort_key = rank::midpoint(left.as_deref(), right.as_deref());

        let now = Utc::now();
        let column = ColumnRecord {
            id: Uuid::new_v4(),
            board_id,
            name,
            sort_key,
            created_at: now,
            updated_at: now,
        };
        if state.columns.contains_key(&column.id) {
            return Err(StoreError::Invariant(format!(
                "duplicate column id {}",
                column.id
            )));
        }
        state.columns.insert(column.id, column.clone());
        self.column_index
            .lock()
            .expect("column index poisoned")
            .insert(column.id, board_id);
        Ok(column)
    }

    /// Re-key an existing column to the position the anchors describe.
    pub async fn move_column(
        &self,
        board_id: Uuid,
        column_id: Uuid,
        before: Option<Uuid>,
        after: Option<Uuid>,
    ) -> Result<ColumnRecord, StoreError> {
        let shard = self.shard(board_id)?;
        let mut state = shard.state.lock().await;

        if !state.columns.contains_key(&column_id) {
            return Err(StoreError::ColumnNotFound);
        }
        // The snapshot includes the moving column itself; anchoring on it
        // is degenerate but harmless.
        let siblings = state.columns_sorted();
        let (left, right) = resolve_bounds(
            siblings.iter().map(|c| (c.id, c.sort_key.as_str())),
            before,
            after,
        )?;
        let sort_key = rank::midpoint(left.as_deref(), right.as_deref());

        let column = state
            .columns
            .get_mut(&column_id)
            .ok_or_else(|| StoreError::Invariant(format!("column {column_id} vanished")))?;
        column.sort_key = sort_key;
        column.updated_at = Utc::now();
        Ok(column.clone())
    }

    /// Insert a card into a column, placed by the optional anchors.
    pub async fn create_card(
        &self,
        board_id: Uuid,
        column_id: Uuid,
        title: String,
        description: Option<String>,
        before: Option<Uuid>,
        after: Option<Uuid>,
    ) -> Result<CardRecord, StoreError> {
        let shard = self.shard(board_id)?;
        let mut state = shard.state.lock().await;

        if !state.columns.contains_key(&column_id) {
            return Err(StoreError::ColumnNotFound);
        }
        let siblings = state.cards_sorted(column_id);
        let (left, right) = resolve_bounds(
            siblings.iter().map(|c| (c.id, c.sort_key.as_str())),
            before,
            after,
        )?;
        let sort_key = rank::midpoint(left.as_deref(), right.as_deref());

        let now = Utc::now();
        let card = CardRecord {
            id: Uuid::new_v4(),
            board_id,
            column_id,
            title,
            description,
            sort_key,
            version: 0,
            created_at: now,
            updated_at: now,
        };
        if state.cards.contains_key(&card.id) {
            return Err(StoreError::Invariant(format!(
                "duplicate card id {}",
                card.id
            )));
        }
        state.cards.insert(card.id, card.clone());
        Ok(card)
    }

    /// Move a card, optionally across columns of the same board, under the
    /// optimistic version check. Check, key computation, and mutation run
    /// in one critical section; a concurrent mover cannot interleave
    /// between them. Returns the card's new version.
    pub async fn move_card(
        &self,
        board_id: Uuid,
        card_id: Uuid,
        to_column: Option<Uuid>,
        before: Option<Uuid>,
        after: Option<Uuid>,
        expected_version: Option<u64>,
    ) -> Result<u64, StoreError> {
        let shard = self.shard(board_id)?;
        let mut state = shard.state.lock().await;

        let card = state.cards.get(&card_id).ok_or(StoreError::CardNotFound)?;
        if let Some(expected) = expected_version {
            if expected != card.version {
                return Err(StoreError::StaleVersion {
                    expected,
                    current: card.version,
                });
            }
        }

        let target_column = to_column.unwrap_or(card.column_id);
        if !state.columns.contains_key(&target_column) {
            let other_board = self
                .column_index
                .lock()
                .expect("column index poisoned")
                .contains_key(&target_column);
            return Err(if other_board {
                StoreError::CrossBoardMove
            } else {
                StoreError::TargetColumnNotFound
            });
        }

        let siblings = state.cards_sorted(target_column);
        let (left, right) = resolve_bounds(
            siblings.iter().map(|c| (c.id, c.sort_key.as_str())),
            before,
            after,
        )?;
        let sort_key = rank::midpoint(left.as_deref(), right.as_deref());

        let card = state
            .cards
            .get_mut(&card_id)
            .ok_or_else(|| StoreError::Invariant(format!("card {card_id} vanished")))?;
        card.column_id = target_column;
        card.sort_key = sort_key;
        card.version += 1;
        card.updated_at = Utc::now();
        Ok(card.version)
    }

    /// Record an invitation; when a user id is named, also record a
    /// pending membership with the invited role.
    pub async fn invite_member(
        &self,
        board_id: Uuid,
        inviter: &str,
        email: Option<String>,
        user_id: Option<String>,
        role: Role,
    ) -> Result<InviteOutcome, StoreError> {
        let shard = self.shard(board_id)?;
        let mut state = shard.state.lock().await;

        let now = Utc::now();
        let invitation = InvitationRecord {
            id: Uuid::new_v4(),
            board_id,
            email,
            role,
            status: MembershipStatus::Pending,
            token: Uuid::new_v4(),
        };
        state.invitations.insert(invitation.id, invitation.clone());
        let membership = user_id.map(|user_id| {
            let membership = MembershipRecord {
                board_id,
                user_id: user_id.clone(),
                role,
                status: MembershipStatus::Pending,
                invited_by: inviter.to_string(),
                created_at: now,
                updated_at: now,
            };
            state.memberships.insert(user_id, membership.clone());
            membership
        });
        Ok(InviteOutcome {
            invitation,
            membership,
        })
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardState {
    fn access_of(&self, user: &str) -> BoardAccess {
        if self.board.owner == user {
            return BoardAccess {
                role: Some(Role::Admin),
                is_owner: true,
            };
        }
        BoardAccess {
            role: self.memberships.get(user).map(|m| m.role),
            is_owner: false,
        }
    }

    fn members_count(&self) -> usize {
        // Owner plus explicit memberships.
        1 + self.memberships.len()
    }

    /// Columns of this board in display order: sort key, then creation
    /// time, then id. The tie-breaks only matter under artificially equal
    /// keys or coarse clocks and keep the order deterministic across
    /// calls.
    fn columns_sorted(&self) -> Vec<ColumnRecord> {
        let mut columns: Vec<ColumnRecord> = self.columns.values().cloned().collect();
        columns.sort_by(|a, b| {
            a.sort_key
                .cmp(&b.sort_key)
                .then(a.created_at.cmp(&b.created_at))
                .then(a.id.cmp(&b.id))
        });
        columns
    }

    /// Cards of one column in display order, same rule as columns.
    fn cards_sorted(&self, column_id: Uuid) -> Vec<CardRecord> {
        let mut cards: Vec<CardRecord> = self
            .cards
            .values()
            .filter(|c| c.column_id == column_id)
            .cloned()
            .collect();
        cards.sort_by(|a, b| {
            a.sort_key
                .cmp(&b.sort_key)
                .then(a.created_at.cmp(&b.created_at))
                .then(a.id.cmp(&b.id))
        });
        cards
    }
}

/// Turn insert-before/after anchors into midpoint bounds against a sorted
/// sibling snapshot. No anchors means append: the last sibling's key (if
/// any) on the left, nothing on the right. An anchor that is not currently
/// a sibling in the scope fails the whole operation.
fn resolve_bounds<'a>(
    siblings: impl Iterator<Item = (Uuid, &'a str)> + Clone,
    before: Option<Uuid>,
    after: Option<Uuid>,
) -> Result<(Option<String>, Option<String>), StoreError> {
    if before.is_none() && after.is_none() {
        let last = siblings.clone().last().map(|(_, key)| key.to_string());
        return Ok((last, None));
    }
    let key_of = |id: Uuid| {
        siblings
            .clone()
            .find(|&(sibling, _)| sibling == id)
            .map(|(_, key)| key.to_string())
    };
    let left = match after {
        Some(id) => Some(key_of(id).ok_or(StoreError::AnchorNotFound)?),
        None => None,
    };
    let right = match before {
        Some(id) => Some(key_of(id).ok_or(StoreError::AnchorNotFound)?),
        None => None,
    };
    Ok((left, right))
}
