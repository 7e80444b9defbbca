//! HTTP handlers for the board API.
//!
//! Handlers do transport work only: authentication comes in through the
//! [`AuthUser`](crate::backend::middleware::AuthUser) extractor, permission
//! checks run against the store's access resolution, input is validated,
//! and the actual mutation executes inside the idempotency wrapper. All
//! ordering and concurrency discipline lives in the store.

pub mod boards;
pub mod cards;
pub mod columns;
pub mod members;
pub mod types;

pub use boards::{create_board, get_board, list_boards};
pub use cards::{create_card, move_card};
pub use columns::{create_column, move_column};
pub use members::invite_member;

use uuid::Uuid;

use crate::backend::error::ApiError;

/// Trim and bound-check a client-supplied name-like field.
pub(crate) fn trimmed(value: &str, max_len: usize) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.len() > max_len {
        return None;
    }
    Some(trimmed.to_string())
}

/// Parse a `{id}:move` action segment. A segment without the suffix is an
/// unknown route; a suffix with a malformed id reads as an unknown entity.
pub(crate) fn parse_move_ref(segment: &str, entity: &'static str) -> Result<Uuid, ApiError> {
    let id = segment
        .strip_suffix(":move")
        .ok_or(ApiError::NotFound("Route"))?;
    Uuid::parse_str(id).map_err(|_| ApiError::NotFound(entity))
}
