//! Corkboard - Main Library
//!
//! Corkboard is a collaborative kanban service: boards hold ordered
//! columns, columns hold ordered cards, and several people rearrange
//! them at once over a small JSON API.
//!
//! # Overview
//!
//! Three mechanisms carry the service:
//!
//! - **Fractional ordering keys** - every column and card carries a
//!   base-36 sort key; placing an item between two neighbors mints a
//!   key strictly between theirs, so a move touches one record
//! - **Idempotent mutations** - clients may send an `Idempotency-Key`
//!   header with any mutation; retries replay the first response
//!   byte-for-byte instead of re-running the operation
//! - **Optimistic card versions** - each card counts its accepted
//!   moves; a move carrying a stale `expectedVersion` is rejected with
//!   412 before anything changes
//!
//! # Module Structure
//!
//! - **`backend`** - the Axum server: routes, handlers, store, and the
//!   ordering/idempotency machinery
//!
//! # Usage
//!
//! ```rust,no_run
//! use corkboard::backend::server::{create_app, ServerConfig};
//!
//! # async fn example() {
//! let config = ServerConfig::from_env();
//! let app = create_app(&config);
//! // Use app with axum::serve
//! # }
//! ```

pub mod backend;
