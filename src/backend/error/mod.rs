//! Error handling for the HTTP layer.
//!
//! One error type, [`ApiError`], covers everything a handler can surface:
//! auth failures, permission failures, not-found outcomes, validation
//! problems, move conflicts, stale optimistic versions, and the internal
//! invariant-violation class. Store errors convert via `From`, so handlers
//! mostly just use `?` or `map_err` into the envelope.

pub mod types;

pub use types::ApiError;
