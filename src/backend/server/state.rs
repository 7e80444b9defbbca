/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * `AppState` is the central state container:
 * - the entity store (boards, columns, cards, memberships)
 * - the idempotency cache for replayable mutations
 *
 * # Thread Safety
 *
 * Both fields are `Arc`-shared and internally synchronized: the store
 * locks per board, the cache locks per token. `AppState` itself is a
 * cheap clone.
 */

use std::sync::Arc;

use axum::extract::FromRef;

use crate::backend::idempotency::IdempotencyCache;
use crate::backend::store::Store;

/// Application state shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The in-memory entity store.
    pub store: Arc<Store>,

    /// Response cache keyed by `Idempotency-Key` tokens.
    pub idempotency: Arc<IdempotencyCache>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            store: Arc::new(Store::new()),
            idempotency: Arc::new(IdempotencyCache::new()),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Allows handlers to take `State(store): State<Arc<Store>>` when they
/// never touch the cache.
impl FromRef<AppState> for Arc<Store> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.store.clone()
    }
}

impl FromRef<AppState> for Arc<IdempotencyCache> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.idempotency.clone()
    }
}
