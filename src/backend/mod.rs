//! Backend Module
//!
//! This module contains all server-side code for the corkboard service:
//! an Axum HTTP server exposing boards, ordered columns, and ordered
//! cards over a versioned JSON API.
//!
//! # Architecture
//!
//! The backend is organized into focused submodules:
//!
//! - **`server`** - Server initialization, application state, configuration
//! - **`routes`** - HTTP route configuration and router assembly
//! - **`boards`** - Board domain handlers and wire types
//! - **`store`** - In-memory entity store with per-board critical sections
//! - **`rank`** - Fractional ordering keys
//! - **`idempotency`** - Replayable-mutation cache
//! - **`middleware`** - Authentication and request-id middleware
//! - **`error`** - API error envelope
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports
//! ├── server/         - Server initialization and state
//! ├── routes/         - Route configuration
//! ├── boards/         - Board domain handlers
//! ├── store/          - Entity store
//! ├── rank.rs         - Ordering keys
//! ├── idempotency.rs  - Idempotency cache
//! ├── middleware/     - Request middleware
//! └── error/          - Error types
//! ```
//!
//! # Concurrency
//!
//! All mutable state sits behind the store's per-board locks and the
//! idempotency cache's per-token locks; handlers themselves hold no
//! state. `AppState` is a pair of `Arc`s and clones cheaply.

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Board domain: handlers and wire types
pub mod boards;

/// In-memory entity store
pub mod store;

/// Fractional ordering keys
pub mod rank;

/// Idempotency cache for replayable mutations
pub mod idempotency;

/// Middleware for request processing
pub mod middleware;

/// Backend error types
pub mod error;

/// Re-export commonly used types
pub use error::ApiError;
pub use server::create_app;
