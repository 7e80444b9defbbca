//! Route Configuration Module
//!
//! This module configures all HTTP routes for the backend server.
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs          - Module exports
//! ├── router.rs       - Main router creation
//! └── api_routes.rs   - API route tables
//! ```

/// Main router creation
pub mod router;

/// API route tables
pub mod api_routes;

// Re-export commonly used functions
pub use router::create_router;
