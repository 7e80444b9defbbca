//! HTTP middleware: bearer-token authentication and request correlation
//! ids. Request logging itself comes from `tower-http`'s trace layer,
//! wired in the router.

pub mod auth;
pub mod request_id;

pub use auth::{auth_middleware, AuthUser, AuthenticatedUser};
pub use request_id::{request_id_middleware, RequestId, REQUEST_ID_HEADER};
