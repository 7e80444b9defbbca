//! Board domain: boards, their ordered columns and cards, and board
//! membership. The HTTP surface lives in `handlers`; the records and the
//! critical-section discipline live in the store module.

pub mod handlers;
