//! Domain logic for the to-do list manager.
//!
//! Nothing in this crate touches the database or HTTP. The repository and
//! API layers depend on it for criteria building, pagination, form
//! validation, and the per-session browsing state machine.

pub mod browse;
pub mod criteria;
pub mod error;
pub mod pagination;
pub mod todo;
pub mod types;
pub mod validation;
