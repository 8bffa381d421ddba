//! `rolegate-core` — shared domain primitives for the authorization engine.
//!
//! This crate contains **pure domain** types (no storage, no async, no IO).

pub mod config;
pub mod permission;
pub mod role;

pub use config::RoleConfig;
pub use permission::Permission;
pub use role::{ANONYMOUS_ROLE, Role};
