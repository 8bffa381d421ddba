//! `rolegate-registry` — in-memory catalog of known permissions.
//!
//! Modules register their permission vocabulary here during bootstrap; admin
//! tooling queries the catalog to render "what can be permissioned". The
//! registry never participates in authorization decisions — that is the
//! granter's and matcher's job.

pub mod entry;
pub mod registry;

pub use entry::{EntityOptions, PermissionDef, PermissionEntry, RegisterOptions};
pub use registry::PermissionRegistry;
