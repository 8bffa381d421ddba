//! `rolegate-granter` — persistable role-to-permission granting.
//!
//! The granter owns per-role permission lists, a role hierarchy and role
//! labels, merged from three layers:
//!
//! - **fixed**: hard-coded at construction, always present in reads;
//! - **defaults**: seed values used before (or instead of) loaded data;
//! - **loaded**: fetched asynchronously through an injected [`RoleStore`].
//!
//! Storage is entirely behind the [`RoleStore`] trait — the granter defines
//! no wire or file format beyond "a JSON-serializable [`RoleConfig`]"
//! (re-exported from `rolegate-core`).

pub mod access;
pub mod granter;
pub mod merge;
pub mod store;

pub use access::is_granted;
pub use granter::{GranterError, RoleGranter, RoleGranterBuilder};
pub use merge::MergeStrategy;
pub use rolegate_core::{ANONYMOUS_ROLE, Permission, Role, RoleConfig};
pub use store::{InMemoryRoleStore, RoleStore, StoreError};
