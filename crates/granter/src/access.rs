//! The authorization decision path.
//!
//! A request check is two steps: ask the granter for each role's effective
//! pattern list, then ask the matcher whether the requested permission is
//! covered. Role hierarchy is *not* resolved here — callers that want
//! inherited permissions flatten the hierarchy themselves before calling.

use rolegate_core::{Permission, Role};

use crate::granter::RoleGranter;

/// Does any of the given roles grant the required permission?
///
/// - No IO
/// - No panics
/// - Unknown roles simply grant nothing
pub fn is_granted(granter: &RoleGranter, roles: &[Role], required: &Permission) -> bool {
    roles.iter().any(|role| {
        let patterns = granter.permissions(role.as_str());
        rolegate_matcher::any(&patterns, required.as_str())
    })
}
