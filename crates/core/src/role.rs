use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Role granted to unauthenticated callers.
///
/// This is a fixed naming convention, not configuration: callers that have no
/// session still carry this role so anonymous grants (e.g. `auth:login`) can
/// be expressed through the same permission lists as everything else.
pub const ANONYMOUS_ROLE: &str = "ROLE_ANONYMOUS";

/// Role identifier used for RBAC.
///
/// Roles are intentionally opaque strings at this layer; mapping roles to
/// permissions is the granter's job, and resolving the role hierarchy is the
/// caller's.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The fixed anonymous role.
    pub fn anonymous() -> Self {
        Self(Cow::Borrowed(ANONYMOUS_ROLE))
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Role {
    fn from(name: &str) -> Self {
        Self(Cow::Owned(name.to_string()))
    }
}

impl From<String> for Role {
    fn from(name: String) -> Self {
        Self(Cow::Owned(name))
    }
}
