use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Permission identifier.
///
/// Permissions are modeled as opaque colon-delimited strings
/// (e.g. `entity:books:read`). Segment content is never interpreted here;
/// only the matcher splits keys apart. A key containing a `*` or `**`
/// segment is a *pattern* — something roles are granted — while concrete
/// keys are what callers request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    pub fn new(key: impl Into<Cow<'static, str>>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the key contains a wildcard segment (`*` or `**`).
    pub fn is_pattern(&self) -> bool {
        self.0.split(':').any(|seg| seg == "*" || seg == "**")
    }

    /// The key with its final segment removed (`entity:books` for
    /// `entity:books:read`). Keys without a `:` have an empty namespace.
    pub fn namespace(&self) -> &str {
        match self.0.rfind(':') {
            Some(idx) => &self.0[..idx],
            None => "",
        }
    }

    /// The final segment of the key (`read` for `entity:books:read`).
    pub fn action(&self) -> &str {
        match self.0.rfind(':') {
            Some(idx) => &self.0[idx + 1..],
            None => &self.0,
        }
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Permission {
    fn from(key: &str) -> Self {
        Self(Cow::Owned(key.to_string()))
    }
}

impl From<String> for Permission {
    fn from(key: String) -> Self {
        Self(Cow::Owned(key))
    }
}
