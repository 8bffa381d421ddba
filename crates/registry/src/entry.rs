//! Catalog entry types and registration options.

use serde::Serialize;

/// A registered permission with its display metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionEntry {
    /// Full permission key, e.g. `entity:books:read`.
    pub key: String,
    /// Key with the final segment removed, e.g. `entity:books`.
    pub namespace: String,
    /// Final key segment, e.g. `read`.
    pub action: String,
    /// Owning module, when registered on behalf of one.
    pub module: Option<String>,
    /// Display label.
    pub label: String,
    /// Optional longer description.
    pub description: Option<String>,
    /// True for ad-hoc entries from [`register`](crate::PermissionRegistry::register),
    /// false for entries generated by
    /// [`register_entity`](crate::PermissionRegistry::register_entity).
    pub custom: bool,
}

/// Definition of a single permission being registered: either just a label,
/// or a label with a description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermissionDef {
    Label(String),
    Detailed { label: String, description: String },
}

impl PermissionDef {
    pub fn label(label: impl Into<String>) -> Self {
        Self::Label(label.into())
    }

    pub fn detailed(label: impl Into<String>, description: impl Into<String>) -> Self {
        Self::Detailed {
            label: label.into(),
            description: description.into(),
        }
    }

    pub(crate) fn into_parts(self) -> (String, Option<String>) {
        match self {
            Self::Label(label) => (label, None),
            Self::Detailed { label, description } => (label, Some(description)),
        }
    }
}

impl From<&str> for PermissionDef {
    fn from(label: &str) -> Self {
        Self::Label(label.to_string())
    }
}

impl From<String> for PermissionDef {
    fn from(label: String) -> Self {
        Self::Label(label)
    }
}

/// Options for [`register`](crate::PermissionRegistry::register).
#[derive(Debug, Clone, Default)]
pub struct RegisterOptions {
    /// Prefix keys with `entity:`.
    pub is_entity: bool,
    /// Module stamped on every created entry.
    pub module: Option<String>,
}

impl RegisterOptions {
    pub fn entity() -> Self {
        Self {
            is_entity: true,
            module: None,
        }
    }

    pub fn module(name: impl Into<String>) -> Self {
        Self {
            is_entity: false,
            module: Some(name.into()),
        }
    }
}

/// Options for [`register_entity`](crate::PermissionRegistry::register_entity).
#[derive(Debug, Clone)]
pub struct EntityOptions {
    /// Module stamped on every created entry.
    pub module: Option<String>,
    /// CRUD actions to register.
    pub actions: Vec<String>,
    /// Also register `entity-own:` variants for ownership-scoped checks.
    pub has_ownership: bool,
    /// Actions for the ownership variants; `None` means every action except
    /// `list` and `create` (listing and creating have no owned object yet).
    pub own_actions: Option<Vec<String>>,
}

impl Default for EntityOptions {
    fn default() -> Self {
        Self {
            module: None,
            actions: ["read", "list", "create", "update", "delete"]
                .map(String::from)
                .to_vec(),
            has_ownership: false,
            own_actions: None,
        }
    }
}

impl EntityOptions {
    pub fn with_ownership() -> Self {
        Self {
            has_ownership: true,
            ..Self::default()
        }
    }

    /// The effective ownership action list.
    pub(crate) fn effective_own_actions(&self) -> Vec<String> {
        match &self.own_actions {
            Some(actions) => actions.clone(),
            None => self
                .actions
                .iter()
                .filter(|a| a.as_str() != "list" && a.as_str() != "create")
                .cloned()
                .collect(),
        }
    }
}
