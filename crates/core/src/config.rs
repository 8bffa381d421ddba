//! Role configuration snapshot.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A serializable role configuration: the unit the granter loads, merges and
/// persists.
///
/// The three maps are independently keyed — a role may have a hierarchy entry
/// but no explicit permissions, or a label only. Missing keys mean "nothing
/// configured", never "empty but present".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoleConfig {
    /// Role → granted permission patterns.
    #[serde(default)]
    pub role_permissions: HashMap<String, Vec<String>>,

    /// Role → roles it inherits from. Stored, never flattened here.
    #[serde(default)]
    pub role_hierarchy: HashMap<String, Vec<String>>,

    /// Role → display label.
    #[serde(default)]
    pub role_labels: HashMap<String, String>,
}

impl RoleConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no role appears in any of the three maps.
    pub fn is_empty(&self) -> bool {
        self.role_permissions.is_empty()
            && self.role_hierarchy.is_empty()
            && self.role_labels.is_empty()
    }

    pub fn with_permissions(
        mut self,
        role: impl Into<String>,
        permissions: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.role_permissions
            .insert(role.into(), permissions.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_hierarchy(
        mut self,
        role: impl Into<String>,
        parents: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.role_hierarchy
            .insert(role.into(), parents.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_label(mut self, role: impl Into<String>, label: impl Into<String>) -> Self {
        self.role_labels.insert(role.into(), label.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_fills_independent_maps() {
        let config = RoleConfig::new()
            .with_permissions("ROLE_USER", ["entity:books:read"])
            .with_hierarchy("ROLE_ADMIN", ["ROLE_USER"])
            .with_label("ROLE_USER", "User");

        assert_eq!(
            config.role_permissions["ROLE_USER"],
            vec!["entity:books:read".to_string()]
        );
        assert_eq!(config.role_hierarchy["ROLE_ADMIN"], vec!["ROLE_USER".to_string()]);
        assert_eq!(config.role_labels["ROLE_USER"], "User");
        // ROLE_ADMIN has a hierarchy entry but no permissions.
        assert!(!config.role_permissions.contains_key("ROLE_ADMIN"));
    }

    #[test]
    fn serde_round_trip_with_missing_maps() {
        let json = r#"{"role_permissions":{"ROLE_USER":["a:b"]}}"#;
        let config: RoleConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.role_permissions["ROLE_USER"], vec!["a:b".to_string()]);
        assert!(config.role_hierarchy.is_empty());
        assert!(config.role_labels.is_empty());

        let back = serde_json::to_string(&config).unwrap();
        let again: RoleConfig = serde_json::from_str(&back).unwrap();
        assert_eq!(again, config);
    }

    #[test]
    fn is_empty_requires_all_three_maps_empty() {
        assert!(RoleConfig::new().is_empty());
        assert!(!RoleConfig::new().with_label("ROLE_USER", "User").is_empty());
    }
}
