//! Layered configuration merge.

use rolegate_core::RoleConfig;
use serde::{Deserialize, Serialize};

/// How freshly loaded configuration combines with the defaults layer.
///
/// The fixed layer is outside the strategy: fixed entries are unioned into
/// every read regardless of what the strategy produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MergeStrategy {
    /// Loaded data overrides defaults role-by-role: a role present in the
    /// loaded permissions replaces that role's default list wholesale (no
    /// permission-level union); default-only roles are retained. Hierarchy
    /// and labels merge key-by-key with loaded values winning.
    #[default]
    Extend,

    /// Loaded data replaces the defaults layer entirely; default-only roles
    /// vanish.
    Replace,

    /// Loaded data is ignored; the defaults layer is always used.
    DefaultsOnly,
}

/// Compute the effective layer from `defaults` and `loaded` under `strategy`.
pub(crate) fn merge(
    strategy: MergeStrategy,
    defaults: &RoleConfig,
    loaded: &RoleConfig,
) -> RoleConfig {
    match strategy {
        MergeStrategy::Extend => {
            let mut effective = defaults.clone();
            for (role, permissions) in &loaded.role_permissions {
                effective
                    .role_permissions
                    .insert(role.clone(), permissions.clone());
            }
            for (role, parents) in &loaded.role_hierarchy {
                effective.role_hierarchy.insert(role.clone(), parents.clone());
            }
            for (role, label) in &loaded.role_labels {
                effective.role_labels.insert(role.clone(), label.clone());
            }
            effective
        }
        MergeStrategy::Replace => loaded.clone(),
        MergeStrategy::DefaultsOnly => defaults.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> RoleConfig {
        RoleConfig::new()
            .with_permissions("ROLE_USER", ["default:read"])
            .with_permissions("ROLE_GUEST", ["default:peek"])
            .with_hierarchy("ROLE_ADMIN", ["ROLE_USER"])
            .with_label("ROLE_USER", "Default user")
    }

    fn loaded() -> RoleConfig {
        RoleConfig::new()
            .with_permissions("ROLE_USER", ["loaded:write"])
            .with_hierarchy("ROLE_MANAGER", ["ROLE_USER"])
            .with_label("ROLE_USER", "Loaded user")
    }

    #[test]
    fn extend_replaces_permissions_role_by_role() {
        let effective = merge(MergeStrategy::Extend, &defaults(), &loaded());

        // Loaded role replaces the default list outright (no union).
        assert_eq!(effective.role_permissions["ROLE_USER"], vec!["loaded:write"]);
        // Default-only roles survive.
        assert_eq!(effective.role_permissions["ROLE_GUEST"], vec!["default:peek"]);
    }

    #[test]
    fn extend_merges_hierarchy_and_labels_key_by_key() {
        let effective = merge(MergeStrategy::Extend, &defaults(), &loaded());

        assert_eq!(effective.role_hierarchy["ROLE_ADMIN"], vec!["ROLE_USER"]);
        assert_eq!(effective.role_hierarchy["ROLE_MANAGER"], vec!["ROLE_USER"]);
        // Loaded wins on conflicting keys.
        assert_eq!(effective.role_labels["ROLE_USER"], "Loaded user");
    }

    #[test]
    fn replace_discards_defaults_entirely() {
        let effective = merge(MergeStrategy::Replace, &defaults(), &loaded());

        assert!(!effective.role_permissions.contains_key("ROLE_GUEST"));
        assert!(!effective.role_hierarchy.contains_key("ROLE_ADMIN"));
        assert_eq!(effective, loaded());
    }

    #[test]
    fn defaults_only_ignores_loaded_data() {
        let effective = merge(MergeStrategy::DefaultsOnly, &defaults(), &loaded());
        assert_eq!(effective, defaults());
    }

    #[test]
    fn default_strategy_is_extend() {
        assert_eq!(MergeStrategy::default(), MergeStrategy::Extend);
    }
}
