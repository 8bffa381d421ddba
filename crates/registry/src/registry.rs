//! The permission catalog.

use std::collections::HashMap;

use rolegate_core::Permission;
use tracing::debug;

use crate::entry::{EntityOptions, PermissionDef, PermissionEntry, RegisterOptions};

/// In-memory catalog of every permission the system knows about.
///
/// Populated once during a single-threaded bootstrap phase (each module
/// registers its vocabulary), then queried read-only. Catalog output keeps
/// registration order so rendered permission lists are stable across runs.
///
/// No validation happens here: whatever keys and labels a module registers
/// are stored as-is.
#[derive(Debug, Default)]
pub struct PermissionRegistry {
    entries: HashMap<String, PermissionEntry>,
    /// Keys in registration order; drives all catalog output.
    order: Vec<String>,
}

impl PermissionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register ad-hoc permissions under a namespace.
    ///
    /// Keys are `{namespace}:{action}`, or `entity:{namespace}:{action}` when
    /// `options.is_entity` is set. Entries created here are marked `custom`.
    /// Registering an existing key overwrites the entry in place and keeps
    /// its catalog position.
    pub fn register<A, I>(&mut self, namespace: &str, defs: I, options: RegisterOptions)
    where
        A: Into<String>,
        I: IntoIterator<Item = (A, PermissionDef)>,
    {
        for (action, def) in defs {
            let action = action.into();
            let key = if options.is_entity {
                format!("entity:{namespace}:{action}")
            } else {
                format!("{namespace}:{action}")
            };
            let (label, description) = def.into_parts();
            self.insert(PermissionEntry {
                namespace: Permission::from(key.as_str()).namespace().to_string(),
                action,
                module: options.module.clone(),
                label,
                description,
                custom: true,
                key,
            });
        }
    }

    /// Register the standard CRUD permission set for an entity, with
    /// generated labels ("Read books", "Create books", ...).
    ///
    /// With `has_ownership`, `entity-own:{name}:{action}` variants are added
    /// for the ownership-scoped actions ("Read own books", ...).
    pub fn register_entity(&mut self, entity_name: &str, options: EntityOptions) {
        for action in &options.actions {
            self.insert(PermissionEntry {
                key: format!("entity:{entity_name}:{action}"),
                namespace: format!("entity:{entity_name}"),
                action: action.clone(),
                module: options.module.clone(),
                label: format!("{} {entity_name}", capitalize(action)),
                description: None,
                custom: false,
            });
        }

        if options.has_ownership {
            for action in options.effective_own_actions() {
                self.insert(PermissionEntry {
                    key: format!("entity-own:{entity_name}:{action}"),
                    namespace: format!("entity-own:{entity_name}"),
                    label: format!("{} own {entity_name}", capitalize(&action)),
                    action,
                    module: options.module.clone(),
                    description: None,
                    custom: false,
                });
            }
        }
    }

    /// Remove every entry whose key starts with `namespace + ":"`.
    ///
    /// This is a structural prefix operation on keys, not pattern matching.
    pub fn unregister(&mut self, namespace: &str) {
        let prefix = format!("{namespace}:");
        let removed: Vec<String> = self
            .order
            .iter()
            .filter(|key| key.starts_with(&prefix))
            .cloned()
            .collect();
        for key in &removed {
            self.entries.remove(key);
        }
        self.order.retain(|key| !key.starts_with(&prefix));
        debug!(namespace, removed = removed.len(), "unregistered permission namespace");
    }

    pub fn exists(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<PermissionEntry> {
        self.entries.get(key).cloned()
    }

    /// Every entry, in registration order.
    pub fn get_all(&self) -> Vec<PermissionEntry> {
        self.order
            .iter()
            .filter_map(|key| self.entries.get(key).cloned())
            .collect()
    }

    /// Every key, in registration order.
    pub fn keys(&self) -> Vec<String> {
        self.order.clone()
    }

    /// Entries grouped by namespace. Namespaces appear in first-registration
    /// order; entries keep registration order within their group.
    pub fn get_grouped(&self) -> Vec<(String, Vec<PermissionEntry>)> {
        let mut groups: Vec<(String, Vec<PermissionEntry>)> = Vec::new();
        for entry in self.get_all() {
            match groups.iter_mut().find(|(ns, _)| *ns == entry.namespace) {
                Some((_, list)) => list.push(entry),
                None => groups.push((entry.namespace.clone(), vec![entry])),
            }
        }
        groups
    }

    /// Entries whose namespace starts with `prefix`.
    pub fn get_by_namespace(&self, prefix: &str) -> Vec<PermissionEntry> {
        self.get_all()
            .into_iter()
            .filter(|e| e.namespace.starts_with(prefix))
            .collect()
    }

    /// Entries stamped with the given module.
    pub fn get_by_module(&self, module: &str) -> Vec<PermissionEntry> {
        self.get_all()
            .into_iter()
            .filter(|e| e.module.as_deref() == Some(module))
            .collect()
    }

    /// Entries whose namespace starts with `entity` (covers both `entity:`
    /// and `entity-own:`).
    pub fn entity_permissions(&self) -> Vec<PermissionEntry> {
        self.get_by_namespace("entity")
    }

    /// Everything that is not an entity permission.
    pub fn system_permissions(&self) -> Vec<PermissionEntry> {
        self.get_all()
            .into_iter()
            .filter(|e| !e.namespace.starts_with("entity"))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, entry: PermissionEntry) {
        debug!(key = %entry.key, custom = entry.custom, "registered permission");
        if self.entries.insert(entry.key.clone(), entry.clone()).is_none() {
            self.order.push(entry.key);
        }
    }
}

fn capitalize(action: &str) -> String {
    let mut chars = action.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
