//! The persistable role granter.

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use rolegate_core::{ANONYMOUS_ROLE, RoleConfig};
use thiserror::Error;
use tracing::{debug, warn};

use crate::merge::{MergeStrategy, merge};
use crate::store::{RoleStore, StoreError};

/// Granter error.
#[derive(Debug, Error)]
pub enum GranterError {
    /// `persist()` was called on a granter built without a store.
    #[error("no role store configured")]
    NoStore,

    /// The store rejected the snapshot. The granter stays dirty, so
    /// retrying is meaningful.
    #[error("persist failed: {0}")]
    Persist(#[from] StoreError),
}

/// Builder for [`RoleGranter`].
#[derive(Default)]
pub struct RoleGranterBuilder {
    fixed: RoleConfig,
    defaults: RoleConfig,
    store: Option<Arc<dyn RoleStore>>,
    strategy: MergeStrategy,
    auto_load: bool,
}

impl RoleGranterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hard-coded configuration, always present in reads. Never persisted.
    pub fn fixed(mut self, config: RoleConfig) -> Self {
        self.fixed = config;
        self
    }

    /// Seed configuration used before a load completes and as the fallback
    /// when loading fails or finds nothing.
    pub fn defaults(mut self, config: RoleConfig) -> Self {
        self.defaults = config;
        self
    }

    pub fn store(self, store: impl RoleStore + 'static) -> Self {
        self.store_arc(Arc::new(store))
    }

    pub fn store_arc(mut self, store: Arc<dyn RoleStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn merge_strategy(mut self, strategy: MergeStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Let [`RoleGranter::ensure_ready`] trigger the initial load.
    pub fn auto_load(mut self, auto_load: bool) -> Self {
        self.auto_load = auto_load;
        self
    }

    pub fn build(self) -> RoleGranter {
        RoleGranter {
            live: RwLock::new(self.defaults.clone()),
            fixed: self.fixed,
            defaults: self.defaults,
            strategy: self.strategy,
            auto_load: self.auto_load,
            store: self.store,
            dirty: AtomicBool::new(false),
            loaded: AtomicBool::new(false),
            load_gate: tokio::sync::Mutex::new(()),
            load_generation: AtomicU64::new(0),
            persist_gate: tokio::sync::Mutex::new(()),
            persist_generation: AtomicU64::new(0),
        }
    }
}

/// Role-to-permission granting with layered configuration and persistence.
///
/// Reads always see the union of the live maps and the `fixed` layer; the
/// live maps never contain fixed-origin entries, so persisted snapshots stay
/// free of them and `fixed` is recomputed on every read.
///
/// Mutations are synchronous and atomic with respect to each other; the only
/// asynchronous operations are [`load`](Self::load) and
/// [`persist`](Self::persist), each of which runs at most one store call at a
/// time — concurrent callers coalesce onto the in-flight operation.
pub struct RoleGranter {
    fixed: RoleConfig,
    defaults: RoleConfig,
    strategy: MergeStrategy,
    auto_load: bool,
    store: Option<Arc<dyn RoleStore>>,

    /// Current configuration, excluding the fixed layer.
    live: RwLock<RoleConfig>,
    dirty: AtomicBool,
    loaded: AtomicBool,

    // One gate per async operation. The generation counter advances when an
    // operation completes; a caller that observed an older generation before
    // acquiring the gate waited behind an in-flight operation and must not
    // start another.
    load_gate: tokio::sync::Mutex<()>,
    load_generation: AtomicU64,
    persist_gate: tokio::sync::Mutex<()>,
    persist_generation: AtomicU64,
}

impl RoleGranter {
    pub fn builder() -> RoleGranterBuilder {
        RoleGranterBuilder::new()
    }

    /// Fetch configuration from the store and recompute the live maps.
    ///
    /// Never fails: a store error or empty store degrades to the defaults
    /// layer (fixed entries are unioned at read time either way) and still
    /// marks the granter loaded, so callers don't retry-loop on storage that
    /// may never recover. Concurrent calls share one store invocation.
    pub async fn load(&self) {
        let observed = self.load_generation.load(Ordering::Acquire);
        let _gate = self.load_gate.lock().await;
        if self.load_generation.load(Ordering::Acquire) != observed {
            // Coalesced: the load we waited behind already completed.
            return;
        }

        if let Some(store) = &self.store {
            match store.load().await {
                Ok(Some(loaded)) => {
                    *self.live.write().unwrap() = merge(self.strategy, &self.defaults, &loaded);
                    debug!(strategy = ?self.strategy, "role configuration loaded");
                }
                Ok(None) => {
                    *self.live.write().unwrap() = self.defaults.clone();
                    debug!("no stored role configuration; using defaults");
                }
                Err(err) => {
                    *self.live.write().unwrap() = self.defaults.clone();
                    warn!(error = %err, "role configuration load failed; using defaults");
                }
            }
        }

        self.loaded.store(true, Ordering::Release);
        self.load_generation.fetch_add(1, Ordering::Release);
    }

    /// Write the current live snapshot (fixed layer excluded) to the store.
    ///
    /// On success the granter becomes clean. On failure the error propagates
    /// and the granter stays dirty. A persist issued while another is
    /// pending awaits it; if that one wrote the current state, the second
    /// call returns without touching the store. When the awaited persist
    /// *failed*, the waiting call does not receive that error — the granter
    /// is still dirty, so it issues its own store call, a serialized retry.
    /// At most one store call is ever in flight.
    pub async fn persist(&self) -> Result<(), GranterError> {
        let store = self.store.as_ref().ok_or(GranterError::NoStore)?;

        let observed = self.persist_generation.load(Ordering::Acquire);
        let _gate = self.persist_gate.lock().await;
        if self.persist_generation.load(Ordering::Acquire) != observed && !self.is_dirty() {
            return Ok(());
        }

        let snapshot = self.live.read().unwrap().clone();
        let result = store.persist(&snapshot).await;
        self.persist_generation.fetch_add(1, Ordering::Release);
        match result {
            Ok(()) => {
                self.dirty.store(false, Ordering::Release);
                debug!("role configuration persisted");
                Ok(())
            }
            Err(err) => Err(GranterError::Persist(err)),
        }
    }

    /// Load once when auto-load is enabled, then hand back `self` for
    /// chaining.
    pub async fn ensure_ready(&self) -> &Self {
        if self.auto_load && !self.is_loaded() {
            self.load().await;
        }
        self
    }

    // ── Mutations (synchronous, mark dirty, chainable) ──

    /// Replace a role's permission list wholesale.
    pub fn set_role_permissions(
        &self,
        role: impl Into<String>,
        permissions: impl IntoIterator<Item = impl Into<String>>,
    ) -> &Self {
        self.live
            .write()
            .unwrap()
            .role_permissions
            .insert(role.into(), permissions.into_iter().map(Into::into).collect());
        self.mark_dirty()
    }

    /// Union permissions into a role's list, preserving existing order.
    pub fn add_role_permissions(
        &self,
        role: impl Into<String>,
        permissions: impl IntoIterator<Item = impl Into<String>>,
    ) -> &Self {
        let mut live = self.live.write().unwrap();
        let list = live.role_permissions.entry(role.into()).or_default();
        for permission in permissions {
            let permission = permission.into();
            if !list.contains(&permission) {
                list.push(permission);
            }
        }
        drop(live);
        self.mark_dirty()
    }

    /// Remove the given permissions from a role's list (set difference).
    pub fn remove_role_permissions(
        &self,
        role: &str,
        permissions: impl IntoIterator<Item = impl Into<String>>,
    ) -> &Self {
        let removing: Vec<String> = permissions.into_iter().map(Into::into).collect();
        if let Some(list) = self.live.write().unwrap().role_permissions.get_mut(role) {
            list.retain(|p| !removing.contains(p));
        }
        self.mark_dirty()
    }

    pub fn set_role_hierarchy(
        &self,
        role: impl Into<String>,
        parents: impl IntoIterator<Item = impl Into<String>>,
    ) -> &Self {
        self.live
            .write()
            .unwrap()
            .role_hierarchy
            .insert(role.into(), parents.into_iter().map(Into::into).collect());
        self.mark_dirty()
    }

    pub fn set_role_label(&self, role: impl Into<String>, label: impl Into<String>) -> &Self {
        self.live
            .write()
            .unwrap()
            .role_labels
            .insert(role.into(), label.into());
        self.mark_dirty()
    }

    /// Remove a role from all three maps. Fixed-layer entries for the role
    /// still appear in reads; fixed configuration cannot be deleted.
    pub fn delete_role(&self, role: &str) -> &Self {
        let mut live = self.live.write().unwrap();
        live.role_permissions.remove(role);
        live.role_hierarchy.remove(role);
        live.role_labels.remove(role);
        drop(live);
        self.mark_dirty()
    }

    /// Discard loads and mutations, restoring the defaults layer as the
    /// current state. Clears the dirty flag; the loaded flag is untouched
    /// (there is no transition back to unloaded).
    pub fn reset(&self) -> &Self {
        *self.live.write().unwrap() = self.defaults.clone();
        self.dirty.store(false, Ordering::Release);
        self
    }

    // ── Queries (effective state: live ∪ fixed, independent copies) ──

    /// A role's effective permission patterns. Unknown roles yield an empty
    /// list. Fixed-layer entries are always included, deduplicated against
    /// overlapping live entries.
    pub fn permissions(&self, role: &str) -> Vec<String> {
        let mut out = self
            .live
            .read()
            .unwrap()
            .role_permissions
            .get(role)
            .cloned()
            .unwrap_or_default();
        if let Some(fixed) = self.fixed.role_permissions.get(role) {
            for permission in fixed {
                if !out.contains(permission) {
                    out.push(permission.clone());
                }
            }
        }
        out
    }

    /// The effective role hierarchy. Fixed entries win on conflicting keys.
    pub fn hierarchy(&self) -> HashMap<String, Vec<String>> {
        let mut out = self.live.read().unwrap().role_hierarchy.clone();
        for (role, parents) in &self.fixed.role_hierarchy {
            out.insert(role.clone(), parents.clone());
        }
        out
    }

    /// The effective role labels. Fixed entries win on conflicting keys.
    pub fn labels(&self) -> HashMap<String, String> {
        let mut out = self.live.read().unwrap().role_labels.clone();
        for (role, label) in &self.fixed.role_labels {
            out.insert(role.clone(), label.clone());
        }
        out
    }

    /// Every role appearing in any map of either layer, sorted.
    pub fn roles(&self) -> Vec<String> {
        let live = self.live.read().unwrap();
        let mut set = BTreeSet::new();
        for config in [&*live, &self.fixed] {
            set.extend(config.role_permissions.keys().cloned());
            set.extend(config.role_hierarchy.keys().cloned());
            set.extend(config.role_labels.keys().cloned());
        }
        set.into_iter().collect()
    }

    /// The fixed anonymous-role convention string.
    pub fn anonymous_role(&self) -> &'static str {
        ANONYMOUS_ROLE
    }

    /// Serializable snapshot of the current effective state (fixed layer
    /// included). The persisted snapshot differs: `persist()` writes the
    /// live maps only.
    pub fn to_config(&self) -> RoleConfig {
        let mut config = self.live.read().unwrap().clone();
        for (role, fixed_permissions) in &self.fixed.role_permissions {
            let list = config.role_permissions.entry(role.clone()).or_default();
            for permission in fixed_permissions {
                if !list.contains(permission) {
                    list.push(permission.clone());
                }
            }
        }
        for (role, parents) in &self.fixed.role_hierarchy {
            config.role_hierarchy.insert(role.clone(), parents.clone());
        }
        for (role, label) in &self.fixed.role_labels {
            config.role_labels.insert(role.clone(), label.clone());
        }
        config
    }

    /// True after any unpersisted mutation.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }

    /// True once a load has settled (successfully or degraded).
    pub fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::Acquire)
    }

    fn mark_dirty(&self) -> &Self {
        self.dirty.store(true, Ordering::Release);
        self
    }
}
