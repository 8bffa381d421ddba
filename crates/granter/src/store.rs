//! Role configuration storage abstraction.

use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use rolegate_core::RoleConfig;

/// Storage boundary for role configuration.
///
/// Implementations may read from anywhere (a key-value store, a remote
/// config service, a file). The granter places no timeout or cancellation
/// around these calls; wrap the implementation if you need one.
#[async_trait::async_trait]
pub trait RoleStore: Send + Sync {
    /// Fetch the stored configuration. `Ok(None)` means "nothing stored",
    /// which the granter treats the same as a load failure: fall back to
    /// defaults.
    async fn load(&self) -> Result<Option<RoleConfig>, StoreError>;

    /// Write the given snapshot. Errors propagate to the `persist()` caller.
    async fn persist(&self, config: &RoleConfig) -> Result<(), StoreError>;
}

/// Role store error.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("storage unavailable")]
    Unavailable,
}

/// In-memory role store for tests/dev.
///
/// Backs the configuration with a single JSON-serialized record, the way a
/// production implementation would use one record under one storage key.
/// Call counters and failure injection exist for exercising the granter's
/// degraded-load and dedup behavior.
#[derive(Debug, Default)]
pub struct InMemoryRoleStore {
    record: RwLock<Option<String>>,
    load_calls: AtomicUsize,
    persist_calls: AtomicUsize,
    fail_loads: AtomicBool,
    fail_persists: AtomicBool,
}

impl InMemoryRoleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-seeded with the given configuration.
    pub fn with_config(config: &RoleConfig) -> Self {
        let store = Self::new();
        store.seed(config);
        store
    }

    pub fn arc() -> std::sync::Arc<Self> {
        std::sync::Arc::new(Self::new())
    }

    /// Overwrite the stored record directly (bypasses counters).
    pub fn seed(&self, config: &RoleConfig) {
        let json = serde_json::to_string(config).expect("RoleConfig serializes");
        *self.record.write().unwrap() = Some(json);
    }

    /// Deserialize the current record, if any.
    pub fn stored(&self) -> Option<RoleConfig> {
        self.record
            .read()
            .unwrap()
            .as_deref()
            .and_then(|json| serde_json::from_str(json).ok())
    }

    pub fn load_calls(&self) -> usize {
        self.load_calls.load(Ordering::Relaxed)
    }

    pub fn persist_calls(&self) -> usize {
        self.persist_calls.load(Ordering::Relaxed)
    }

    pub fn fail_loads(&self, fail: bool) {
        self.fail_loads.store(fail, Ordering::Relaxed);
    }

    pub fn fail_persists(&self, fail: bool) {
        self.fail_persists.store(fail, Ordering::Relaxed);
    }
}

#[async_trait::async_trait]
impl RoleStore for InMemoryRoleStore {
    async fn load(&self) -> Result<Option<RoleConfig>, StoreError> {
        self.load_calls.fetch_add(1, Ordering::Relaxed);
        if self.fail_loads.load(Ordering::Relaxed) {
            return Err(StoreError::Unavailable);
        }
        match self.record.read().unwrap().as_deref() {
            Some(json) => Ok(Some(serde_json::from_str(json)?)),
            None => Ok(None),
        }
    }

    async fn persist(&self, config: &RoleConfig) -> Result<(), StoreError> {
        self.persist_calls.fetch_add(1, Ordering::Relaxed);
        if self.fail_persists.load(Ordering::Relaxed) {
            return Err(StoreError::Unavailable);
        }
        let json = serde_json::to_string(config)?;
        *self.record.write().unwrap() = Some(json);
        Ok(())
    }
}
