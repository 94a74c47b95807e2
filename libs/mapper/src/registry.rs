//! Registry of mapper descriptors keyed by type pair
//!
//! The table is populated from its discovery source at most once, on first
//! use, and may be extended by explicit registration at any time. Readers load
//! an immutable snapshot of the table; writers build a new table and swap it
//! in, so lookups never wait on a lock.

use crate::discovery::{InventoryDiscovery, MapperDiscovery, NoDiscovery};
use crate::{MapParameters, Mapper, MapperDescriptor, MapperError, ServiceScope, TypePair};
use arc_swap::ArcSwap;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::SystemTime;
use tokio::sync::OnceCell;

type Table = HashMap<TypePair, Vec<MapperDescriptor>>;

static GLOBAL_REGISTRY: Lazy<Arc<MapperRegistry>> =
    Lazy::new(|| Arc::new(MapperRegistry::with_discovery(InventoryDiscovery)));

/// Result of the one-time discovery run
#[derive(Debug, Clone, Copy)]
struct InitReport {
    discovered: usize,
    completed_at: SystemTime,
}

/// Metadata about the mapper registry
#[derive(Debug, Clone)]
pub struct RegistryMetadata {
    /// Name of the discovery source
    pub source: String,

    /// When discovery completed, if it has run
    pub initialized_at: Option<SystemTime>,

    /// Descriptors contributed by discovery
    pub discovered: usize,

    /// Descriptors added through explicit registration
    pub explicit_registrations: u64,

    /// Number of distinct type pairs
    pub pair_count: usize,

    /// Number of descriptors across all pairs
    pub descriptor_count: usize,

    /// Incremented on every table change
    pub version: u64,
}

/// Maps each type pair to its ordered list of mapper descriptors
pub struct MapperRegistry {
    table: ArcSwap<Table>,
    write_lock: Mutex<()>,
    discovery: Arc<dyn MapperDiscovery>,
    initialized: OnceCell<InitReport>,
    explicit_registrations: AtomicU64,
    version: AtomicU64,
}

impl MapperRegistry {
    /// Registry that relies on explicit registration only
    pub fn new() -> Self {
        Self::with_discovery(NoDiscovery)
    }

    /// Registry populated from `discovery` on first use
    pub fn with_discovery(discovery: impl MapperDiscovery + 'static) -> Self {
        Self::with_shared_discovery(Arc::new(discovery))
    }

    pub fn with_shared_discovery(discovery: Arc<dyn MapperDiscovery>) -> Self {
        Self {
            table: ArcSwap::from_pointee(HashMap::new()),
            write_lock: Mutex::new(()),
            discovery,
            initialized: OnceCell::new(),
            explicit_registrations: AtomicU64::new(0),
            version: AtomicU64::new(0),
        }
    }

    /// Process-wide registry backed by link-time discovery
    pub fn global() -> Arc<MapperRegistry> {
        GLOBAL_REGISTRY.clone()
    }

    /// Run discovery if it has not run yet
    ///
    /// Concurrent callers wait for the single discovery run; afterwards this is
    /// a lock-free check.
    pub async fn ensure_initialized(&self) {
        if self.initialized.initialized() {
            return;
        }

        self.initialized
            .get_or_init(|| async {
                let discovered = self.discovery.discover().await;
                let count = discovered.len();
                self.insert_all(discovered);

                tracing::info!(
                    source = self.discovery.name(),
                    discovered = count,
                    pairs = self.pair_count(),
                    descriptors = self.descriptor_count(),
                    "Mapper registry initialized"
                );

                InitReport {
                    discovered: count,
                    completed_at: SystemTime::now(),
                }
            })
            .await;
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.initialized()
    }

    /// Append a descriptor under its pair
    ///
    /// Registration is additive: existing descriptors for the pair stay in
    /// place and keep running before the new one. Registering the same
    /// descriptor twice makes it run twice.
    pub fn register(&self, descriptor: MapperDescriptor) {
        tracing::debug!(
            mapper = descriptor.name(),
            pair = %descriptor.pair(),
            "Registering mapper"
        );
        self.explicit_registrations.fetch_add(1, Ordering::Relaxed);
        self.insert_all(std::iter::once(descriptor));
    }

    pub fn register_all(&self, descriptors: impl IntoIterator<Item = MapperDescriptor>) {
        let descriptors: Vec<MapperDescriptor> = descriptors.into_iter().collect();
        if descriptors.is_empty() {
            return;
        }
        tracing::debug!(count = descriptors.len(), "Registering mappers");
        self.explicit_registrations
            .fetch_add(descriptors.len() as u64, Ordering::Relaxed);
        self.insert_all(descriptors);
    }

    /// Register a mapper built with `Default`
    pub fn register_mapper<F, T, M>(&self)
    where
        F: Send + Sync + 'static,
        T: Send + Sync + 'static,
        M: Mapper<F, T> + Default + 'static,
    {
        self.register(MapperDescriptor::of::<F, T, M>());
    }

    /// Register a mapper produced by a scope-aware factory
    pub fn register_factory<F, T, M, Fac>(&self, factory: Fac)
    where
        F: Send + Sync + 'static,
        T: Send + Sync + 'static,
        M: Mapper<F, T> + 'static,
        Fac: Fn(&ServiceScope) -> Result<M, MapperError> + Send + Sync + 'static,
    {
        self.register(MapperDescriptor::new::<F, T, M, Fac>(factory));
    }

    /// Register a synchronous closure mapper
    pub fn register_fn<F, T, Func>(&self, name: impl Into<Arc<str>>, func: Func)
    where
        F: Send + Sync + 'static,
        T: Send + Sync + 'static,
        Func: Fn(&F, &mut T, Option<&MapParameters>) -> Result<(), MapperError>
            + Send
            + Sync
            + 'static,
    {
        self.register(MapperDescriptor::from_fn::<F, T, Func>(name, func));
    }

    fn insert_all(&self, descriptors: impl IntoIterator<Item = MapperDescriptor>) {
        let _guard = self.write_lock.lock();
        let mut table = Table::clone(&self.table.load());
        for descriptor in descriptors {
            table.entry(descriptor.pair()).or_default().push(descriptor);
        }
        self.table.store(Arc::new(table));
        self.version.fetch_add(1, Ordering::Relaxed);
    }

    /// Descriptors for `pair` in registration order
    pub fn descriptors(&self, pair: &TypePair) -> Vec<MapperDescriptor> {
        self.table.load().get(pair).cloned().unwrap_or_default()
    }

    pub fn contains(&self, pair: &TypePair) -> bool {
        self.table.load().contains_key(pair)
    }

    pub fn pairs(&self) -> Vec<TypePair> {
        self.table.load().keys().copied().collect()
    }

    pub fn pair_count(&self) -> usize {
        self.table.load().len()
    }

    pub fn descriptor_count(&self) -> usize {
        self.table.load().values().map(Vec::len).sum()
    }

    pub fn metadata(&self) -> RegistryMetadata {
        let report = self.initialized.get();
        RegistryMetadata {
            source: self.discovery.name().to_string(),
            initialized_at: report.map(|r| r.completed_at),
            discovered: report.map(|r| r.discovered).unwrap_or(0),
            explicit_registrations: self.explicit_registrations.load(Ordering::Relaxed),
            pair_count: self.pair_count(),
            descriptor_count: self.descriptor_count(),
            version: self.version.load(Ordering::Relaxed),
        }
    }
}

impl Default for MapperRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MapperRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapperRegistry")
            .field("discovery", &self.discovery)
            .field("initialized", &self.is_initialized())
            .field("pairs", &self.pair_count())
            .field("descriptors", &self.descriptor_count())
            .finish()
    }
}
