//! Mapper resolution for a type pair
//!
//! Resolution looks at how many descriptors the registry holds for the pair:
//!
//! - **none**: the generic field-copy mapper, or nothing on the
//!   registered-only path
//! - **one**: that mapper, handed back directly
//! - **several**: every mapper that materializes, wrapped in a
//!   [`CompositeMapper`] in registration order
//!
//! A registered mapper that cannot be materialized is skipped, so a pair whose
//! mappers all fail to materialize behaves as if nothing were registered. The
//! configured [`FailurePolicy`] decides how loudly that happens.

use crate::mappers::{CompositeMapper, GenericMapper};
use crate::{
    BoxedMapper, FailurePolicy, FieldCopier, MapperDescriptor, MapperError, MapperRegistry,
    ServiceScope, TypePair,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Resolution counters shared by every clone of a resolver
#[derive(Debug, Default)]
pub struct ResolverStats {
    resolutions: AtomicU64,
    direct_hits: AtomicU64,
    composites: AtomicU64,
    fallbacks: AtomicU64,
    absent: AtomicU64,
    materialization_failures: AtomicU64,
}

/// Point-in-time copy of [`ResolverStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolverStatsSnapshot {
    pub resolutions: u64,
    pub direct_hits: u64,
    pub composites: u64,
    pub fallbacks: u64,
    pub absent: u64,
    pub materialization_failures: u64,
}

impl ResolverStats {
    pub fn snapshot(&self) -> ResolverStatsSnapshot {
        ResolverStatsSnapshot {
            resolutions: self.resolutions.load(Ordering::Relaxed),
            direct_hits: self.direct_hits.load(Ordering::Relaxed),
            composites: self.composites.load(Ordering::Relaxed),
            fallbacks: self.fallbacks.load(Ordering::Relaxed),
            absent: self.absent.load(Ordering::Relaxed),
            materialization_failures: self.materialization_failures.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MapperResolver {
    registry: Arc<MapperRegistry>,
    scope: ServiceScope,
    policy: FailurePolicy,
    copier: FieldCopier,
    stats: Arc<ResolverStats>,
}

impl MapperResolver {
    pub fn new(registry: Arc<MapperRegistry>) -> Self {
        Self {
            registry,
            scope: ServiceScope::default(),
            policy: FailurePolicy::default(),
            copier: FieldCopier::default(),
            stats: Arc::new(ResolverStats::default()),
        }
    }

    pub fn with_scope(mut self, scope: ServiceScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_copier(mut self, copier: FieldCopier) -> Self {
        self.copier = copier;
        self
    }

    pub fn registry(&self) -> &Arc<MapperRegistry> {
        &self.registry
    }

    pub fn scope(&self) -> &ServiceScope {
        &self.scope
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    pub fn copier(&self) -> FieldCopier {
        self.copier
    }

    pub fn stats(&self) -> &Arc<ResolverStats> {
        &self.stats
    }

    /// Mapper for `(F, T)`, falling back to the generic field copy
    pub async fn resolve<F, T>(&self) -> Result<BoxedMapper<F, T>, MapperError>
    where
        F: Serialize + Send + Sync + 'static,
        T: Serialize + DeserializeOwned + Send + Sync + 'static,
    {
        match self.resolve_core::<F, T>().await? {
            Some(mapper) => Ok(mapper),
            None => {
                self.stats.fallbacks.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(
                    pair = %TypePair::of::<F, T>(),
                    "No registered mapper, using generic field copy"
                );
                Ok(Box::new(GenericMapper::<F, T>::new(self.copier)))
            }
        }
    }

    /// Registered mapper for `(F, T)`, or `None`
    pub async fn resolve_registered_only<F, T>(
        &self,
    ) -> Result<Option<BoxedMapper<F, T>>, MapperError>
    where
        F: Send + Sync + 'static,
        T: Send + Sync + 'static,
    {
        let resolved = self.resolve_core::<F, T>().await?;
        if resolved.is_none() {
            self.stats.absent.fetch_add(1, Ordering::Relaxed);
        }
        Ok(resolved)
    }

    async fn resolve_core<F, T>(&self) -> Result<Option<BoxedMapper<F, T>>, MapperError>
    where
        F: Send + Sync + 'static,
        T: Send + Sync + 'static,
    {
        self.stats.resolutions.fetch_add(1, Ordering::Relaxed);
        self.registry.ensure_initialized().await;

        let pair = TypePair::of::<F, T>();
        let descriptors = self.registry.descriptors(&pair);

        match descriptors.as_slice() {
            [] => Ok(None),
            [single] => {
                let mapper = self.materialize::<F, T>(single, &pair)?;
                if mapper.is_some() {
                    self.stats.direct_hits.fetch_add(1, Ordering::Relaxed);
                    tracing::trace!(pair = %pair, mapper = single.name(), "Resolved single mapper");
                }
                Ok(mapper)
            }
            many => {
                let mut mappers = Vec::with_capacity(many.len());
                for descriptor in many {
                    if let Some(mapper) = self.materialize::<F, T>(descriptor, &pair)? {
                        mappers.push(mapper);
                    }
                }

                if mappers.is_empty() {
                    return Ok(None);
                }

                self.stats.composites.fetch_add(1, Ordering::Relaxed);
                tracing::trace!(
                    pair = %pair,
                    registered = many.len(),
                    materialized = mappers.len(),
                    "Resolved composite mapper"
                );
                Ok(Some(Box::new(CompositeMapper::new(mappers))))
            }
        }
    }

    fn materialize<F, T>(
        &self,
        descriptor: &MapperDescriptor,
        pair: &TypePair,
    ) -> Result<Option<BoxedMapper<F, T>>, MapperError>
    where
        F: Send + Sync + 'static,
        T: Send + Sync + 'static,
    {
        let e = match descriptor.materialize::<F, T>(&self.scope) {
            Ok(mapper) => return Ok(Some(mapper)),
            Err(e) => e,
        };

        self.stats
            .materialization_failures
            .fetch_add(1, Ordering::Relaxed);

        match self.policy {
            FailurePolicy::Ignore => {
                tracing::debug!(
                    mapper = descriptor.name(),
                    pair = %pair,
                    error = %e,
                    "Skipping mapper"
                );
                Ok(None)
            }
            FailurePolicy::Warn => {
                tracing::warn!(
                    mapper = descriptor.name(),
                    pair = %pair,
                    error = %e,
                    "Registered mapper could not be materialized, skipping"
                );
                Ok(None)
            }
            FailurePolicy::Error => Err(match e {
                MapperError::Materialization { .. } => e,
                other => MapperError::materialization(
                    descriptor.name(),
                    pair.to_string(),
                    other.to_string(),
                ),
            }),
        }
    }
}
