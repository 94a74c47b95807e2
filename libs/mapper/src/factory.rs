//! MapperFactory: the public mapping entry points
//!
//! The factory resolves a mapper for each call and runs it. Every entry point
//! checks its arguments before any resolution happens, so an absent argument
//! never touches the registry.

use crate::{
    BoxedMapper, MapParameters, Mapper, MapperConfig, MapperError, MapperRegistry, MapperResolver,
    ResolverStatsSnapshot, ServiceScope,
};
use futures::{Stream, StreamExt};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// Maps values between types through the mappers of a registry
///
/// [`map`](Self::map), [`map_into`](Self::map_into), [`map_list`](Self::map_list)
/// and [`map_stream`](Self::map_stream) can fall back to the generic field
/// copy, so they need `F: Serialize` and `T: Serialize + DeserializeOwned`
/// even when the pair has a registered mapper. Types without serde support go
/// through [`map_with_registered_mapper`](Self::map_with_registered_mapper),
/// which has no such bounds.
#[derive(Debug, Clone)]
pub struct MapperFactory {
    resolver: MapperResolver,

    /// Factory name for debugging
    name: String,
}

impl MapperFactory {
    /// Create a factory over `registry` with default settings
    pub fn new(registry: Arc<MapperRegistry>) -> Self {
        Self {
            resolver: MapperResolver::new(registry),
            name: "mapper-factory".to_string(),
        }
    }

    /// Create a factory configured from `config`
    pub fn with_config(
        registry: Arc<MapperRegistry>,
        scope: ServiceScope,
        config: &MapperConfig,
    ) -> Self {
        let resolver = MapperResolver::new(registry)
            .with_scope(scope)
            .with_policy(config.materialization_failure)
            .with_copier(config.field_copy.copier());

        Self {
            resolver,
            name: config.name.clone(),
        }
    }

    /// Factory over the process-wide registry
    pub fn global() -> Self {
        Self::new(MapperRegistry::global())
    }

    /// Factory sharing this one's registry and counters but resolving against
    /// `scope`
    pub fn with_scope(&self, scope: ServiceScope) -> Self {
        Self {
            resolver: self.resolver.clone().with_scope(scope),
            name: self.name.clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn registry(&self) -> &Arc<MapperRegistry> {
        self.resolver.registry()
    }

    pub fn resolver(&self) -> &MapperResolver {
        &self.resolver
    }

    pub fn stats(&self) -> ResolverStatsSnapshot {
        self.resolver.stats().snapshot()
    }

    /// Map `from` into a new `T`
    ///
    /// Uses the registered mapper(s) for the pair, or the generic field copy
    /// when none is registered. Errors raised by a mapper are returned as-is.
    pub async fn map<'f, F, T>(
        &self,
        from: impl Into<Option<&'f F>>,
        parameters: Option<&MapParameters>,
    ) -> Result<T, MapperError>
    where
        F: Serialize + Send + Sync + 'static,
        T: Serialize + DeserializeOwned + Default + Send + Sync + 'static,
    {
        let from = from.into().ok_or(MapperError::null_argument("from"))?;

        let mut to = T::default();
        let mapper = self.resolver.resolve::<F, T>().await?;
        self.run(&*mapper, from, &mut to, parameters).await?;
        Ok(to)
    }

    /// Map `from` into an existing `to`
    ///
    /// When the generic field copy handles the pair, `to` is rebuilt through
    /// serde, so its `#[serde(skip)]` fields are reset to their defaults once
    /// any field is copied.
    pub async fn map_into<'f, 't, F, T>(
        &self,
        from: impl Into<Option<&'f F>>,
        to: impl Into<Option<&'t mut T>>,
        parameters: Option<&MapParameters>,
    ) -> Result<(), MapperError>
    where
        F: Serialize + Send + Sync + 'static,
        T: Serialize + DeserializeOwned + Send + Sync + 'static,
    {
        let from = from.into().ok_or(MapperError::null_argument("from"))?;
        let to = to.into().ok_or(MapperError::null_argument("to"))?;

        let mapper = self.resolver.resolve::<F, T>().await?;
        self.run(&*mapper, from, to, parameters).await
    }

    /// Map with registered mappers only
    ///
    /// When nothing registered for the pair can be materialized this succeeds
    /// without touching `to`.
    pub async fn map_with_registered_mapper<'f, 't, F, T>(
        &self,
        from: impl Into<Option<&'f F>>,
        to: impl Into<Option<&'t mut T>>,
        parameters: Option<&MapParameters>,
    ) -> Result<(), MapperError>
    where
        F: Send + Sync + 'static,
        T: Send + Sync + 'static,
    {
        let from = from.into().ok_or(MapperError::null_argument("from"))?;
        let to = to.into().ok_or(MapperError::null_argument("to"))?;

        match self.resolver.resolve_registered_only::<F, T>().await? {
            Some(mapper) => self.run(&*mapper, from, to, parameters).await,
            None => {
                tracing::debug!(
                    factory = %self.name,
                    from = std::any::type_name::<F>(),
                    to = std::any::type_name::<T>(),
                    "No registered mapper, target left unchanged"
                );
                Ok(())
            }
        }
    }

    /// Map every element of `from` into a new `T`, preserving order
    ///
    /// The input is collected before resolution. One mapper instance serves the
    /// whole list, so mappers holding per-instance state see every element.
    /// The first failing element aborts the call.
    pub async fn map_list<'f, F, T, I>(
        &self,
        from: I,
        parameters: Option<&MapParameters>,
    ) -> Result<Vec<T>, MapperError>
    where
        I: IntoIterator<Item = &'f F>,
        F: Serialize + Send + Sync + 'static,
        T: Serialize + DeserializeOwned + Default + Send + Sync + 'static,
    {
        let items: Vec<&F> = from.into_iter().collect();

        let mapper = self.resolver.resolve::<F, T>().await?;
        let mut mapped = Vec::with_capacity(items.len());
        for item in items {
            let mut to = T::default();
            self.run(&*mapper, item, &mut to, parameters).await?;
            mapped.push(to);
        }

        tracing::debug!(
            factory = %self.name,
            count = mapped.len(),
            to = std::any::type_name::<T>(),
            "Mapped list"
        );

        Ok(mapped)
    }

    /// Drain `from` completely, then map it like [`map_list`](Self::map_list)
    pub async fn map_stream<F, T, S>(
        &self,
        from: S,
        parameters: Option<&MapParameters>,
    ) -> Result<Vec<T>, MapperError>
    where
        S: Stream<Item = F> + Send,
        F: Serialize + Send + Sync + 'static,
        T: Serialize + DeserializeOwned + Default + Send + Sync + 'static,
    {
        let items: Vec<F> = from.collect().await;
        self.map_list::<F, T, _>(&items, parameters).await
    }

    /// The mapper `map` would use for `(F, T)`
    pub async fn get_mapper<F, T>(&self) -> Result<BoxedMapper<F, T>, MapperError>
    where
        F: Serialize + Send + Sync + 'static,
        T: Serialize + DeserializeOwned + Send + Sync + 'static,
    {
        self.resolver.resolve::<F, T>().await
    }

    /// The mapper `map_with_registered_mapper` would use for `(F, T)`
    pub async fn get_registered_mapper<F, T>(
        &self,
    ) -> Result<Option<BoxedMapper<F, T>>, MapperError>
    where
        F: Send + Sync + 'static,
        T: Send + Sync + 'static,
    {
        self.resolver.resolve_registered_only::<F, T>().await
    }

    async fn run<F, T>(
        &self,
        mapper: &dyn Mapper<F, T>,
        from: &F,
        to: &mut T,
        parameters: Option<&MapParameters>,
    ) -> Result<(), MapperError>
    where
        F: Send + Sync + 'static,
        T: Send + Sync + 'static,
    {
        mapper.map(from, to, parameters).await.map_err(|e| {
            tracing::debug!(
                factory = %self.name,
                mapper = mapper.name(),
                error = %e,
                "Mapping failed"
            );
            e
        })
    }
}
