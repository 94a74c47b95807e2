//! Mapper descriptors: what the registry stores for each type pair
//!
//! A descriptor names a mapper implementation and carries the factory that
//! produces live instances of it. Factories are type-erased so descriptors for
//! different pairs can share one table; [`MapperDescriptor::materialize`]
//! restores the concrete `(F, T)` signature.

use crate::mappers::FnMapper;
use crate::{MapParameters, Mapper, MapperError, ServiceScope, TypePair};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Live mapper instance as returned by resolution
pub type BoxedMapper<F, T> = Box<dyn Mapper<F, T>>;

type TypedFactory<F, T> =
    Arc<dyn Fn(&ServiceScope) -> Result<BoxedMapper<F, T>, MapperError> + Send + Sync>;

/// Registration record for one mapper implementation
#[derive(Clone)]
pub struct MapperDescriptor {
    pair: TypePair,
    name: Arc<str>,
    factory: Arc<dyn Any + Send + Sync>,
}

impl MapperDescriptor {
    /// Descriptor whose instances are produced by `factory`
    ///
    /// The factory runs once per resolution request and may pull dependencies
    /// from the scope. Returning an error marks the mapper as unavailable for
    /// that request.
    pub fn new<F, T, M, Fac>(factory: Fac) -> Self
    where
        F: Send + Sync + 'static,
        T: Send + Sync + 'static,
        M: Mapper<F, T> + 'static,
        Fac: Fn(&ServiceScope) -> Result<M, MapperError> + Send + Sync + 'static,
    {
        Self::named::<F, T, M, Fac>(std::any::type_name::<M>(), factory)
    }

    /// Same as [`new`](Self::new) with an explicit implementation name
    pub fn named<F, T, M, Fac>(name: impl Into<Arc<str>>, factory: Fac) -> Self
    where
        F: Send + Sync + 'static,
        T: Send + Sync + 'static,
        M: Mapper<F, T> + 'static,
        Fac: Fn(&ServiceScope) -> Result<M, MapperError> + Send + Sync + 'static,
    {
        let typed: TypedFactory<F, T> = Arc::new(move |scope: &ServiceScope| {
            factory(scope).map(|mapper| Box::new(mapper) as BoxedMapper<F, T>)
        });

        Self {
            pair: TypePair::of::<F, T>(),
            name: name.into(),
            factory: Arc::new(typed),
        }
    }

    /// Descriptor for a mapper built with `Default`
    pub fn of<F, T, M>() -> Self
    where
        F: Send + Sync + 'static,
        T: Send + Sync + 'static,
        M: Mapper<F, T> + Default + 'static,
    {
        Self::new::<F, T, M, _>(|_| Ok(M::default()))
    }

    /// Descriptor for a synchronous closure mapper
    pub fn from_fn<F, T, Func>(name: impl Into<Arc<str>>, func: Func) -> Self
    where
        F: Send + Sync + 'static,
        T: Send + Sync + 'static,
        Func: Fn(&F, &mut T, Option<&MapParameters>) -> Result<(), MapperError>
            + Send
            + Sync
            + 'static,
    {
        let name: Arc<str> = name.into();
        let mapper = FnMapper::new(name.clone(), func);
        Self::named::<F, T, FnMapper<F, T>, _>(name, move |_| Ok(mapper.clone()))
    }

    pub fn pair(&self) -> TypePair {
        self.pair
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Produce a live mapper instance for `(F, T)`
    pub fn materialize<F, T>(&self, scope: &ServiceScope) -> Result<BoxedMapper<F, T>, MapperError>
    where
        F: Send + Sync + 'static,
        T: Send + Sync + 'static,
    {
        let factory = self
            .factory
            .downcast_ref::<TypedFactory<F, T>>()
            .ok_or_else(|| {
                MapperError::materialization(
                    self.name(),
                    TypePair::of::<F, T>().to_string(),
                    format!("descriptor is registered for {}", self.pair),
                )
            })?;

        factory(scope)
    }
}

impl fmt::Debug for MapperDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapperDescriptor")
            .field("name", &self.name)
            .field("pair", &self.pair)
            .finish()
    }
}
