//! Service scope used to materialize mappers
//!
//! Mapper factories receive the scope and pull their dependencies from it.
//! A dependency that is not present is reported as unavailable, which the
//! resolver treats as a failed materialization rather than a fatal error.
//!
//! Scopes nest: a child scope answers from its own services first and falls
//! back to its parent, so request-level services can shadow application-level
//! ones without copying them.

use crate::MapperError;
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

type ServiceMap = HashMap<TypeId, (&'static str, Arc<dyn Any + Send + Sync>)>;

/// Type-keyed container of shared services
#[derive(Clone)]
pub struct ServiceScope {
    inner: Arc<ScopeInner>,
}

struct ScopeInner {
    name: String,
    services: RwLock<ServiceMap>,
    parent: Option<ServiceScope>,
}

impl ServiceScope {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(ScopeInner {
                name: name.into(),
                services: RwLock::new(HashMap::new()),
                parent: None,
            }),
        }
    }

    /// Create a nested scope that falls back to this one
    pub fn child(&self, name: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(ScopeInner {
                name: name.into(),
                services: RwLock::new(HashMap::new()),
                parent: Some(self.clone()),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Register a service, replacing any previous instance of the same type
    pub fn insert<S: Send + Sync + 'static>(&self, service: S) {
        self.insert_arc(Arc::new(service));
    }

    /// Register an already shared service
    pub fn insert_arc<S: Send + Sync + 'static>(&self, service: Arc<S>) {
        let type_name = std::any::type_name::<S>();
        tracing::trace!(scope = %self.inner.name, service = type_name, "Registering service");
        self.inner
            .services
            .write()
            .insert(TypeId::of::<S>(), (type_name, service));
    }

    /// Builder-style insert
    pub fn with<S: Send + Sync + 'static>(self, service: S) -> Self {
        self.insert(service);
        self
    }

    /// Look up a service in this scope, then in its ancestors
    pub fn resolve<S: Send + Sync + 'static>(&self) -> Option<Arc<S>> {
        let local = self
            .inner
            .services
            .read()
            .get(&TypeId::of::<S>())
            .map(|(_, service)| service.clone());

        match local {
            Some(service) => service.downcast::<S>().ok(),
            None => self.inner.parent.as_ref().and_then(|parent| parent.resolve::<S>()),
        }
    }

    /// Like [`resolve`](Self::resolve) but reports a missing service as unavailable
    pub fn require<S: Send + Sync + 'static>(&self) -> Result<Arc<S>, MapperError> {
        self.resolve::<S>().ok_or_else(|| {
            MapperError::unavailable(
                std::any::type_name::<S>(),
                format!("not registered in scope '{}'", self.inner.name),
            )
        })
    }

    pub fn contains<S: Send + Sync + 'static>(&self) -> bool {
        self.resolve::<S>().is_some()
    }

    /// Number of services registered directly in this scope
    pub fn len(&self) -> usize {
        self.inner.services.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ServiceScope {
    fn default() -> Self {
        Self::new("root")
    }
}

impl fmt::Debug for ServiceScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let services: Vec<&'static str> = self
            .inner
            .services
            .read()
            .values()
            .map(|(name, _)| *name)
            .collect();

        f.debug_struct("ServiceScope")
            .field("name", &self.inner.name)
            .field("services", &services)
            .field("parent", &self.inner.parent.as_ref().map(|p| p.name().to_string()))
            .finish()
    }
}
