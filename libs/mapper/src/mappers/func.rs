//! Closure-backed mapper

use crate::{MapParameters, Mapper, MapperError};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

type MapFn<F, T> =
    dyn Fn(&F, &mut T, Option<&MapParameters>) -> Result<(), MapperError> + Send + Sync;

/// Mapper that delegates to a synchronous closure
///
/// Cloning shares the closure.
pub struct FnMapper<F, T> {
    name: Arc<str>,
    func: Arc<MapFn<F, T>>,
}

impl<F, T> FnMapper<F, T> {
    pub fn new<Func>(name: impl Into<Arc<str>>, func: Func) -> Self
    where
        Func: Fn(&F, &mut T, Option<&MapParameters>) -> Result<(), MapperError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }
}

impl<F, T> Clone for FnMapper<F, T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            func: self.func.clone(),
        }
    }
}

#[async_trait]
impl<F, T> Mapper<F, T> for FnMapper<F, T>
where
    F: Send + Sync + 'static,
    T: Send + Sync + 'static,
{
    async fn map(
        &self,
        from: &F,
        to: &mut T,
        parameters: Option<&MapParameters>,
    ) -> Result<(), MapperError> {
        (self.func)(from, to, parameters)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl<F, T> fmt::Debug for FnMapper<F, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnMapper")
            .field("name", &self.name)
            .finish()
    }
}
