//! Sequential composition of the mappers registered for one type pair

use crate::{BoxedMapper, MapParameters, Mapper, MapperError};
use async_trait::async_trait;
use std::fmt;

/// Runs every contained mapper against the same source and target
///
/// Mappers run strictly one after another in registration order, each seeing
/// the mutations of the ones before it. The first failure stops the sequence
/// and is returned unchanged; mutations already made stay in place.
pub struct CompositeMapper<F, T> {
    mappers: Vec<BoxedMapper<F, T>>,
    name: String,
}

impl<F, T> CompositeMapper<F, T>
where
    F: Send + Sync + 'static,
    T: Send + Sync + 'static,
{
    pub fn new(mappers: Vec<BoxedMapper<F, T>>) -> Self {
        let name = format!("composite-{}", mappers.len());
        Self { mappers, name }
    }

    /// Number of contained mappers
    pub fn len(&self) -> usize {
        self.mappers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappers.is_empty()
    }

    /// Names of the contained mappers in execution order
    pub fn mapper_names(&self) -> Vec<&str> {
        self.mappers.iter().map(|mapper| mapper.name()).collect()
    }
}

#[async_trait]
impl<F, T> Mapper<F, T> for CompositeMapper<F, T>
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
        for (index, mapper) in self.mappers.iter().enumerate() {
            if let Err(e) = mapper.map(from, to, parameters).await {
                tracing::debug!(
                    composite = %self.name,
                    mapper = mapper.name(),
                    position = index,
                    error = %e,
                    "Composite mapper stopped"
                );
                return Err(e);
            }
        }
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl<F, T> fmt::Debug for CompositeMapper<F, T>
where
    F: Send + Sync + 'static,
    T: Send + Sync + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeMapper")
            .field("name", &self.name)
            .field("mappers", &self.mapper_names())
            .finish()
    }
}
