//! Fallback mapper for pairs without a registered mapper

use crate::{FieldCopier, MapParameters, Mapper, MapperError};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::marker::PhantomData;

/// Copies same-named compatible fields from source to target
///
/// Parameters are ignored. The target is rebuilt through serde when any field
/// is copied, so target fields marked `#[serde(skip)]` are reset to their
/// defaults even when mapping into an existing instance.
pub struct GenericMapper<F, T> {
    copier: FieldCopier,
    _types: PhantomData<fn(&F, &mut T)>,
}

impl<F, T> GenericMapper<F, T> {
    pub fn new(copier: FieldCopier) -> Self {
        Self {
            copier,
            _types: PhantomData,
        }
    }

    pub fn copier(&self) -> FieldCopier {
        self.copier
    }
}

impl<F, T> Default for GenericMapper<F, T> {
    fn default() -> Self {
        Self::new(FieldCopier::default())
    }
}

#[async_trait]
impl<F, T> Mapper<F, T> for GenericMapper<F, T>
where
    F: Serialize + Send + Sync + 'static,
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    async fn map(
        &self,
        from: &F,
        to: &mut T,
        _parameters: Option<&MapParameters>,
    ) -> Result<(), MapperError> {
        self.copier.copy(from, to).map(|_| ())
    }

    fn name(&self) -> &str {
        "generic"
    }
}

impl<F, T> fmt::Debug for GenericMapper<F, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenericMapper")
            .field("copier", &self.copier)
            .finish()
    }
}
