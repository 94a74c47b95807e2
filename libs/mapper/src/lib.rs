//! Type-Pair Keyed Object Mapping Dispatch
//!
//! Resolves the mapper for a `(source, target)` type pair and runs it. Several
//! mappers registered for the same pair cooperate through a composite that
//! runs them in registration order; a pair with no usable mapper falls back to
//! a generic field-by-field copy.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐   ┌──────────────────┐   ┌────────────────────────┐
//! │  MapperFactory   │──▶│  MapperResolver  │──▶│     MapperRegistry     │
//! │  map / map_into  │   │  0 │ 1 │ N       │   │ TypePair -> [Descr...] │
//! │  map_list / ...  │   └────────┬─────────┘   └───────────▲────────────┘
//! └──────────────────┘            │                         │ once
//!                      ┌──────────┴─────────┐   ┌───────────┴────────────┐
//!                      │ Composite │ Generic │   │    MapperDiscovery     │
//!                      └────────────────────┘   └────────────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust
//! use mapper::{MapperFactory, MapperRegistry};
//! use serde::{Deserialize, Serialize};
//! use std::sync::Arc;
//!
//! #[derive(Serialize)]
//! struct Customer { name: String }
//!
//! #[derive(Default, Serialize, Deserialize)]
//! struct CustomerDto { name: String, email: Option<String> }
//!
//! # tokio_test::block_on(async {
//! let factory = MapperFactory::new(Arc::new(MapperRegistry::new()));
//! let dto = factory
//!     .map::<Customer, CustomerDto>(&Customer { name: "Ada".into() }, None)
//!     .await
//!     .unwrap();
//! assert_eq!(dto.name, "Ada");
//! assert_eq!(dto.email, None);
//! # });
//! ```

pub mod config;
pub mod copy;
pub mod descriptor;
pub mod discovery;
pub mod error;
pub mod factory;
pub mod mappers;
pub mod pair;
pub mod parameters;
pub mod registry;
pub mod resolver;
pub mod scope;
pub mod test_utils;

use async_trait::async_trait;

pub use config::{FailurePolicy, FieldCopyConfig, MapperConfig};
pub use copy::{CopyReport, FieldCopier};
pub use descriptor::{BoxedMapper, MapperDescriptor};
pub use discovery::{
    InventoryDiscovery, MapperDiscovery, MapperRegistration, NoDiscovery, StaticDiscovery,
};
pub use error::MapperError;
pub use factory::MapperFactory;
pub use mappers::{CompositeMapper, FnMapper, GenericMapper};
pub use pair::TypePair;
pub use parameters::MapParameters;
pub use registry::{MapperRegistry, RegistryMetadata};
pub use resolver::{MapperResolver, ResolverStats, ResolverStatsSnapshot};
pub use scope::ServiceScope;

// Re-exported for `submit_mapper!`
#[doc(hidden)]
pub use inventory;

/// Transforms the data of a source instance into a target instance
///
/// Implementations mutate `to` in place. `parameters` carries mapper-specific
/// options chosen by the caller; implementations that do not need options
/// ignore it.
#[async_trait]
pub trait Mapper<F, T>: Send + Sync
where
    F: Send + Sync + 'static,
    T: Send + Sync + 'static,
{
    async fn map(
        &self,
        from: &F,
        to: &mut T,
        parameters: Option<&MapParameters>,
    ) -> Result<(), MapperError>;

    /// Implementation name for diagnostics
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}
