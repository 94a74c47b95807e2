//! Sources of mapper descriptors for automatic registry initialization
//!
//! A registry runs its discovery source exactly once, on first use. Three
//! sources ship with the crate:
//!
//! - **NoDiscovery**: nothing is discovered; only explicit registrations count
//! - **StaticDiscovery**: a fixed list assembled at start-up
//! - **InventoryDiscovery**: every mapper submitted with [`submit_mapper!`]
//!   anywhere in the final binary
//!
//! Link-time submissions come back in an order chosen by the linker. When
//! several mappers for one pair must run in a specific order, register them
//! explicitly instead.

use crate::MapperDescriptor;
use async_trait::async_trait;
use std::fmt;

/// Produces the descriptors used to populate a registry on first use
#[async_trait]
pub trait MapperDiscovery: Send + Sync + fmt::Debug {
    /// Source name for logs and registry metadata
    fn name(&self) -> &str;

    async fn discover(&self) -> Vec<MapperDescriptor>;
}

/// Discovers nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDiscovery;

#[async_trait]
impl MapperDiscovery for NoDiscovery {
    fn name(&self) -> &str {
        "none"
    }

    async fn discover(&self) -> Vec<MapperDescriptor> {
        Vec::new()
    }
}

/// Fixed descriptor list, returned in insertion order
#[derive(Debug, Default, Clone)]
pub struct StaticDiscovery {
    descriptors: Vec<MapperDescriptor>,
}

impl StaticDiscovery {
    pub fn new(descriptors: Vec<MapperDescriptor>) -> Self {
        Self { descriptors }
    }

    pub fn with(mut self, descriptor: MapperDescriptor) -> Self {
        self.push(descriptor);
        self
    }

    pub fn push(&mut self, descriptor: MapperDescriptor) {
        self.descriptors.push(descriptor);
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

#[async_trait]
impl MapperDiscovery for StaticDiscovery {
    fn name(&self) -> &str {
        "static"
    }

    async fn discover(&self) -> Vec<MapperDescriptor> {
        self.descriptors.clone()
    }
}

/// Link-time registration record collected by `inventory`
///
/// Created by [`submit_mapper!`]; rarely constructed by hand.
pub struct MapperRegistration {
    describe: fn() -> MapperDescriptor,
}

impl MapperRegistration {
    pub const fn new(describe: fn() -> MapperDescriptor) -> Self {
        Self { describe }
    }

    pub fn descriptor(&self) -> MapperDescriptor {
        (self.describe)()
    }
}

inventory::collect!(MapperRegistration);

/// Every mapper submitted with [`submit_mapper!`] in the linked binary
#[derive(Debug, Default, Clone, Copy)]
pub struct InventoryDiscovery;

#[async_trait]
impl MapperDiscovery for InventoryDiscovery {
    fn name(&self) -> &str {
        "inventory"
    }

    async fn discover(&self) -> Vec<MapperDescriptor> {
        let descriptors: Vec<MapperDescriptor> = inventory::iter::<MapperRegistration>
            .into_iter()
            .map(MapperRegistration::descriptor)
            .collect();

        tracing::debug!(
            count = descriptors.len(),
            "Collected link-time mapper registrations"
        );

        descriptors
    }
}

/// Submit a mapper for link-time discovery by [`InventoryDiscovery`]
///
/// ```rust,ignore
/// // Mapper built with Default
/// mapper::submit_mapper!(Customer => CustomerDto, CustomerDtoMapper);
///
/// // Mapper built from the service scope
/// mapper::submit_mapper!(Order => OrderDto, OrderDtoMapper, |scope| {
///     Ok(OrderDtoMapper::new(scope.require::<CurrencyService>()?))
/// });
/// ```
#[macro_export]
macro_rules! submit_mapper {
    ($from:ty => $to:ty, $mapper:ty) => {
        const _: () = {
            fn describe() -> $crate::MapperDescriptor {
                $crate::MapperDescriptor::of::<$from, $to, $mapper>()
            }

            $crate::inventory::submit! {
                $crate::discovery::MapperRegistration::new(describe)
            }
        };
    };
    ($from:ty => $to:ty, $mapper:ty, $factory:expr) => {
        const _: () = {
            fn describe() -> $crate::MapperDescriptor {
                $crate::MapperDescriptor::new::<$from, $to, $mapper, _>($factory)
            }

            $crate::inventory::submit! {
                $crate::discovery::MapperRegistration::new(describe)
            }
        };
    };
}
