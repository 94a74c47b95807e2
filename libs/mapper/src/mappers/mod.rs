//! Built-in mapper implementations
//!
//! - **CompositeMapper**: runs several registered mappers for one pair in order
//! - **GenericMapper**: field-by-field copy used when nothing is registered
//! - **FnMapper**: wraps a synchronous closure

pub mod composite;
pub mod func;
pub mod generic;

pub use composite::CompositeMapper;
pub use func::FnMapper;
pub use generic::GenericMapper;
