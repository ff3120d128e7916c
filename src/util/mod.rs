//! Basic types: component-type algebra and errors.

pub mod component;
pub mod error;

pub use component::{ComponentType, MetadataScalar, OffsetType};
pub use error::{Error, Result};
