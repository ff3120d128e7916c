//! # gltf-feature-metadata
//!
//! Typed, zero-copy property views over the glTF `EXT_feature_metadata`
//! extension, as used by 3D Tiles terrain and model tiles.
//!
//! Given a parsed document with resident buffer data, the loader walks the
//! extension once and builds a [`MetadataRegistry`]: per named feature
//! table, a typed [`PropertyView`] for every property; per mesh primitive,
//! the ordered feature-ID accessors. Reads go straight to the document's
//! buffers - no payload bytes are copied anywhere, and every view's
//! lifetime is tied to the document it aliases.
//!
//! ## Modules
//!
//! - [`util`] - component-type algebra, errors
//! - [`document`] - parsed glTF subset + extension objects
//! - [`view`] - zero-copy property and array views
//! - [`value`] - the metadata value sum type
//! - [`accessor`] - feature-ID accessor views
//! - [`table`] - feature tables and the registry
//! - [`loader`] - the load pass
//!
//! ## Example
//!
//! ```ignore
//! use gltf_feature_metadata::{load_metadata, Document};
//!
//! let doc = Document::from_json_with_buffers(&json, buffers)?;
//! let registry = load_metadata(&doc);
//!
//! let table = registry.feature_table("buildings").unwrap();
//! let height = table.property("height").unwrap();
//! for (semantic, ids) in registry.feature_id_accessors(0) {
//!     let row = ids.get(vertex)? as usize;
//!     println!("{semantic}: {}", height.get_value(row)?.stringify("N/A"));
//! }
//! ```

pub mod accessor;
pub mod document;
pub mod loader;
pub mod table;
pub mod util;
pub mod value;
pub mod view;

// Re-export the query surface
pub use accessor::{AccessorView, FeatureIdAccessor};
pub use document::Document;
pub use loader::load_metadata;
pub use table::{FeatureTable, MetadataRegistry};
pub use util::{ComponentType, Error, OffsetType, Result};
pub use value::Value;
pub use view::PropertyView;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::accessor::FeatureIdAccessor;
    pub use crate::document::Document;
    pub use crate::loader::load_metadata;
    pub use crate::table::{FeatureTable, MetadataRegistry};
    pub use crate::util::{ComponentType, Error, Result};
    pub use crate::value::Value;
    pub use crate::view::PropertyView;
}
