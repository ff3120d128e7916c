//! Feature tables and the metadata registry.
//!
//! Both types are built once by the loader and never mutated afterward, so
//! they are safe to share across query threads without synchronization.
//! They borrow from the document's buffers; the document must outlive them.

use std::collections::HashMap;

use smallvec::SmallVec;

use crate::accessor::FeatureIdAccessor;
use crate::view::PropertyView;

/// Ordered (attribute semantic, accessor) pairs of one mesh primitive.
pub type FeatureIdList<'a> = SmallVec<[(String, FeatureIdAccessor<'a>); 2]>;

/// A named feature table: one property view per named column.
#[derive(Debug, Default)]
pub struct FeatureTable<'a> {
    name: String,
    count: usize,
    properties: HashMap<String, PropertyView<'a>>,
}

impl<'a> FeatureTable<'a> {
    pub(crate) fn new(
        name: String,
        count: usize,
        properties: HashMap<String, PropertyView<'a>>,
    ) -> Self {
        Self {
            name,
            count,
            properties,
        }
    }

    /// Table name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of feature rows.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Look up a property view by name. `None` is an ordinary lookup miss,
    /// not an error; callers routinely probe for optional metadata.
    pub fn property(&self, name: &str) -> Option<&PropertyView<'a>> {
        self.properties.get(name)
    }

    /// Number of loaded properties.
    pub fn num_properties(&self) -> usize {
        self.properties.len()
    }

    /// Iterate over property names.
    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    /// Iterate over (name, view) pairs.
    pub fn properties(&self) -> impl Iterator<Item = (&str, &PropertyView<'a>)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Everything the loader extracted from one document: named feature tables
/// plus, per mesh primitive in document order, its feature-ID accessors in
/// declaration order.
#[derive(Debug, Default)]
pub struct MetadataRegistry<'a> {
    tables: HashMap<String, FeatureTable<'a>>,
    feature_ids: Vec<FeatureIdList<'a>>,
}

impl<'a> MetadataRegistry<'a> {
    pub(crate) fn new(
        tables: HashMap<String, FeatureTable<'a>>,
        feature_ids: Vec<FeatureIdList<'a>>,
    ) -> Self {
        Self {
            tables,
            feature_ids,
        }
    }

    /// Look up a feature table by name.
    pub fn feature_table(&self, name: &str) -> Option<&FeatureTable<'a>> {
        self.tables.get(name)
    }

    /// Iterate over all feature tables.
    pub fn feature_tables(&self) -> impl Iterator<Item = &FeatureTable<'a>> {
        self.tables.values()
    }

    /// Number of feature tables.
    pub fn num_tables(&self) -> usize {
        self.tables.len()
    }

    /// The (semantic, accessor) list of one mesh primitive, in declaration
    /// order. Unknown primitive indices yield an empty slice.
    pub fn feature_id_accessors(
        &self,
        primitive_index: usize,
    ) -> &[(String, FeatureIdAccessor<'a>)] {
        self.feature_ids
            .get(primitive_index)
            .map(|list| list.as_slice())
            .unwrap_or(&[])
    }

    /// Number of mesh primitives walked at load time.
    pub fn num_primitives(&self) -> usize {
        self.feature_ids.len()
    }

    /// True when the document carried no usable feature metadata.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty() && self.feature_ids.iter().all(|list| list.is_empty())
    }
}
