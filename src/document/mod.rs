//! Parsed glTF document model.
//!
//! A deserialized subset of a glTF-family document: just the buffers,
//! buffer views, accessors, and meshes the metadata layer walks, plus the
//! model-level and primitive-level `EXT_feature_metadata` extension
//! objects. Acquiring the document and its binary payload is the caller's
//! job; this crate only requires that buffer data is already resident.

use std::collections::HashMap;

use serde::Deserialize;

use crate::util::Result;

/// Extension name this crate consumes.
pub const EXT_FEATURE_METADATA: &str = "EXT_feature_metadata";

/// A parsed glTF document with resident buffer data.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Document {
    pub buffers: Vec<Buffer>,
    pub buffer_views: Vec<BufferView>,
    pub accessors: Vec<Accessor>,
    pub meshes: Vec<Mesh>,
    pub extensions: DocumentExtensions,
}

impl Document {
    /// Parse document JSON and attach already-resident binary blobs to its
    /// buffers, in buffer order.
    pub fn from_json_with_buffers(json: &str, blobs: Vec<Vec<u8>>) -> Result<Self> {
        let mut doc: Document = serde_json::from_str(json)?;
        for (buffer, blob) in doc.buffers.iter_mut().zip(blobs) {
            buffer.data = blob;
        }
        Ok(doc)
    }

    /// The model-level feature-metadata extension, if present.
    pub fn feature_metadata(&self) -> Option<&ModelFeatureMetadata> {
        self.extensions.ext_feature_metadata.as_ref()
    }

    /// Resolve a buffer view to its byte slice.
    ///
    /// `None` when the view index, buffer index, or byte range is invalid.
    pub fn buffer_view_data(&self, index: usize) -> Option<&[u8]> {
        let view = self.buffer_views.get(index)?;
        let buffer = self.buffers.get(view.buffer)?;
        let end = view.byte_offset.checked_add(view.byte_length)?;
        buffer.data.get(view.byte_offset..end)
    }
}

/// A binary buffer with its data resident in memory.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Buffer {
    pub byte_length: usize,
    /// Attached after JSON parsing; never serialized.
    #[serde(skip)]
    pub data: Vec<u8>,
}

/// A byte-range descriptor into a buffer.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BufferView {
    pub buffer: usize,
    #[serde(default)]
    pub byte_offset: usize,
    pub byte_length: usize,
    #[serde(default)]
    pub byte_stride: Option<usize>,
}

/// A typed accessor over a buffer view.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Accessor {
    #[serde(default)]
    pub buffer_view: Option<usize>,
    #[serde(default)]
    pub byte_offset: usize,
    pub component_type: u32,
    pub count: usize,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub normalized: bool,
}

impl Accessor {
    // glTF componentType codes
    pub const BYTE: u32 = 5120;
    pub const UNSIGNED_BYTE: u32 = 5121;
    pub const SHORT: u32 = 5122;
    pub const UNSIGNED_SHORT: u32 = 5123;
    pub const UNSIGNED_INT: u32 = 5125;
    pub const FLOAT: u32 = 5126;
}

/// A mesh: an array of primitives.
#[derive(Debug, Default, Deserialize)]
pub struct Mesh {
    #[serde(default)]
    pub primitives: Vec<Primitive>,
}

/// A mesh primitive: attribute semantics mapped to accessor indices.
#[derive(Debug, Default, Deserialize)]
pub struct Primitive {
    #[serde(default)]
    pub attributes: HashMap<String, usize>,
    #[serde(default)]
    pub extensions: PrimitiveExtensions,
}

impl Primitive {
    /// The primitive-level feature-metadata extension, if present.
    pub fn feature_metadata(&self) -> Option<&PrimitiveFeatureMetadata> {
        self.extensions.ext_feature_metadata.as_ref()
    }
}

/// Document-level extension container.
#[derive(Debug, Default, Deserialize)]
pub struct DocumentExtensions {
    #[serde(rename = "EXT_feature_metadata")]
    pub ext_feature_metadata: Option<ModelFeatureMetadata>,
}

/// Primitive-level extension container.
#[derive(Debug, Default, Deserialize)]
pub struct PrimitiveExtensions {
    #[serde(rename = "EXT_feature_metadata")]
    pub ext_feature_metadata: Option<PrimitiveFeatureMetadata>,
}

/// Model-level `EXT_feature_metadata` object: a schema plus named feature
/// tables.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelFeatureMetadata {
    #[serde(default)]
    pub schema: Option<Schema>,
    #[serde(default)]
    pub feature_tables: HashMap<String, FeatureTableDef>,
}

/// Schema: named classes describing property types.
#[derive(Debug, Default, Deserialize)]
pub struct Schema {
    #[serde(default)]
    pub classes: HashMap<String, SchemaClass>,
}

/// One schema class: named property type declarations.
#[derive(Debug, Default, Deserialize)]
pub struct SchemaClass {
    #[serde(default)]
    pub properties: HashMap<String, ClassProperty>,
}

/// Declared type of one property: `"INT8"`..`"STRING"` scalar spellings or
/// `"ARRAY"` with a `componentType` and optional fixed `componentCount`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassProperty {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub component_type: Option<String>,
    #[serde(default)]
    pub component_count: Option<usize>,
}

/// One named feature table: row count plus per-property buffer bindings.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureTableDef {
    #[serde(default)]
    pub class: Option<String>,
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub properties: HashMap<String, FeatureTablePropertyDef>,
}

/// Buffer binding of one feature-table property.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureTablePropertyDef {
    pub buffer_view: usize,
    #[serde(default)]
    pub offset_type: Option<String>,
    #[serde(default)]
    pub array_offset_buffer_view: Option<usize>,
    #[serde(default)]
    pub string_offset_buffer_view: Option<usize>,
}

/// Primitive-level `EXT_feature_metadata` object.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimitiveFeatureMetadata {
    #[serde(default)]
    pub feature_id_attributes: Vec<FeatureIdAttribute>,
}

/// One feature-ID attribute declaration on a primitive.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureIdAttribute {
    pub feature_table: String,
    #[serde(default)]
    pub feature_ids: FeatureIds,
}

/// How a primitive's feature IDs are sourced. Only attribute-based IDs are
/// consumed here; `constant`/`divisor` declarations are parsed but skipped
/// by the loader.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeatureIds {
    #[serde(default)]
    pub attribute: Option<String>,
    #[serde(default)]
    pub constant: Option<u64>,
    #[serde(default)]
    pub divisor: Option<u64>,
}
