//! Metadata loader.
//!
//! Walks a parsed document once and builds the [`MetadataRegistry`]:
//! property views for every feature-table column and feature-ID accessors
//! for every mesh primitive. Loading is best-effort per entry: a malformed
//! property or attribute is logged and skipped, never fatal, so one bad
//! column cannot take down an interactive host. Tables are independent and
//! load in parallel.

use std::collections::HashMap;

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::accessor::FeatureIdAccessor;
use crate::document::{
    Document, FeatureIdAttribute, FeatureTableDef, FeatureTablePropertyDef, ModelFeatureMetadata,
    Primitive, SchemaClass,
};
use crate::table::{FeatureIdList, FeatureTable, MetadataRegistry};
use crate::util::{ComponentType, Error, OffsetType, Result};
use crate::view::{
    ArrayPropertyView, ArrayShape, BooleanArrayPropertyView, BooleanPropertyView, OffsetBuffer,
    PropertyView, ScalarPropertyView, StringArrayPropertyView, StringPropertyView,
};

/// Build the registry for a document.
///
/// Never fails: a document without the model-level extension yields an
/// empty registry, and malformed entries degrade to a smaller one. All
/// views in the result alias the document's buffers.
pub fn load_metadata(document: &Document) -> MetadataRegistry<'_> {
    let Some(metadata) = document.feature_metadata() else {
        return MetadataRegistry::default();
    };

    let entries: Vec<(&String, &FeatureTableDef)> = metadata.feature_tables.iter().collect();
    let tables: HashMap<String, FeatureTable<'_>> = entries
        .par_iter()
        .map(|(name, def)| {
            (
                (*name).clone(),
                load_feature_table(document, metadata, name.as_str(), def),
            )
        })
        .collect();

    let mut feature_ids = Vec::new();
    for mesh in &document.meshes {
        for primitive in &mesh.primitives {
            feature_ids.push(load_feature_ids(document, primitive));
        }
    }

    debug!(
        tables = tables.len(),
        primitives = feature_ids.len(),
        "loaded feature metadata"
    );
    MetadataRegistry::new(tables, feature_ids)
}

fn load_feature_table<'a>(
    document: &'a Document,
    metadata: &ModelFeatureMetadata,
    name: &str,
    def: &FeatureTableDef,
) -> FeatureTable<'a> {
    let class = def
        .class
        .as_deref()
        .and_then(|class| metadata.schema.as_ref()?.classes.get(class));

    let mut properties = HashMap::new();
    for (property_name, property_def) in &def.properties {
        match build_property(document, class, def.count, property_name, property_def) {
            Ok(view) => {
                properties.insert(property_name.clone(), view);
            }
            Err(err) => {
                warn!(
                    table = name,
                    property = property_name.as_str(),
                    %err,
                    "skipping feature-table property"
                );
            }
        }
    }
    FeatureTable::new(name.to_string(), def.count, properties)
}

/// Construct the typed view for one property, dispatching on its declared
/// component type and shape. Any structural problem is an `Err` for the
/// caller to log and skip.
fn build_property<'a>(
    document: &'a Document,
    class: Option<&SchemaClass>,
    count: usize,
    name: &str,
    def: &FeatureTablePropertyDef,
) -> Result<PropertyView<'a>> {
    let class = class.ok_or_else(|| Error::MissingSchema("feature table class".to_string()))?;
    let declared = class
        .properties
        .get(name)
        .ok_or_else(|| Error::MissingSchema(format!("class property {name}")))?;

    let values = document
        .buffer_view_data(def.buffer_view)
        .ok_or(Error::MissingBufferView(def.buffer_view))?;

    let offset_type = match def.offset_type.as_deref() {
        None => OffsetType::default(),
        Some(spelling) => OffsetType::from_name(spelling)
            .ok_or_else(|| Error::UnsupportedType(format!("offsetType {spelling}")))?,
    };

    match declared.kind.as_str() {
        "ARRAY" => {
            let component = declared
                .component_type
                .as_deref()
                .and_then(ComponentType::from_name)
                .ok_or_else(|| {
                    Error::UnsupportedType(format!(
                        "array componentType {:?}",
                        declared.component_type
                    ))
                })?;
            build_array_property(
                document,
                count,
                def,
                offset_type,
                values,
                component,
                declared.component_count,
            )
        }
        "STRING" => {
            let offsets = string_offsets(document, def, offset_type, offset_entries(count)?, values.len())?;
            Ok(PropertyView::String(StringPropertyView::new(
                values, offsets, count,
            )?))
        }
        "BOOLEAN" => Ok(PropertyView::Boolean(BooleanPropertyView::new(
            values, count,
        )?)),
        scalar => {
            let component = ComponentType::from_name(scalar)
                .ok_or_else(|| Error::UnsupportedType(format!("type {scalar}")))?;
            numeric_scalar_property(component, values, count)
        }
    }
}

fn build_array_property<'a>(
    document: &'a Document,
    count: usize,
    def: &FeatureTablePropertyDef,
    offset_type: OffsetType,
    values: &'a [u8],
    component: ComponentType,
    component_count: Option<usize>,
) -> Result<PropertyView<'a>> {
    // element capacity of the value data, in the component's own units
    let capacity = |elem_bytes: Option<usize>| match elem_bytes {
        Some(size) => values.len() / size,
        None => values.len() * 8, // boolean, bit-packed
    };

    match component {
        ComponentType::String => {
            let string_entries = {
                let bytes = string_offset_bytes(document, def)?;
                bytes.len() / offset_type.num_bytes()
            };
            let string_offsets =
                string_offsets(document, def, offset_type, string_entries, values.len())?;
            let shape = match component_count {
                Some(cc) => {
                    let strings = Error::checked_size(count, cc)?;
                    if strings >= string_entries {
                        return Err(Error::offsets(format!(
                            "fixed string arrays need {} string offsets, have {string_entries}",
                            strings.saturating_add(1)
                        )));
                    }
                    ArrayShape::Fixed(cc)
                }
                None => ArrayShape::Variable(array_offsets(
                    document,
                    def,
                    offset_type,
                    offset_entries(count)?,
                    string_entries.saturating_sub(1),
                )?),
            };
            Ok(PropertyView::StringArray(StringArrayPropertyView::new(
                values,
                string_offsets,
                count,
                shape,
            )?))
        }
        ComponentType::Boolean => {
            let shape = resolve_shape(
                document,
                def,
                offset_type,
                count,
                component_count,
                capacity(None),
            )?;
            Ok(PropertyView::BooleanArray(BooleanArrayPropertyView::new(
                values, count, shape,
            )?))
        }
        numeric => {
            let shape = resolve_shape(
                document,
                def,
                offset_type,
                count,
                component_count,
                capacity(numeric.num_bytes()),
            )?;
            numeric_array_property(numeric, values, count, shape)
        }
    }
}

/// Fixed shape from the schema's componentCount, or a validated
/// variable-length offset table.
fn resolve_shape<'a>(
    document: &'a Document,
    def: &FeatureTablePropertyDef,
    offset_type: OffsetType,
    count: usize,
    component_count: Option<usize>,
    element_capacity: usize,
) -> Result<ArrayShape<'a>> {
    match component_count {
        Some(cc) => Ok(ArrayShape::Fixed(cc)),
        None => Ok(ArrayShape::Variable(array_offsets(
            document,
            def,
            offset_type,
            offset_entries(count)?,
            element_capacity,
        )?)),
    }
}

/// Offset entries needed for `count` variable-length rows.
fn offset_entries(count: usize) -> Result<usize> {
    count
        .checked_add(1)
        .ok_or_else(|| Error::offsets(format!("row count {count} overflows the offset table")))
}

fn array_offsets<'a>(
    document: &'a Document,
    def: &FeatureTablePropertyDef,
    offset_type: OffsetType,
    entries: usize,
    element_capacity: usize,
) -> Result<OffsetBuffer<'a>> {
    let view = def
        .array_offset_buffer_view
        .ok_or_else(|| Error::offsets("variable array without arrayOffsetBufferView".to_string()))?;
    let bytes = document
        .buffer_view_data(view)
        .ok_or(Error::MissingBufferView(view))?;
    OffsetBuffer::new(bytes, offset_type, entries, element_capacity)
}

fn string_offset_bytes<'a>(
    document: &'a Document,
    def: &FeatureTablePropertyDef,
) -> Result<&'a [u8]> {
    let view = def
        .string_offset_buffer_view
        .ok_or_else(|| Error::offsets("string property without stringOffsetBufferView".to_string()))?;
    document
        .buffer_view_data(view)
        .ok_or(Error::MissingBufferView(view))
}

fn string_offsets<'a>(
    document: &'a Document,
    def: &FeatureTablePropertyDef,
    offset_type: OffsetType,
    entries: usize,
    data_len: usize,
) -> Result<OffsetBuffer<'a>> {
    let bytes = string_offset_bytes(document, def)?;
    OffsetBuffer::new(bytes, offset_type, entries, data_len)
}

fn numeric_scalar_property<'a>(
    component: ComponentType,
    values: &'a [u8],
    count: usize,
) -> Result<PropertyView<'a>> {
    Ok(match component {
        ComponentType::Int8 => PropertyView::Int8(ScalarPropertyView::new(values, count)?),
        ComponentType::Uint8 => PropertyView::Uint8(ScalarPropertyView::new(values, count)?),
        ComponentType::Int16 => PropertyView::Int16(ScalarPropertyView::new(values, count)?),
        ComponentType::Uint16 => PropertyView::Uint16(ScalarPropertyView::new(values, count)?),
        ComponentType::Int32 => PropertyView::Int32(ScalarPropertyView::new(values, count)?),
        ComponentType::Uint32 => PropertyView::Uint32(ScalarPropertyView::new(values, count)?),
        ComponentType::Int64 => PropertyView::Int64(ScalarPropertyView::new(values, count)?),
        ComponentType::Uint64 => PropertyView::Uint64(ScalarPropertyView::new(values, count)?),
        ComponentType::Float32 => PropertyView::Float32(ScalarPropertyView::new(values, count)?),
        ComponentType::Float64 => PropertyView::Float64(ScalarPropertyView::new(values, count)?),
        ComponentType::Boolean | ComponentType::String => {
            return Err(Error::UnsupportedType(format!(
                "{component} is not a numeric scalar"
            )))
        }
    })
}

fn numeric_array_property<'a>(
    component: ComponentType,
    values: &'a [u8],
    count: usize,
    shape: ArrayShape<'a>,
) -> Result<PropertyView<'a>> {
    Ok(match component {
        ComponentType::Int8 => {
            PropertyView::Int8Array(ArrayPropertyView::new(values, count, shape)?)
        }
        ComponentType::Uint8 => {
            PropertyView::Uint8Array(ArrayPropertyView::new(values, count, shape)?)
        }
        ComponentType::Int16 => {
            PropertyView::Int16Array(ArrayPropertyView::new(values, count, shape)?)
        }
        ComponentType::Uint16 => {
            PropertyView::Uint16Array(ArrayPropertyView::new(values, count, shape)?)
        }
        ComponentType::Int32 => {
            PropertyView::Int32Array(ArrayPropertyView::new(values, count, shape)?)
        }
        ComponentType::Uint32 => {
            PropertyView::Uint32Array(ArrayPropertyView::new(values, count, shape)?)
        }
        ComponentType::Int64 => {
            PropertyView::Int64Array(ArrayPropertyView::new(values, count, shape)?)
        }
        ComponentType::Uint64 => {
            PropertyView::Uint64Array(ArrayPropertyView::new(values, count, shape)?)
        }
        ComponentType::Float32 => {
            PropertyView::Float32Array(ArrayPropertyView::new(values, count, shape)?)
        }
        ComponentType::Float64 => {
            PropertyView::Float64Array(ArrayPropertyView::new(values, count, shape)?)
        }
        ComponentType::Boolean | ComponentType::String => {
            return Err(Error::UnsupportedType(format!(
                "{component} is not a numeric array component"
            )))
        }
    })
}

fn load_feature_ids<'a>(document: &'a Document, primitive: &Primitive) -> FeatureIdList<'a> {
    let mut list = FeatureIdList::new();
    let Some(metadata) = primitive.feature_metadata() else {
        return list;
    };
    for attribute in &metadata.feature_id_attributes {
        match build_feature_id(document, primitive, attribute) {
            Ok(entry) => list.push(entry),
            Err(err) => {
                warn!(
                    table = attribute.feature_table.as_str(),
                    %err,
                    "skipping feature-ID attribute"
                );
            }
        }
    }
    list
}

fn build_feature_id<'a>(
    document: &'a Document,
    primitive: &Primitive,
    attribute: &FeatureIdAttribute,
) -> Result<(String, FeatureIdAccessor<'a>)> {
    let semantic = attribute
        .feature_ids
        .attribute
        .clone()
        .ok_or_else(|| Error::UnsupportedType("implicit (constant/divisor) feature IDs".to_string()))?;
    let accessor_index = *primitive
        .attributes
        .get(&semantic)
        .ok_or_else(|| Error::other(format!("attribute {semantic} not present on primitive")))?;
    let accessor = FeatureIdAccessor::from_document(document, accessor_index)?;
    Ok((semantic, accessor))
}
