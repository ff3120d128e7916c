//! Component types - the primitive kinds a feature-table property can hold.
//!
//! These mirror the `componentType`/`type` spellings of the
//! EXT_feature_metadata schema ("INT8", "FLOAT64", "BOOLEAN", ...).

use std::fmt;

use crate::value::Value;
use crate::view::ArrayView;

/// Primitive component type of a feature-table property.
///
/// Each numeric type has a fixed size and little-endian binary
/// representation in the document's buffers. Booleans are bit-packed;
/// strings are variable-length UTF-8 addressed through an offset table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComponentType {
    /// Signed 8-bit integer
    Int8,
    /// Unsigned 8-bit integer
    Uint8,
    /// Signed 16-bit integer
    Int16,
    /// Unsigned 16-bit integer
    Uint16,
    /// Signed 32-bit integer
    Int32,
    /// Unsigned 32-bit integer
    Uint32,
    /// Signed 64-bit integer
    Int64,
    /// Unsigned 64-bit integer
    Uint64,
    /// 32-bit floating point (IEEE 754 single precision)
    Float32,
    /// 64-bit floating point (IEEE 754 double precision)
    Float64,
    /// Boolean (bit-packed in buffers)
    Boolean,
    /// UTF-8 string (offset-table addressed)
    String,
}

impl ComponentType {
    /// Number of component types.
    pub const COUNT: usize = 12;

    /// Returns the schema spelling of this type.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Int8 => "INT8",
            Self::Uint8 => "UINT8",
            Self::Int16 => "INT16",
            Self::Uint16 => "UINT16",
            Self::Int32 => "INT32",
            Self::Uint32 => "UINT32",
            Self::Int64 => "INT64",
            Self::Uint64 => "UINT64",
            Self::Float32 => "FLOAT32",
            Self::Float64 => "FLOAT64",
            Self::Boolean => "BOOLEAN",
            Self::String => "STRING",
        }
    }

    /// Parse a component type from its schema spelling.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "INT8" => Some(Self::Int8),
            "UINT8" => Some(Self::Uint8),
            "INT16" => Some(Self::Int16),
            "UINT16" => Some(Self::Uint16),
            "INT32" => Some(Self::Int32),
            "UINT32" => Some(Self::Uint32),
            "INT64" => Some(Self::Int64),
            "UINT64" => Some(Self::Uint64),
            "FLOAT32" => Some(Self::Float32),
            "FLOAT64" => Some(Self::Float64),
            "BOOLEAN" => Some(Self::Boolean),
            "STRING" => Some(Self::String),
            _ => None,
        }
    }

    /// Returns the buffer size in bytes of one element, for numeric types.
    ///
    /// `None` for `Boolean` (bit-packed) and `String` (variable length).
    #[inline]
    pub const fn num_bytes(self) -> Option<usize> {
        match self {
            Self::Int8 | Self::Uint8 => Some(1),
            Self::Int16 | Self::Uint16 => Some(2),
            Self::Int32 | Self::Uint32 | Self::Float32 => Some(4),
            Self::Int64 | Self::Uint64 | Self::Float64 => Some(8),
            Self::Boolean | Self::String => None,
        }
    }

    /// Returns true if this is a numeric type (int or float).
    #[inline]
    pub const fn is_numeric(self) -> bool {
        !matches!(self, Self::Boolean | Self::String)
    }

    /// Returns true if this is an integer type.
    #[inline]
    pub const fn is_integer(self) -> bool {
        self.is_numeric() && !self.is_float()
    }

    /// Returns true if this is a floating point type.
    #[inline]
    pub const fn is_float(self) -> bool {
        matches!(self, Self::Float32 | Self::Float64)
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Integer width of a variable-length offset table.
///
/// EXT_feature_metadata defaults to `UINT32` when a property omits
/// `offsetType`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum OffsetType {
    /// Unsigned 8-bit offsets
    Uint8,
    /// Unsigned 16-bit offsets
    Uint16,
    /// Unsigned 32-bit offsets
    #[default]
    Uint32,
    /// Unsigned 64-bit offsets
    Uint64,
}

impl OffsetType {
    /// Parse an offset type from its schema spelling.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "UINT8" => Some(Self::Uint8),
            "UINT16" => Some(Self::Uint16),
            "UINT32" => Some(Self::Uint32),
            "UINT64" => Some(Self::Uint64),
            _ => None,
        }
    }

    /// Size in bytes of one offset entry.
    #[inline]
    pub const fn num_bytes(self) -> usize {
        match self {
            Self::Uint8 => 1,
            Self::Uint16 => 2,
            Self::Uint32 => 4,
            Self::Uint64 => 8,
        }
    }
}

// === Scalar trait for type-safe buffer reads ===

/// Trait for the numeric Rust primitives that can back a metadata property.
///
/// Binds each primitive to its [`ComponentType`] tag, provides the
/// little-endian buffer decoding used by every view, and lifts scalars and
/// array views into the matching [`Value`] variants.
pub trait MetadataScalar:
    bytemuck::Pod + Copy + Default + PartialEq + fmt::Debug + Send + Sync + 'static
{
    /// The corresponding ComponentType tag.
    const COMPONENT_TYPE: ComponentType;

    /// Size of this type in bytes.
    const SIZE: usize = std::mem::size_of::<Self>();

    /// Decode one value from little-endian bytes.
    ///
    /// `bytes` must hold at least `SIZE` bytes; views bounds-check before
    /// calling.
    fn read_le(bytes: &[u8]) -> Self;

    /// Lift a scalar into the value algebra.
    fn scalar_value<'a>(self) -> Value<'a>;

    /// Lift an array view into the value algebra.
    fn array_value(view: ArrayView<'_, Self>) -> Value<'_>;
}

macro_rules! impl_metadata_scalar {
    ($ty:ty, $tag:ident, $scalar:ident, $array:ident) => {
        impl MetadataScalar for $ty {
            const COMPONENT_TYPE: ComponentType = ComponentType::$tag;

            #[inline]
            fn read_le(bytes: &[u8]) -> Self {
                let mut raw = [0u8; std::mem::size_of::<$ty>()];
                raw.copy_from_slice(&bytes[..std::mem::size_of::<$ty>()]);
                <$ty>::from_le_bytes(raw)
            }

            #[inline]
            fn scalar_value<'a>(self) -> Value<'a> {
                Value::$scalar(self)
            }

            #[inline]
            fn array_value(view: ArrayView<'_, Self>) -> Value<'_> {
                Value::$array(view)
            }
        }
    };
}

impl_metadata_scalar!(i8, Int8, Int8, Int8Array);
impl_metadata_scalar!(u8, Uint8, Uint8, Uint8Array);
impl_metadata_scalar!(i16, Int16, Int16, Int16Array);
impl_metadata_scalar!(u16, Uint16, Uint16, Uint16Array);
impl_metadata_scalar!(i32, Int32, Int32, Int32Array);
impl_metadata_scalar!(u32, Uint32, Uint32, Uint32Array);
impl_metadata_scalar!(i64, Int64, Int64, Int64Array);
impl_metadata_scalar!(u64, Uint64, Uint64, Uint64Array);
impl_metadata_scalar!(f32, Float32, Float32, Float32Array);
impl_metadata_scalar!(f64, Float64, Float64, Float64Array);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_sizes() {
        assert_eq!(ComponentType::Int8.num_bytes(), Some(1));
        assert_eq!(ComponentType::Uint32.num_bytes(), Some(4));
        assert_eq!(ComponentType::Float64.num_bytes(), Some(8));
        assert_eq!(ComponentType::Boolean.num_bytes(), None);
        assert_eq!(ComponentType::String.num_bytes(), None);
    }

    #[test]
    fn test_component_names() {
        assert_eq!(ComponentType::Float32.name(), "FLOAT32");
        assert_eq!(ComponentType::from_name("INT64"), Some(ComponentType::Int64));
        assert_eq!(ComponentType::from_name("VEC3"), None);

        // every tag round-trips through its spelling
        for ct in [
            ComponentType::Int8,
            ComponentType::Uint8,
            ComponentType::Int16,
            ComponentType::Uint16,
            ComponentType::Int32,
            ComponentType::Uint32,
            ComponentType::Int64,
            ComponentType::Uint64,
            ComponentType::Float32,
            ComponentType::Float64,
            ComponentType::Boolean,
            ComponentType::String,
        ] {
            assert_eq!(ComponentType::from_name(ct.name()), Some(ct));
        }
    }

    #[test]
    fn test_component_predicates() {
        assert!(ComponentType::Uint16.is_integer());
        assert!(ComponentType::Float64.is_float());
        assert!(!ComponentType::Boolean.is_numeric());
        assert!(!ComponentType::String.is_numeric());
    }

    #[test]
    fn test_offset_type() {
        assert_eq!(OffsetType::default(), OffsetType::Uint32);
        assert_eq!(OffsetType::from_name("UINT16"), Some(OffsetType::Uint16));
        assert_eq!(OffsetType::from_name("INT16"), None);
        assert_eq!(OffsetType::Uint64.num_bytes(), 8);
    }

    #[test]
    fn test_read_le() {
        assert_eq!(u16::read_le(&[0x01, 0x02]), 0x0201);
        assert_eq!(i8::read_le(&[0xFF]), -1);
        assert_eq!(f32::read_le(&1.5f32.to_le_bytes()), 1.5);
        assert_eq!(u64::read_le(&42u64.to_le_bytes()), 42);
    }

    #[test]
    fn test_scalar_tags() {
        assert_eq!(<i8 as MetadataScalar>::COMPONENT_TYPE, ComponentType::Int8);
        assert_eq!(<f64 as MetadataScalar>::COMPONENT_TYPE, ComponentType::Float64);
        assert_eq!(<u32 as MetadataScalar>::SIZE, 4);
    }
}
