//! The metadata value algebra.
//!
//! A [`Value`] is the result of reading one feature-table row through a
//! property view: one of the twelve scalar kinds, an array view of one of
//! them, or `Empty`. Strings and arrays are non-owning; a `Value` is only
//! valid while the document's buffers are alive, which the lifetime
//! parameter enforces.

use crate::util::ComponentType;
use crate::view::{ArrayView, BooleanArrayView, StringArrayView};

/// Tagged union over every representable property element.
///
/// The set is closed: consuming operations match exhaustively, so adding a
/// variant without updating them fails to compile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Value<'a> {
    /// No value (unset accessor result, absent data)
    Empty,
    Int8(i8),
    Uint8(u8),
    Int16(i16),
    Uint16(u16),
    Int32(i32),
    Uint32(u32),
    Int64(i64),
    Uint64(u64),
    Float32(f32),
    Float64(f64),
    Boolean(bool),
    /// Non-owning UTF-8 string slice
    String(&'a str),
    Int8Array(ArrayView<'a, i8>),
    Uint8Array(ArrayView<'a, u8>),
    Int16Array(ArrayView<'a, i16>),
    Uint16Array(ArrayView<'a, u16>),
    Int32Array(ArrayView<'a, i32>),
    Uint32Array(ArrayView<'a, u32>),
    Int64Array(ArrayView<'a, i64>),
    Uint64Array(ArrayView<'a, u64>),
    Float32Array(ArrayView<'a, f32>),
    Float64Array(ArrayView<'a, f64>),
    BooleanArray(BooleanArrayView<'a>),
    StringArray(StringArrayView<'a>),
}

impl<'a> Value<'a> {
    /// Render this value as text.
    ///
    /// Numeric scalars use their canonical decimal form (floats keep a
    /// decimal point: `5.0`, not `5`), booleans render `"true"`/`"false"`,
    /// strings render their contents. Arrays have no single-line text form
    /// in this system, so every array variant - and `Empty` - returns
    /// `default` unchanged.
    pub fn stringify(&self, default: &str) -> String {
        match *self {
            Self::Int8(v) => v.to_string(),
            Self::Uint8(v) => v.to_string(),
            Self::Int16(v) => v.to_string(),
            Self::Uint16(v) => v.to_string(),
            Self::Int32(v) => v.to_string(),
            Self::Uint32(v) => v.to_string(),
            Self::Int64(v) => v.to_string(),
            Self::Uint64(v) => v.to_string(),
            // {:?} is the shortest round-trip form and always keeps ".0"
            Self::Float32(v) => format!("{v:?}"),
            Self::Float64(v) => format!("{v:?}"),
            Self::Boolean(v) => (if v { "true" } else { "false" }).to_string(),
            Self::String(v) => v.to_string(),
            Self::Empty
            | Self::Int8Array(_)
            | Self::Uint8Array(_)
            | Self::Int16Array(_)
            | Self::Uint16Array(_)
            | Self::Int32Array(_)
            | Self::Uint32Array(_)
            | Self::Int64Array(_)
            | Self::Uint64Array(_)
            | Self::Float32Array(_)
            | Self::Float64Array(_)
            | Self::BooleanArray(_)
            | Self::StringArray(_) => default.to_string(),
        }
    }

    /// The component type this value was read as, `None` for `Empty`.
    pub fn component_type(&self) -> Option<ComponentType> {
        match self {
            Self::Empty => None,
            Self::Int8(_) | Self::Int8Array(_) => Some(ComponentType::Int8),
            Self::Uint8(_) | Self::Uint8Array(_) => Some(ComponentType::Uint8),
            Self::Int16(_) | Self::Int16Array(_) => Some(ComponentType::Int16),
            Self::Uint16(_) | Self::Uint16Array(_) => Some(ComponentType::Uint16),
            Self::Int32(_) | Self::Int32Array(_) => Some(ComponentType::Int32),
            Self::Uint32(_) | Self::Uint32Array(_) => Some(ComponentType::Uint32),
            Self::Int64(_) | Self::Int64Array(_) => Some(ComponentType::Int64),
            Self::Uint64(_) | Self::Uint64Array(_) => Some(ComponentType::Uint64),
            Self::Float32(_) | Self::Float32Array(_) => Some(ComponentType::Float32),
            Self::Float64(_) | Self::Float64Array(_) => Some(ComponentType::Float64),
            Self::Boolean(_) | Self::BooleanArray(_) => Some(ComponentType::Boolean),
            Self::String(_) | Self::StringArray(_) => Some(ComponentType::String),
        }
    }

    /// True for every array-tagged variant.
    pub fn is_array(&self) -> bool {
        matches!(
            self,
            Self::Int8Array(_)
                | Self::Uint8Array(_)
                | Self::Int16Array(_)
                | Self::Uint16Array(_)
                | Self::Int32Array(_)
                | Self::Uint32Array(_)
                | Self::Int64Array(_)
                | Self::Uint64Array(_)
                | Self::Float32Array(_)
                | Self::Float64Array(_)
                | Self::BooleanArray(_)
                | Self::StringArray(_)
        )
    }

    /// True for the `Empty` variant.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Widen an integer scalar to `i64`. `None` for everything else and for
    /// `u64` values that do not fit.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Self::Int8(v) => Some(v as i64),
            Self::Uint8(v) => Some(v as i64),
            Self::Int16(v) => Some(v as i64),
            Self::Uint16(v) => Some(v as i64),
            Self::Int32(v) => Some(v as i64),
            Self::Uint32(v) => Some(v as i64),
            Self::Int64(v) => Some(v),
            Self::Uint64(v) => i64::try_from(v).ok(),
            _ => None,
        }
    }

    /// Coerce a numeric scalar to `f64`. `None` for everything else.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Self::Float32(v) => Some(v as f64),
            Self::Float64(v) => Some(v),
            _ => self.as_i64().map(|v| v as f64),
        }
    }
}

impl Default for Value<'_> {
    fn default() -> Self {
        Self::Empty
    }
}
