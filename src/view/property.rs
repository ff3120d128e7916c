//! Property views - zero-copy typed access to feature-table columns.
//!
//! A property view binds one column of a feature table to one member of the
//! value algebra. It holds slices into the document's buffers, validates
//! the declared row count against the backing bytes at construction, and
//! bounds-checks every row access. Reads never allocate or copy.

use std::marker::PhantomData;

use crate::util::{ComponentType, Error, MetadataScalar, Result};
use crate::value::Value;
use crate::view::{ArrayView, BooleanArrayView, OffsetBuffer, StringArrayView};

/// Element-count shape of an array-typed property.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ArrayShape<'a> {
    /// Every row holds exactly this many elements.
    Fixed(usize),
    /// Rows are delimited by an offset table with `count + 1` entries.
    Variable(OffsetBuffer<'a>),
}

/// View over a column of numeric scalars.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScalarPropertyView<'a, T: MetadataScalar> {
    values: &'a [u8],
    count: usize,
    _marker: PhantomData<T>,
}

impl<'a, T: MetadataScalar> ScalarPropertyView<'a, T> {
    /// Create a view over `count` rows of tightly packed scalars.
    pub fn new(values: &'a [u8], count: usize) -> Result<Self> {
        let needed = Error::checked_size(count, T::SIZE)?;
        if values.len() < needed {
            return Err(Error::BufferTooSmall {
                needed,
                actual: values.len(),
            });
        }
        Ok(Self {
            values,
            count,
            _marker: PhantomData,
        })
    }

    /// Number of rows.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Read the row at `index`.
    #[inline]
    pub fn get(&self, index: usize) -> Result<T> {
        Error::check_bounds(index, self.count)?;
        Ok(T::read_le(&self.values[index * T::SIZE..]))
    }

    /// Reinterpret the column as a typed slice, if alignment allows.
    pub fn as_slice(&self) -> Option<&'a [T]> {
        bytemuck::try_cast_slice(&self.values[..self.count * T::SIZE]).ok()
    }
}

/// View over a column of bit-packed booleans, one bit per row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BooleanPropertyView<'a> {
    bits: BooleanArrayView<'a>,
}

impl<'a> BooleanPropertyView<'a> {
    /// Create a view over `count` rows of packed bits.
    pub fn new(values: &'a [u8], count: usize) -> Result<Self> {
        Ok(Self {
            bits: BooleanArrayView::new(values, 0, count)?,
        })
    }

    /// Number of rows.
    #[inline]
    pub fn count(&self) -> usize {
        self.bits.len()
    }

    /// Read the row at `index`.
    #[inline]
    pub fn get(&self, index: usize) -> Result<bool> {
        self.bits.get(index)
    }
}

/// View over a column of UTF-8 strings addressed through an offset table.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StringPropertyView<'a> {
    data: &'a [u8],
    offsets: OffsetBuffer<'a>,
    count: usize,
}

impl<'a> StringPropertyView<'a> {
    /// Create a view over `count` rows; `offsets` must carry `count + 1`
    /// validated entries into `data`.
    pub fn new(data: &'a [u8], offsets: OffsetBuffer<'a>, count: usize) -> Result<Self> {
        if offsets.len() <= count {
            return Err(Error::offsets(format!(
                "string property needs {} offset entries, table has {}",
                count.saturating_add(1),
                offsets.len()
            )));
        }
        Ok(Self {
            data,
            offsets,
            count,
        })
    }

    /// Number of rows.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Read the row at `index`.
    pub fn get(&self, index: usize) -> Result<&'a str> {
        Error::check_bounds(index, self.count)?;
        let range = self.offsets.range(index)?;
        Ok(std::str::from_utf8(&self.data[range])?)
    }
}

/// View over a column of numeric arrays, fixed or variable length.
///
/// Variable-length offsets count elements, not bytes, per the
/// EXT_feature_metadata arrayOffset convention.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArrayPropertyView<'a, T: MetadataScalar> {
    values: &'a [u8],
    count: usize,
    shape: ArrayShape<'a>,
    _marker: PhantomData<T>,
}

impl<'a, T: MetadataScalar> ArrayPropertyView<'a, T> {
    /// Create a view over `count` rows of arrays.
    pub fn new(values: &'a [u8], count: usize, shape: ArrayShape<'a>) -> Result<Self> {
        match shape {
            ArrayShape::Fixed(component_count) => {
                let elements = Error::checked_size(count, component_count)?;
                let needed = Error::checked_size(elements, T::SIZE)?;
                if values.len() < needed {
                    return Err(Error::BufferTooSmall {
                        needed,
                        actual: values.len(),
                    });
                }
            }
            ArrayShape::Variable(offsets) => {
                if offsets.len() <= count {
                    return Err(Error::offsets(format!(
                        "array property needs {} offset entries, table has {}",
                        count.saturating_add(1),
                        offsets.len()
                    )));
                }
            }
        }
        Ok(Self {
            values,
            count,
            shape,
            _marker: PhantomData,
        })
    }

    /// Number of rows.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Read the array at `index`.
    pub fn get(&self, index: usize) -> Result<ArrayView<'a, T>> {
        Error::check_bounds(index, self.count)?;
        let (first, len) = match self.shape {
            ArrayShape::Fixed(cc) => (index * cc, cc),
            ArrayShape::Variable(offsets) => {
                let range = offsets.range(index)?;
                (range.start, range.end - range.start)
            }
        };
        ArrayView::new(&self.values[first * T::SIZE..], len)
    }
}

/// View over a column of boolean arrays; offsets and fixed runs are in bits.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BooleanArrayPropertyView<'a> {
    values: &'a [u8],
    count: usize,
    shape: ArrayShape<'a>,
}

impl<'a> BooleanArrayPropertyView<'a> {
    /// Create a view over `count` rows of bit-packed arrays.
    pub fn new(values: &'a [u8], count: usize, shape: ArrayShape<'a>) -> Result<Self> {
        match shape {
            ArrayShape::Fixed(component_count) => {
                let bits = Error::checked_size(count, component_count)?;
                if bits > values.len().saturating_mul(8) {
                    return Err(Error::BufferTooSmall {
                        needed: bits / 8 + usize::from(bits % 8 != 0),
                        actual: values.len(),
                    });
                }
            }
            ArrayShape::Variable(offsets) => {
                if offsets.len() <= count {
                    return Err(Error::offsets(format!(
                        "boolean array property needs {} offset entries, table has {}",
                        count.saturating_add(1),
                        offsets.len()
                    )));
                }
            }
        }
        Ok(Self {
            values,
            count,
            shape,
        })
    }

    /// Number of rows.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Read the array at `index`.
    pub fn get(&self, index: usize) -> Result<BooleanArrayView<'a>> {
        Error::check_bounds(index, self.count)?;
        let (first, len) = match self.shape {
            ArrayShape::Fixed(cc) => (index * cc, cc),
            ArrayShape::Variable(offsets) => {
                let range = offsets.range(index)?;
                (range.start, range.end - range.start)
            }
        };
        BooleanArrayView::new(self.values, first, len)
    }
}

/// View over a column of string arrays.
///
/// Rows resolve through two tables: array offsets (fixed count or a table
/// indexing into the string offsets) and the shared string offsets into the
/// string data.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StringArrayPropertyView<'a> {
    data: &'a [u8],
    string_offsets: OffsetBuffer<'a>,
    count: usize,
    shape: ArrayShape<'a>,
}

impl<'a> StringArrayPropertyView<'a> {
    /// Create a view over `count` rows of string arrays.
    pub fn new(
        data: &'a [u8],
        string_offsets: OffsetBuffer<'a>,
        count: usize,
        shape: ArrayShape<'a>,
    ) -> Result<Self> {
        match shape {
            ArrayShape::Fixed(component_count) => {
                let strings = Error::checked_size(count, component_count)?;
                if strings > 0 && strings >= string_offsets.len() {
                    return Err(Error::offsets(format!(
                        "fixed string array needs {} string offset entries, table has {}",
                        strings.saturating_add(1),
                        string_offsets.len()
                    )));
                }
            }
            ArrayShape::Variable(offsets) => {
                if offsets.len() <= count {
                    return Err(Error::offsets(format!(
                        "string array property needs {} offset entries, table has {}",
                        count.saturating_add(1),
                        offsets.len()
                    )));
                }
            }
        }
        Ok(Self {
            data,
            string_offsets,
            count,
            shape,
        })
    }

    /// Number of rows.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Read the array at `index`.
    pub fn get(&self, index: usize) -> Result<StringArrayView<'a>> {
        Error::check_bounds(index, self.count)?;
        let (first, len) = match self.shape {
            ArrayShape::Fixed(cc) => (index * cc, cc),
            ArrayShape::Variable(offsets) => {
                let range = offsets.range(index)?;
                (range.start, range.end - range.start)
            }
        };
        StringArrayView::new(self.data, self.string_offsets, first, len)
    }
}

/// A feature-table property with exactly one typed view active.
///
/// This is the closed sum over every property-view instantiation: the
/// twelve scalar kinds and an array flavor of each. Tables store these;
/// reads produce [`Value`]s.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PropertyView<'a> {
    Int8(ScalarPropertyView<'a, i8>),
    Uint8(ScalarPropertyView<'a, u8>),
    Int16(ScalarPropertyView<'a, i16>),
    Uint16(ScalarPropertyView<'a, u16>),
    Int32(ScalarPropertyView<'a, i32>),
    Uint32(ScalarPropertyView<'a, u32>),
    Int64(ScalarPropertyView<'a, i64>),
    Uint64(ScalarPropertyView<'a, u64>),
    Float32(ScalarPropertyView<'a, f32>),
    Float64(ScalarPropertyView<'a, f64>),
    Boolean(BooleanPropertyView<'a>),
    String(StringPropertyView<'a>),
    Int8Array(ArrayPropertyView<'a, i8>),
    Uint8Array(ArrayPropertyView<'a, u8>),
    Int16Array(ArrayPropertyView<'a, i16>),
    Uint16Array(ArrayPropertyView<'a, u16>),
    Int32Array(ArrayPropertyView<'a, i32>),
    Uint32Array(ArrayPropertyView<'a, u32>),
    Int64Array(ArrayPropertyView<'a, i64>),
    Uint64Array(ArrayPropertyView<'a, u64>),
    Float32Array(ArrayPropertyView<'a, f32>),
    Float64Array(ArrayPropertyView<'a, f64>),
    BooleanArray(BooleanArrayPropertyView<'a>),
    StringArray(StringArrayPropertyView<'a>),
}

impl<'a> PropertyView<'a> {
    /// Number of rows in the column.
    pub fn count(&self) -> usize {
        match self {
            Self::Int8(v) => v.count(),
            Self::Uint8(v) => v.count(),
            Self::Int16(v) => v.count(),
            Self::Uint16(v) => v.count(),
            Self::Int32(v) => v.count(),
            Self::Uint32(v) => v.count(),
            Self::Int64(v) => v.count(),
            Self::Uint64(v) => v.count(),
            Self::Float32(v) => v.count(),
            Self::Float64(v) => v.count(),
            Self::Boolean(v) => v.count(),
            Self::String(v) => v.count(),
            Self::Int8Array(v) => v.count(),
            Self::Uint8Array(v) => v.count(),
            Self::Int16Array(v) => v.count(),
            Self::Uint16Array(v) => v.count(),
            Self::Int32Array(v) => v.count(),
            Self::Uint32Array(v) => v.count(),
            Self::Int64Array(v) => v.count(),
            Self::Uint64Array(v) => v.count(),
            Self::Float32Array(v) => v.count(),
            Self::Float64Array(v) => v.count(),
            Self::BooleanArray(v) => v.count(),
            Self::StringArray(v) => v.count(),
        }
    }

    /// The component type of the column's elements.
    pub fn component_type(&self) -> ComponentType {
        match self {
            Self::Int8(_) | Self::Int8Array(_) => ComponentType::Int8,
            Self::Uint8(_) | Self::Uint8Array(_) => ComponentType::Uint8,
            Self::Int16(_) | Self::Int16Array(_) => ComponentType::Int16,
            Self::Uint16(_) | Self::Uint16Array(_) => ComponentType::Uint16,
            Self::Int32(_) | Self::Int32Array(_) => ComponentType::Int32,
            Self::Uint32(_) | Self::Uint32Array(_) => ComponentType::Uint32,
            Self::Int64(_) | Self::Int64Array(_) => ComponentType::Int64,
            Self::Uint64(_) | Self::Uint64Array(_) => ComponentType::Uint64,
            Self::Float32(_) | Self::Float32Array(_) => ComponentType::Float32,
            Self::Float64(_) | Self::Float64Array(_) => ComponentType::Float64,
            Self::Boolean(_) | Self::BooleanArray(_) => ComponentType::Boolean,
            Self::String(_) | Self::StringArray(_) => ComponentType::String,
        }
    }

    /// True if rows are arrays.
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

    /// Read the row at `index` as a [`Value`].
    ///
    /// Fails with [`Error::IndexOutOfBounds`] for `index >= count()`; never
    /// reads past the backing slice.
    pub fn get_value(&self, index: usize) -> Result<Value<'a>> {
        match self {
            Self::Int8(v) => v.get(index).map(MetadataScalar::scalar_value),
            Self::Uint8(v) => v.get(index).map(MetadataScalar::scalar_value),
            Self::Int16(v) => v.get(index).map(MetadataScalar::scalar_value),
            Self::Uint16(v) => v.get(index).map(MetadataScalar::scalar_value),
            Self::Int32(v) => v.get(index).map(MetadataScalar::scalar_value),
            Self::Uint32(v) => v.get(index).map(MetadataScalar::scalar_value),
            Self::Int64(v) => v.get(index).map(MetadataScalar::scalar_value),
            Self::Uint64(v) => v.get(index).map(MetadataScalar::scalar_value),
            Self::Float32(v) => v.get(index).map(MetadataScalar::scalar_value),
            Self::Float64(v) => v.get(index).map(MetadataScalar::scalar_value),
            Self::Boolean(v) => v.get(index).map(Value::Boolean),
            Self::String(v) => v.get(index).map(Value::String),
            Self::Int8Array(v) => v.get(index).map(MetadataScalar::array_value),
            Self::Uint8Array(v) => v.get(index).map(MetadataScalar::array_value),
            Self::Int16Array(v) => v.get(index).map(MetadataScalar::array_value),
            Self::Uint16Array(v) => v.get(index).map(MetadataScalar::array_value),
            Self::Int32Array(v) => v.get(index).map(MetadataScalar::array_value),
            Self::Uint32Array(v) => v.get(index).map(MetadataScalar::array_value),
            Self::Int64Array(v) => v.get(index).map(MetadataScalar::array_value),
            Self::Uint64Array(v) => v.get(index).map(MetadataScalar::array_value),
            Self::Float32Array(v) => v.get(index).map(MetadataScalar::array_value),
            Self::Float64Array(v) => v.get(index).map(MetadataScalar::array_value),
            Self::BooleanArray(v) => v.get(index).map(Value::BooleanArray),
            Self::StringArray(v) => v.get(index).map(Value::StringArray),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::OffsetType;

    fn u32_table(offsets: &[u32]) -> Vec<u8> {
        offsets.iter().flat_map(|o| o.to_le_bytes()).collect()
    }

    #[test]
    fn test_scalar_property() {
        let bytes: Vec<u8> = [1.0f64, -2.5, 3.25].iter().flat_map(|v| v.to_le_bytes()).collect();
        let view = ScalarPropertyView::<f64>::new(&bytes, 3).unwrap();
        assert_eq!(view.count(), 3);
        assert_eq!(view.get(1).unwrap(), -2.5);
        assert!(matches!(
            view.get(3),
            Err(Error::IndexOutOfBounds { index: 3, count: 3 })
        ));
    }

    #[test]
    fn test_scalar_property_undersized() {
        let bytes = [0u8; 11];
        assert!(ScalarPropertyView::<u32>::new(&bytes, 3).is_err());
        assert!(ScalarPropertyView::<u32>::new(&bytes[..8], 2).is_ok());
    }

    #[test]
    fn test_scalar_property_count_overflow() {
        // byte math on hostile counts must fail validation, not wrap
        let bytes = [0u8; 8];
        let huge = usize::MAX / 2;
        assert!(matches!(
            ScalarPropertyView::<f64>::new(&bytes, huge),
            Err(Error::SizeOverflow { .. })
        ));
        assert!(matches!(
            ArrayPropertyView::<u16>::new(&bytes, huge, ArrayShape::Fixed(4)),
            Err(Error::SizeOverflow { .. })
        ));
        assert!(matches!(
            BooleanArrayPropertyView::new(&bytes, huge, ArrayShape::Fixed(16)),
            Err(Error::SizeOverflow { .. })
        ));
    }

    #[test]
    fn test_boolean_property() {
        let bytes = [0b0000_0101u8];
        let view = BooleanPropertyView::new(&bytes, 3).unwrap();
        assert_eq!(view.get(0).unwrap(), true);
        assert_eq!(view.get(1).unwrap(), false);
        assert_eq!(view.get(2).unwrap(), true);
        assert!(view.get(3).is_err());
    }

    #[test]
    fn test_string_property() {
        let data = b"hithere";
        let table = u32_table(&[0, 2, 7]);
        let offsets = OffsetBuffer::new(&table, OffsetType::Uint32, 3, data.len()).unwrap();
        let view = StringPropertyView::new(data, offsets, 2).unwrap();
        assert_eq!(view.get(0).unwrap(), "hi");
        assert_eq!(view.get(1).unwrap(), "there");
        assert!(view.get(2).is_err());
    }

    #[test]
    fn test_fixed_array_property() {
        let bytes: Vec<u8> = [1u16, 2, 3, 4, 5, 6].iter().flat_map(|v| v.to_le_bytes()).collect();
        let view = ArrayPropertyView::<u16>::new(&bytes, 2, ArrayShape::Fixed(3)).unwrap();
        let row = view.get(1).unwrap();
        assert_eq!(row.iter().collect::<Vec<_>>(), vec![4, 5, 6]);
        assert!(view.get(2).is_err());
    }

    #[test]
    fn test_variable_array_property() {
        let bytes: Vec<u8> = [10i32, 20, 30, 40, 50].iter().flat_map(|v| v.to_le_bytes()).collect();
        let table = u32_table(&[0, 2, 2, 5]);
        let offsets = OffsetBuffer::new(&table, OffsetType::Uint32, 4, 5).unwrap();
        let view =
            ArrayPropertyView::<i32>::new(&bytes, 3, ArrayShape::Variable(offsets)).unwrap();

        assert_eq!(view.get(0).unwrap().iter().collect::<Vec<_>>(), vec![10, 20]);
        assert!(view.get(1).unwrap().is_empty());
        assert_eq!(view.get(2).unwrap().iter().collect::<Vec<_>>(), vec![30, 40, 50]);
    }

    #[test]
    fn test_boolean_array_property_fixed() {
        // two rows of three bits each, packed back to back
        let bytes = [0b0010_1101u8];
        let view = BooleanArrayPropertyView::new(&bytes, 2, ArrayShape::Fixed(3)).unwrap();
        let row0: Vec<bool> = view.get(0).unwrap().iter().collect();
        let row1: Vec<bool> = view.get(1).unwrap().iter().collect();
        assert_eq!(row0, vec![true, false, true]);
        assert_eq!(row1, vec![true, false, true]);
    }

    #[test]
    fn test_string_array_property_variable() {
        let data = b"abcdef";
        let str_table = u32_table(&[0, 1, 3, 6]);
        let string_offsets =
            OffsetBuffer::new(&str_table, OffsetType::Uint32, 4, data.len()).unwrap();
        // row 0 -> strings 0..2, row 1 -> strings 2..3
        let arr_table = u32_table(&[0, 2, 3]);
        let array_offsets = OffsetBuffer::new(&arr_table, OffsetType::Uint32, 3, 3).unwrap();

        let view = StringArrayPropertyView::new(
            data,
            string_offsets,
            2,
            ArrayShape::Variable(array_offsets),
        )
        .unwrap();

        let row0 = view.get(0).unwrap();
        assert_eq!(row0.len(), 2);
        assert_eq!(row0.get(0).unwrap(), "a");
        assert_eq!(row0.get(1).unwrap(), "bc");
        let row1 = view.get(1).unwrap();
        assert_eq!(row1.get(0).unwrap(), "def");
    }

    #[test]
    fn test_property_view_enum_dispatch() {
        let bytes: Vec<u8> = [7u32, 8, 9].iter().flat_map(|v| v.to_le_bytes()).collect();
        let view = PropertyView::Uint32(ScalarPropertyView::new(&bytes, 3).unwrap());

        assert_eq!(view.count(), 3);
        assert_eq!(view.component_type(), ComponentType::Uint32);
        assert!(!view.is_array());
        assert_eq!(view.get_value(2).unwrap(), Value::Uint32(9));
        assert!(matches!(
            view.get_value(5),
            Err(Error::IndexOutOfBounds { index: 5, count: 3 })
        ));
    }

    #[test]
    fn test_property_view_value_tag_matches() {
        let bytes = [0x2Au8];
        let view = PropertyView::Int8(ScalarPropertyView::new(&bytes, 1).unwrap());
        let value = view.get_value(0).unwrap();
        assert_eq!(value.component_type(), Some(view.component_type()));
        assert_eq!(value, Value::Int8(42));
    }
}
