//! Non-owning array views - the array payloads carried inside [`Value`].
//!
//! An array view is a window onto one array-typed property element. It
//! never copies buffer bytes; it is a slice plus decoding rules, valid for
//! as long as the document's buffers are.
//!
//! [`Value`]: crate::value::Value

use std::marker::PhantomData;

use crate::util::{Error, MetadataScalar, Result};
use crate::view::OffsetBuffer;

/// Zero-copy view over a run of little-endian scalars.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArrayView<'a, T: MetadataScalar> {
    bytes: &'a [u8],
    len: usize,
    _marker: PhantomData<T>,
}

impl<'a, T: MetadataScalar> ArrayView<'a, T> {
    /// Create a view over `len` scalars starting at `bytes[0]`.
    pub fn new(bytes: &'a [u8], len: usize) -> Result<Self> {
        let needed = Error::checked_size(len, T::SIZE)?;
        if bytes.len() < needed {
            return Err(Error::BufferTooSmall {
                needed,
                actual: bytes.len(),
            });
        }
        Ok(Self {
            bytes,
            len,
            _marker: PhantomData,
        })
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if the array has no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Read the element at `index`.
    #[inline]
    pub fn get(&self, index: usize) -> Result<T> {
        Error::check_bounds(index, self.len)?;
        Ok(T::read_le(&self.bytes[index * T::SIZE..]))
    }

    /// Iterate over all elements.
    pub fn iter(&self) -> impl Iterator<Item = T> + 'a {
        let bytes = self.bytes;
        (0..self.len).map(move |i| T::read_le(&bytes[i * T::SIZE..]))
    }

    /// Reinterpret the backing bytes as a typed slice, if alignment allows.
    ///
    /// glTF buffers give no alignment guarantee, so this can fail for
    /// multi-byte types; `get`/`iter` always work.
    pub fn as_slice(&self) -> Option<&'a [T]> {
        bytemuck::try_cast_slice(&self.bytes[..self.len * T::SIZE]).ok()
    }
}

/// Zero-copy view over a run of bit-packed booleans.
///
/// Fixed-size boolean arrays are packed back to back, so an element can
/// start at any bit of a byte; `bit_offset` carries that phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BooleanArrayView<'a> {
    bytes: &'a [u8],
    bit_offset: usize,
    len: usize,
}

impl<'a> BooleanArrayView<'a> {
    /// Create a view over `len` bits starting `bit_offset` bits into `bytes`.
    pub fn new(bytes: &'a [u8], bit_offset: usize, len: usize) -> Result<Self> {
        let needed = bit_offset
            .checked_add(len)
            .ok_or(Error::SizeOverflow {
                count: len,
                elem_size: 1,
            })?;
        if needed > bytes.len().saturating_mul(8) {
            return Err(Error::BufferTooSmall {
                needed: needed / 8 + usize::from(needed % 8 != 0),
                actual: bytes.len(),
            });
        }
        Ok(Self {
            bytes,
            bit_offset,
            len,
        })
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if the array has no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Read the element at `index`.
    #[inline]
    pub fn get(&self, index: usize) -> Result<bool> {
        Error::check_bounds(index, self.len)?;
        let bit = self.bit_offset + index;
        Ok((self.bytes[bit / 8] >> (bit % 8)) & 1 == 1)
    }

    /// Iterate over all elements.
    pub fn iter(&self) -> impl Iterator<Item = bool> + 'a {
        let bytes = self.bytes;
        let bit_offset = self.bit_offset;
        (0..self.len).map(move |i| {
            let bit = bit_offset + i;
            (bytes[bit / 8] >> (bit % 8)) & 1 == 1
        })
    }
}

/// Zero-copy view over a run of offset-addressed UTF-8 strings.
///
/// `first` is the index of the run's first string in the shared string
/// offset table; element `j` resolves through entry `first + j`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StringArrayView<'a> {
    data: &'a [u8],
    offsets: OffsetBuffer<'a>,
    first: usize,
    len: usize,
}

impl<'a> StringArrayView<'a> {
    /// Create a view over `len` strings starting at offset entry `first`.
    pub fn new(
        data: &'a [u8],
        offsets: OffsetBuffer<'a>,
        first: usize,
        len: usize,
    ) -> Result<Self> {
        // offsets must delimit every element, including the end of the last
        let last = first
            .checked_add(len)
            .ok_or(Error::SizeOverflow {
                count: len,
                elem_size: 1,
            })?;
        if last >= offsets.len() {
            return Err(Error::offsets(format!(
                "string array needs offset entries {first}..={last}, table has {}",
                offsets.len()
            )));
        }
        Ok(Self {
            data,
            offsets,
            first,
            len,
        })
    }

    /// Number of strings.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if the array has no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Read the string at `index`.
    pub fn get(&self, index: usize) -> Result<&'a str> {
        Error::check_bounds(index, self.len)?;
        let range = self.offsets.range(self.first + index)?;
        Ok(std::str::from_utf8(&self.data[range])?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::OffsetType;

    #[test]
    fn test_array_view() {
        let bytes: Vec<u8> = [10i32, -20, 30].iter().flat_map(|v| v.to_le_bytes()).collect();
        let view = ArrayView::<i32>::new(&bytes, 3).unwrap();
        assert_eq!(view.len(), 3);
        assert_eq!(view.get(1).unwrap(), -20);
        assert_eq!(view.iter().collect::<Vec<_>>(), vec![10, -20, 30]);
        assert!(view.get(3).is_err());
    }

    #[test]
    fn test_array_view_too_small() {
        let bytes = [0u8; 7];
        assert!(matches!(
            ArrayView::<f64>::new(&bytes, 1),
            Err(Error::BufferTooSmall { needed: 8, actual: 7 })
        ));
    }

    #[test]
    fn test_array_view_len_overflow() {
        let bytes = [0u8; 8];
        assert!(matches!(
            ArrayView::<u64>::new(&bytes, usize::MAX / 4),
            Err(Error::SizeOverflow { .. })
        ));
        assert!(matches!(
            BooleanArrayView::new(&bytes, usize::MAX, 2),
            Err(Error::SizeOverflow { .. })
        ));
    }

    #[test]
    fn test_boolean_array_unaligned() {
        // bits: 1,0,1,1,0,0,1,0 | 1,1,...
        let bytes = [0b0100_1101u8, 0b0000_0011];
        let view = BooleanArrayView::new(&bytes, 3, 6).unwrap();
        let bits: Vec<bool> = view.iter().collect();
        assert_eq!(bits, vec![true, false, false, true, false, true]);
        assert_eq!(view.get(3).unwrap(), true);
        assert!(view.get(6).is_err());
    }

    #[test]
    fn test_boolean_array_too_small() {
        let bytes = [0u8; 1];
        assert!(BooleanArrayView::new(&bytes, 4, 5).is_err());
        assert!(BooleanArrayView::new(&bytes, 4, 4).is_ok());
    }

    #[test]
    fn test_string_array_view() {
        let data = b"redgreenblue";
        let table: Vec<u8> = [0u32, 3, 8, 12].iter().flat_map(|o| o.to_le_bytes()).collect();
        let offsets = OffsetBuffer::new(&table, OffsetType::Uint32, 4, data.len()).unwrap();

        let view = StringArrayView::new(data, offsets, 0, 3).unwrap();
        assert_eq!(view.get(0).unwrap(), "red");
        assert_eq!(view.get(1).unwrap(), "green");
        assert_eq!(view.get(2).unwrap(), "blue");
        assert!(view.get(3).is_err());

        // a sub-run starting mid-table
        let tail = StringArrayView::new(data, offsets, 1, 2).unwrap();
        assert_eq!(tail.get(0).unwrap(), "green");

        // run extending past the table is rejected at construction
        assert!(StringArrayView::new(data, offsets, 2, 2).is_err());
    }

    #[test]
    fn test_string_array_invalid_utf8() {
        let data = &[0xFF, 0xFE][..];
        let table: Vec<u8> = [0u32, 2].iter().flat_map(|o| o.to_le_bytes()).collect();
        let offsets = OffsetBuffer::new(&table, OffsetType::Uint32, 2, 2).unwrap();
        let view = StringArrayView::new(data, offsets, 0, 1).unwrap();
        assert!(matches!(view.get(0), Err(Error::InvalidString(_))));
    }
}
