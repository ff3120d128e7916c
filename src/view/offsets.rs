//! Offset tables for variable-length property data.
//!
//! Variable-length arrays and strings store their element boundaries in a
//! separate buffer view of `entries` little-endian unsigned integers; entry
//! `i` and `i + 1` delimit element `i` in the data buffer.

use byteorder::{ByteOrder, LittleEndian};

use crate::util::{Error, OffsetType, Result};

/// Zero-copy view over an offset table.
///
/// Construction validates the whole table: enough bytes for `entries`
/// offsets, monotonically non-decreasing values, and a final offset bounded
/// by the length of the data buffer the offsets point into. After that,
/// `get` only has to bounds-check the entry index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OffsetBuffer<'a> {
    bytes: &'a [u8],
    offset_type: OffsetType,
    entries: usize,
}

impl<'a> OffsetBuffer<'a> {
    /// Create and validate an offset table.
    ///
    /// `entries` is the number of offsets (element count + 1); `data_len`
    /// is the length of the buffer the offsets index into.
    pub fn new(
        bytes: &'a [u8],
        offset_type: OffsetType,
        entries: usize,
        data_len: usize,
    ) -> Result<Self> {
        let needed = Error::checked_size(entries, offset_type.num_bytes())?;
        if bytes.len() < needed {
            return Err(Error::BufferTooSmall {
                needed,
                actual: bytes.len(),
            });
        }
        let table = Self {
            bytes,
            offset_type,
            entries,
        };

        let mut prev = 0u64;
        for i in 0..entries {
            let off = table.raw(i);
            if off < prev {
                return Err(Error::offsets(format!(
                    "offset {off} at entry {i} is smaller than predecessor {prev}"
                )));
            }
            if off > data_len as u64 {
                return Err(Error::offsets(format!(
                    "offset {off} at entry {i} exceeds data length {data_len}"
                )));
            }
            prev = off;
        }
        Ok(table)
    }

    /// Number of offset entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries
    }

    /// True if the table has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    /// Read the offset at `index`.
    #[inline]
    pub fn get(&self, index: usize) -> Result<usize> {
        Error::check_bounds(index, self.entries)?;
        Ok(self.raw(index) as usize)
    }

    /// The byte range `[get(index), get(index + 1))` for element `index`.
    #[inline]
    pub fn range(&self, index: usize) -> Result<std::ops::Range<usize>> {
        Ok(self.get(index)?..self.get(index + 1)?)
    }

    #[inline]
    fn raw(&self, index: usize) -> u64 {
        let at = index * self.offset_type.num_bytes();
        match self.offset_type {
            OffsetType::Uint8 => self.bytes[at] as u64,
            OffsetType::Uint16 => LittleEndian::read_u16(&self.bytes[at..]) as u64,
            OffsetType::Uint32 => LittleEndian::read_u32(&self.bytes[at..]) as u64,
            OffsetType::Uint64 => LittleEndian::read_u64(&self.bytes[at..]),
        }
    }
}
