//! Feature-ID accessors.
//!
//! A feature-ID accessor maps a vertex (or point/element) index to the row
//! of a feature table. It is resolved from a glTF accessor over one of the
//! component types the format allows for feature IDs: i8, u8, i16, u16,
//! u32, or f32 (float IDs hold whole numbers and truncate toward zero).

use std::marker::PhantomData;

use crate::document::{Accessor, Document};
use crate::util::{Error, MetadataScalar, Result};

/// Strided, bounds-checked view over one glTF scalar accessor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AccessorView<'a, T: MetadataScalar> {
    bytes: &'a [u8],
    stride: usize,
    count: usize,
    _marker: PhantomData<T>,
}

impl<'a, T: MetadataScalar> AccessorView<'a, T> {
    /// Create a view over `count` scalars spaced `stride` bytes apart.
    pub fn new(bytes: &'a [u8], stride: usize, count: usize) -> Result<Self> {
        if stride < T::SIZE {
            return Err(Error::other(format!(
                "accessor stride {stride} smaller than element size {}",
                T::SIZE
            )));
        }
        if count > 0 {
            let needed = Error::checked_size(count - 1, stride)?
                .checked_add(T::SIZE)
                .ok_or(Error::SizeOverflow {
                    count,
                    elem_size: stride,
                })?;
            if bytes.len() < needed {
                return Err(Error::BufferTooSmall {
                    needed,
                    actual: bytes.len(),
                });
            }
        }
        Ok(Self {
            bytes,
            stride,
            count,
            _marker: PhantomData,
        })
    }

    /// Number of elements.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Read the element at `index`.
    #[inline]
    pub fn get(&self, index: usize) -> Result<T> {
        Error::check_bounds(index, self.count)?;
        Ok(T::read_le(&self.bytes[index * self.stride..]))
    }
}

/// A resolved per-vertex feature-ID source, one component type active.
///
/// `Empty` marks the absent state; it must be checked before dereferencing
/// and answers `get` with [`Error::EmptyAccessor`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum FeatureIdAccessor<'a> {
    #[default]
    Empty,
    Int8(AccessorView<'a, i8>),
    Uint8(AccessorView<'a, u8>),
    Int16(AccessorView<'a, i16>),
    Uint16(AccessorView<'a, u16>),
    Uint32(AccessorView<'a, u32>),
    Float32(AccessorView<'a, f32>),
}

impl<'a> FeatureIdAccessor<'a> {
    /// Resolve a glTF accessor into a feature-ID accessor, dispatching on
    /// its component type.
    pub fn from_document(document: &'a Document, accessor_index: usize) -> Result<Self> {
        let accessor = document
            .accessors
            .get(accessor_index)
            .ok_or(Error::MissingAccessor(accessor_index))?;
        if accessor.kind != "SCALAR" {
            return Err(Error::UnsupportedType(format!(
                "feature ID accessor type {}",
                accessor.kind
            )));
        }
        let view_index = accessor
            .buffer_view
            .ok_or(Error::MissingAccessor(accessor_index))?;
        let view = document
            .buffer_views
            .get(view_index)
            .ok_or(Error::MissingBufferView(view_index))?;
        let data = document
            .buffer_view_data(view_index)
            .ok_or(Error::MissingBufferView(view_index))?;
        let data = data
            .get(accessor.byte_offset..)
            .ok_or(Error::MissingAccessor(accessor_index))?;
        let stride = view.byte_stride;
        let count = accessor.count;

        fn typed<'a, T: MetadataScalar>(
            data: &'a [u8],
            stride: Option<usize>,
            count: usize,
        ) -> Result<AccessorView<'a, T>> {
            AccessorView::new(data, stride.unwrap_or(T::SIZE), count)
        }

        match accessor.component_type {
            Accessor::BYTE => Ok(Self::Int8(typed(data, stride, count)?)),
            Accessor::UNSIGNED_BYTE => Ok(Self::Uint8(typed(data, stride, count)?)),
            Accessor::SHORT => Ok(Self::Int16(typed(data, stride, count)?)),
            Accessor::UNSIGNED_SHORT => Ok(Self::Uint16(typed(data, stride, count)?)),
            Accessor::UNSIGNED_INT => Ok(Self::Uint32(typed(data, stride, count)?)),
            Accessor::FLOAT => Ok(Self::Float32(typed(data, stride, count)?)),
            other => Err(Error::UnsupportedType(format!(
                "feature ID accessor componentType {other}"
            ))),
        }
    }

    /// Number of elements; zero for `Empty`.
    pub fn count(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::Int8(v) => v.count(),
            Self::Uint8(v) => v.count(),
            Self::Int16(v) => v.count(),
            Self::Uint16(v) => v.count(),
            Self::Uint32(v) => v.count(),
            Self::Float32(v) => v.count(),
        }
    }

    /// True for the absent state.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Feature-table row index for vertex/element `index`.
    ///
    /// Integer widths widen to `i64`; float IDs truncate toward zero.
    pub fn get(&self, index: usize) -> Result<i64> {
        match self {
            Self::Empty => Err(Error::EmptyAccessor),
            Self::Int8(v) => Ok(v.get(index)? as i64),
            Self::Uint8(v) => Ok(v.get(index)? as i64),
            Self::Int16(v) => Ok(v.get(index)? as i64),
            Self::Uint16(v) => Ok(v.get(index)? as i64),
            Self::Uint32(v) => Ok(v.get(index)? as i64),
            Self::Float32(v) => Ok(v.get(index)? as i64),
        }
    }
}
