//! Error types for the feature-metadata library.

use thiserror::Error;

/// Main error type for feature-metadata operations.
///
/// Two families live here. Access errors (`IndexOutOfBounds`,
/// `EmptyAccessor`, `InvalidString`) indicate a caller bug and surface from
/// the query API. Structural errors are produced while building views from
/// a document; the loader logs and skips the offending entry instead of
/// propagating them.
#[derive(Error, Debug)]
pub enum Error {
    /// Row or element index outside a view's bounds
    #[error("Index {index} out of bounds (count: {count})")]
    IndexOutOfBounds { index: usize, count: usize },

    /// Dereference of a feature-ID accessor in its empty state
    #[error("Feature ID accessor is empty")]
    EmptyAccessor,

    /// String property data is not valid UTF-8
    #[error("Invalid UTF-8 in string property: {0}")]
    InvalidString(#[from] std::str::Utf8Error),

    /// Referenced buffer view does not exist or lies outside its buffer
    #[error("Buffer view {0} missing or out of range")]
    MissingBufferView(usize),

    /// Referenced accessor does not exist or cannot be resolved
    #[error("Accessor {0} missing or unresolvable")]
    MissingAccessor(usize),

    /// Declared property or accessor type is not recognized
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// Offset table is truncated, decreasing, or points past the data
    #[error("Invalid offset table: {0}")]
    InvalidOffsets(String),

    /// Backing buffer view is too small for the declared element count
    #[error("Buffer too small: need {needed} bytes, have {actual}")]
    BufferTooSmall { needed: usize, actual: usize },

    /// Declared counts multiply out past the address space
    #[error("Declared size overflows: {count} elements of {elem_size} bytes")]
    SizeOverflow { count: usize, elem_size: usize },

    /// Feature table references a schema class that does not exist
    #[error("Schema class not found: {0}")]
    MissingSchema(String),

    /// JSON parsing error while building a document
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an "other" error from a string.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Create an invalid-offsets error.
    pub fn offsets(msg: impl Into<String>) -> Self {
        Self::InvalidOffsets(msg.into())
    }

    /// Bounds-check helper shared by every view type.
    #[inline]
    pub(crate) fn check_bounds(index: usize, count: usize) -> Result<()> {
        if index < count {
            Ok(())
        } else {
            Err(Self::IndexOutOfBounds { index, count })
        }
    }

    /// Byte (or bit) size of `count` elements of `elem_size` units each.
    ///
    /// Counts come straight out of untrusted documents, so the
    /// multiplication must not wrap; a document declaring 2^61 rows has to
    /// fail validation, not arithmetic.
    #[inline]
    pub(crate) fn checked_size(count: usize, elem_size: usize) -> Result<usize> {
        count
            .checked_mul(elem_size)
            .ok_or(Self::SizeOverflow { count, elem_size })
    }
}

/// Result type alias for feature-metadata operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = Error::IndexOutOfBounds { index: 5, count: 3 };
        assert!(e.to_string().contains("5"));
        assert!(e.to_string().contains("3"));

        let e = Error::MissingBufferView(7);
        assert!(e.to_string().contains("7"));
    }

    #[test]
    fn test_checked_size() {
        assert_eq!(Error::checked_size(3, 8).unwrap(), 24);
        assert_eq!(Error::checked_size(0, 8).unwrap(), 0);
        assert!(matches!(
            Error::checked_size(usize::MAX / 4, 8),
            Err(Error::SizeOverflow { .. })
        ));
    }

    #[test]
    fn test_check_bounds() {
        assert!(Error::check_bounds(2, 3).is_ok());
        assert!(matches!(
            Error::check_bounds(3, 3),
            Err(Error::IndexOutOfBounds { index: 3, count: 3 })
        ));
        assert!(Error::check_bounds(0, 0).is_err());
    }
}
