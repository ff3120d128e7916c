//! Zero-copy views over document buffer data.
//!
//! Everything in this module borrows from the parsed document's binary
//! buffers; nothing owns or copies payload bytes.

pub mod array;
pub mod offsets;
pub mod property;

pub use array::{ArrayView, BooleanArrayView, StringArrayView};
pub use offsets::OffsetBuffer;
pub use property::{
    ArrayPropertyView, ArrayShape, BooleanArrayPropertyView, BooleanPropertyView, PropertyView,
    ScalarPropertyView, StringArrayPropertyView, StringPropertyView,
};
