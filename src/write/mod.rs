//! APIs to write the streams of a stripe column.
pub(crate) mod common;
mod primitive;
mod stream;
mod utf8;

pub use common::{StripeColumn, WriteOptions};
pub use primitive::LongColumnWriter;
pub use stream::{OutStream, PositionedWrite};
pub use utf8::StringColumnWriter;
