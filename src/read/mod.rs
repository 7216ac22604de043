//! APIs to read the streams of a stripe column.
//!
//! A column reader owns the [`InStream`]s of its column for the duration of a
//! stripe. [`EncodingDispatchReader`](dispatch::EncodingDispatchReader) picks the
//! decoder matching the column's encoding at every stripe start and forwards the
//! rest of the [`ColumnReader`] contract to it.

mod array;
pub mod dispatch;
pub mod reader;
mod stream;

use ahash::RandomState;
use hashbrown::HashMap;

use crate::{Compression, StreamName};

pub use array::{
    LongDirectDecoder, LongDirectReader, StringDictionaryDecoder, StringDictionaryReader,
    StringDirectDecoder, StringDirectReader,
};
pub use dispatch::{
    EncodingDispatchReader, LongColumnReader, LongReaderVariant, ReaderVariant,
    StringColumnReader, StringReaderVariant,
};
pub use reader::{ArrowValue, ColumnReader, LazyReader, ValueDecoder};
pub use stream::InStream;

/// The streams of one stripe, readers take the ones of their column.
pub type StripeStreams = HashMap<StreamName, InStream, RandomState>;

/// Options declaring how the streams of a stripe were written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadOptions {
    pub compression: Compression,
    /// Upper bound of the uncompressed size of a chunk.
    pub buffer_size: usize,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            compression: Compression::None,
            buffer_size: 256 * 1024,
        }
    }
}
