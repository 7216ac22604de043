use arrow::error::Result;

use crate::encodings::{IntegerEncoding, RunLengthIntegerReader};
use crate::position::PositionProvider;
use crate::read::reader::{take_stream, LazyReader, ValueDecoder};
use crate::read::{InStream, StripeStreams};
use crate::{ColumnEncoding, StreamKind};

pub type LongDirectReader = LazyReader<LongDirectDecoder>;

/// DATA holds the values as signed varint runs.
pub struct LongDirectDecoder {
    data: RunLengthIntegerReader<InStream>,
}

impl ValueDecoder for LongDirectDecoder {
    type Value = i64;

    fn open(column_id: u32, _: &ColumnEncoding, streams: &mut StripeStreams) -> Result<Self> {
        let data = take_stream(streams, column_id, StreamKind::Data)?;
        Ok(Self {
            data: RunLengthIntegerReader::new(data, IntegerEncoding::signed_vint()),
        })
    }

    fn position_count(&self) -> usize {
        self.data.position_count()
    }

    fn seek(&mut self, index: &mut dyn PositionProvider) -> Result<()> {
        self.data.seek(index)
    }

    fn next(&mut self) -> Result<i64> {
        self.data.next()
    }

    fn skip(&mut self, n: u64) -> Result<()> {
        self.data.skip(n)
    }
}
