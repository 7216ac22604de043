use arrow::error::Result;

use crate::encodings::{IntegerEncoding, RunLengthIntegerWriter};
use crate::{ColumnEncoding, StreamKind};

use super::common::{ColumnWriterBase, StripeColumn, WriteOptions};
use super::OutStream;

/// Writes an integer column with direct encoding: signed varint runs in DATA.
pub struct LongColumnWriter {
    base: ColumnWriterBase,
    data: RunLengthIntegerWriter<OutStream<Vec<u8>>>,
}

impl LongColumnWriter {
    pub fn new(options: WriteOptions) -> Self {
        Self {
            base: ColumnWriterBase::new(options),
            data: options.rle_stream(IntegerEncoding::signed_vint()),
        }
    }

    pub fn write(&mut self, value: Option<i64>) -> Result<()> {
        self.base.write_row(value.is_some(), &[&self.data])?;
        if let Some(value) = value {
            self.data.write(value)?;
        }
        Ok(())
    }

    pub fn finish(self) -> Result<StripeColumn> {
        let data = self.data.into_inner()?.into_inner()?;
        self.base
            .finish(ColumnEncoding::direct(), vec![(StreamKind::Data, data)])
    }
}
