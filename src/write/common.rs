use arrow::error::Result;
use bytes::Bytes;

use crate::encodings::{IntegerEncoding, RunLengthIntegerWriter};
use crate::position::RecordPosition;
use crate::read::{InStream, ReadOptions, StripeStreams};
use crate::{ColumnEncoding, Compression, RowIndex, RowIndexEntry, StreamKind, StreamName};

use super::OutStream;

/// Options declaring the behaviour of writing a stripe column
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WriteOptions {
    /// Whether the stream chunks should be compressed and which codec to use.
    pub compression: Compression,
    /// Uncompressed size of a compression chunk.
    pub buffer_size: usize,
    /// Rows per row group, 0 disables the row index.
    pub row_index_stride: usize,
    /// String columns use a dictionary when distinct / non-null values is at most this ratio.
    pub dictionary_key_size_threshold: f64,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            compression: Compression::None,
            buffer_size: 256 * 1024,
            row_index_stride: 10_000,
            dictionary_key_size_threshold: 0.8,
        }
    }
}

impl WriteOptions {
    pub fn read_options(&self) -> ReadOptions {
        ReadOptions {
            compression: self.compression,
            buffer_size: self.buffer_size,
        }
    }

    pub(crate) fn out_stream(&self) -> OutStream<Vec<u8>> {
        OutStream::new(vec![], self.compression, self.buffer_size)
    }

    pub(crate) fn rle_stream(
        &self,
        encoding: IntegerEncoding,
    ) -> RunLengthIntegerWriter<OutStream<Vec<u8>>> {
        RunLengthIntegerWriter::new(self.out_stream(), encoding)
    }
}

/// Everything one column wrote for one stripe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StripeColumn {
    pub encoding: ColumnEncoding,
    pub streams: Vec<(StreamKind, Vec<u8>)>,
    pub index: RowIndex,
    pub num_rows: u64,
}

impl StripeColumn {
    pub fn stream(&self, kind: StreamKind) -> Option<&[u8]> {
        self.streams
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, bytes)| bytes.as_slice())
    }

    /// Registers a copy of every stream under `column`.
    pub fn add_streams(&self, column: u32, options: &ReadOptions, streams: &mut StripeStreams) {
        for (kind, bytes) in &self.streams {
            streams.insert(
                StreamName::new(column, *kind),
                InStream::new(Bytes::copy_from_slice(bytes), options),
            );
        }
    }
}

/// Presence and row index bookkeeping shared by the column writers.
pub(crate) struct ColumnWriterBase {
    options: WriteOptions,
    present: RunLengthIntegerWriter<OutStream<Vec<u8>>>,
    has_null: bool,
    rows_in_group: usize,
    num_rows: u64,
    index: Vec<RowIndexEntry>,
}

impl ColumnWriterBase {
    pub fn new(options: WriteOptions) -> Self {
        Self {
            options,
            present: options.rle_stream(IntegerEncoding::presence()),
            has_null: false,
            rows_in_group: 0,
            num_rows: 0,
            index: vec![],
        }
    }

    /// Records the presence of the next row. `streams` are bookmarked, after the
    /// presence stream, whenever the row starts a row group.
    pub fn write_row(&mut self, present: bool, streams: &[&dyn RecordPosition]) -> Result<()> {
        let stride = self.options.row_index_stride;
        if stride > 0 {
            if self.rows_in_group == 0 {
                let mut entry = RowIndexEntry::default();
                self.present.record_position(&mut entry);
                for stream in streams {
                    stream.record_position(&mut entry);
                }
                self.index.push(entry);
            }
            self.rows_in_group = (self.rows_in_group + 1) % stride;
        }
        self.present.write(present as i64)?;
        self.has_null |= !present;
        self.num_rows += 1;
        Ok(())
    }

    /// Drops the presence stream, and its bookmark positions, when nothing was null.
    pub fn finish(
        self,
        encoding: ColumnEncoding,
        data_streams: Vec<(StreamKind, Vec<u8>)>,
    ) -> Result<StripeColumn> {
        let present_positions = if self.options.compression.is_none() {
            2
        } else {
            3
        };
        let mut index = self.index;
        let mut streams = Vec::with_capacity(data_streams.len() + 1);
        if self.has_null {
            let present = self.present.into_inner()?.into_inner()?;
            streams.push((StreamKind::Present, present));
        } else {
            for entry in index.iter_mut() {
                entry.positions.drain(..present_positions);
            }
        }
        streams.extend(data_streams);

        Ok(StripeColumn {
            encoding,
            streams,
            index: RowIndex::new(index),
            num_rows: self.num_rows,
        })
    }
}
