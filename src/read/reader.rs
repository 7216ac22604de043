// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use arrow::array::{Array, MutableArray, MutablePrimitiveArray, MutableUtf8Array};
use arrow::error::Result;

use crate::encodings::{IntegerEncoding, RunLengthIntegerReader};
use crate::position::{PositionCursor, PositionProvider};
use crate::{ColumnEncoding, RowIndex, RowIndexEntry, StreamKind, StreamName};

use super::{InStream, StripeStreams};

/// Navigation and materialization of one column, one stripe at a time.
///
/// Row numbers are absolute: they include the `row_base_in_stripe` given to
/// [`start_stripe`](ColumnReader::start_stripe).
pub trait ColumnReader {
    type Value;

    /// Takes the streams of the column out of `streams` and loads its row index.
    fn start_stripe(
        &mut self,
        streams: &mut StripeStreams,
        encodings: &[ColumnEncoding],
        indexes: &[RowIndex],
        row_base_in_stripe: u64,
    ) -> Result<()>;

    /// Positions every stream at the start of `row_group`.
    fn seek(&mut self, row_group: usize) -> Result<()>;

    /// Keeps, for every row group, the positions from `start_index` this reader
    /// consumes. Returns the index of the first position it does not consume.
    fn load_indexes(&mut self, entries: &[RowIndexEntry], start_index: usize) -> Result<usize>;

    /// The value of the row last reported present by one of the null tests.
    fn next(&mut self) -> Result<Self::Value>;

    fn get(&mut self, row: u64) -> Result<Option<Self::Value>>;

    /// Moves to `row` and reports whether it is null.
    fn next_is_null(&mut self, row: u64) -> Result<bool>;

    /// Reports whether the next row is null, without row group positioning.
    fn next_is_null_in_complex_type(&mut self) -> Result<bool>;

    fn get_in_complex_type(&mut self, row: u64) -> Result<Option<Self::Value>>;

    /// Skips values in the data streams. A value left pending by a null test
    /// counts as the first one.
    fn skip_rows(&mut self, num_non_null_values: u64) -> Result<()>;

    /// Skips rows, nulls included.
    fn skip_rows_in_complex_type(&mut self, num_rows: u64) -> Result<()>;

    /// Releases the streams of the current stripe. Closing twice is a no-op.
    fn close(&mut self) -> Result<()>;

    /// Reads `num_rows` rows from `start_row` into an arrow array.
    fn read_batch(&mut self, start_row: u64, num_rows: usize) -> Result<Box<dyn Array>>
    where
        Self::Value: ArrowValue,
    {
        let mut builder = <Self::Value as ArrowValue>::Builder::default();
        builder.reserve(num_rows);
        for row in start_row..start_row + num_rows as u64 {
            let value = self.get(row)?;
            <Self::Value as ArrowValue>::push(&mut builder, value);
        }
        Ok(builder.as_box())
    }
}

/// A value that can be collected into an arrow array.
pub trait ArrowValue: Sized {
    type Builder: MutableArray + Default;

    fn push(builder: &mut Self::Builder, value: Option<Self>);
}

impl ArrowValue for i64 {
    type Builder = MutablePrimitiveArray<i64>;

    fn push(builder: &mut Self::Builder, value: Option<Self>) {
        builder.push(value)
    }
}

impl ArrowValue for String {
    type Builder = MutableUtf8Array<i32>;

    fn push(builder: &mut Self::Builder, value: Option<Self>) {
        builder.push(value)
    }
}

/// Decodes the non-null values of one column encoding.
pub trait ValueDecoder: Sized {
    type Value;

    fn open(column_id: u32, encoding: &ColumnEncoding, streams: &mut StripeStreams)
        -> Result<Self>;

    /// Number of positions a bookmark of the data streams holds.
    fn position_count(&self) -> usize;

    fn seek(&mut self, index: &mut dyn PositionProvider) -> Result<()>;

    fn next(&mut self) -> Result<Self::Value>;

    fn skip(&mut self, n: u64) -> Result<()>;
}

pub(crate) fn take_stream(
    streams: &mut StripeStreams,
    column_id: u32,
    kind: StreamKind,
) -> Result<InStream> {
    streams
        .remove(&StreamName::new(column_id, kind))
        .ok_or_else(|| general_err!("Missing {:?} stream of column {}", kind, column_id))
}

/// A [`ColumnReader`] decoding values only when they are asked for.
///
/// Presence is read from the PRESENT stream, the values from the streams of
/// the decoder `D`.
pub struct LazyReader<D: ValueDecoder> {
    column_id: u32,
    row_index_stride: usize,
    row_base_in_stripe: u64,
    // first row whose presence was not read yet
    next_row: u64,
    // the row before `next_row` is present and its value was not read yet
    pending: bool,
    // a failed read left the streams at different rows, only a seek recovers
    lost_position: bool,
    present: Option<RunLengthIntegerReader<InStream>>,
    decoder: Option<D>,
    row_groups: Vec<Vec<u64>>,
}

impl<D: ValueDecoder> LazyReader<D> {
    pub fn new(column_id: u32, row_index_stride: usize) -> Self {
        Self {
            column_id,
            row_index_stride,
            row_base_in_stripe: 0,
            next_row: 0,
            pending: false,
            lost_position: false,
            present: None,
            decoder: None,
            row_groups: vec![],
        }
    }

    pub fn column_id(&self) -> u32 {
        self.column_id
    }

    fn decoder(&mut self) -> Result<&mut D> {
        let column_id = self.column_id;
        self.decoder
            .as_mut()
            .ok_or_else(|| invalid_arg_err!("Column {} is not in a stripe", column_id))
    }

    fn row_group_of(&self, row: u64) -> Option<u64> {
        match self.row_index_stride {
            0 => None,
            stride => Some((row - self.row_base_in_stripe) / stride as u64),
        }
    }

    fn check_position(&self) -> Result<()> {
        if self.lost_position {
            return Err(general_err!(
                "Column {} lost its position after a failed read, seek a row group first",
                self.column_id
            ));
        }
        Ok(())
    }

    fn track<T>(&mut self, result: Result<T>) -> Result<T> {
        if result.is_err() {
            self.lost_position = true;
        }
        result
    }

    /// Reads the presence of the next row.
    fn read_present(&mut self) -> Result<bool> {
        self.decoder()?;
        self.check_position()?;
        let result = self.read_present_unchecked();
        self.track(result)
    }

    fn read_present_unchecked(&mut self) -> Result<bool> {
        if self.pending {
            self.pending = false;
            self.decoder()?.skip(1)?;
        }
        let present = match self.present.as_mut() {
            Some(present) => present.next()? != 0,
            None => true,
        };
        self.next_row += 1;
        self.pending = present;
        Ok(present)
    }

    fn skip_present(&mut self, num_rows: u64) -> Result<()> {
        self.decoder()?;
        self.check_position()?;
        let result = self.skip_present_unchecked(num_rows);
        self.track(result)
    }

    fn skip_present_unchecked(&mut self, num_rows: u64) -> Result<()> {
        let mut values = self.pending as u64;
        self.pending = false;
        match self.present.as_mut() {
            Some(present) => {
                for _ in 0..num_rows {
                    values += (present.next()? != 0) as u64;
                }
            }
            None => values += num_rows,
        }
        self.next_row += num_rows;
        self.decoder()?.skip(values)
    }
}

impl<D: ValueDecoder> ColumnReader for LazyReader<D> {
    type Value = D::Value;

    fn start_stripe(
        &mut self,
        streams: &mut StripeStreams,
        encodings: &[ColumnEncoding],
        indexes: &[RowIndex],
        row_base_in_stripe: u64,
    ) -> Result<()> {
        let encoding = encodings.get(self.column_id as usize).ok_or_else(|| {
            general_err!("Missing the encoding of column {}", self.column_id)
        })?;
        self.present = streams
            .remove(&StreamName::new(self.column_id, StreamKind::Present))
            .map(|stream| RunLengthIntegerReader::new(stream, IntegerEncoding::presence()));
        self.decoder = Some(D::open(self.column_id, encoding, streams)?);
        self.row_base_in_stripe = row_base_in_stripe;
        self.next_row = row_base_in_stripe;
        self.pending = false;
        self.lost_position = false;
        self.row_groups.clear();
        if let Some(index) = indexes.get(self.column_id as usize) {
            self.load_indexes(&index.entries, 0)?;
        }
        Ok(())
    }

    fn seek(&mut self, row_group: usize) -> Result<()> {
        self.decoder()?;
        let positions = self.row_groups.get(row_group).ok_or_else(|| {
            general_err!(
                "Row group {} of column {} is not in the row index",
                row_group,
                self.column_id
            )
        })?;
        let mut cursor = PositionCursor::new(positions);
        let result = match self.present.as_mut() {
            Some(present) => present.seek(&mut cursor),
            None => Ok(()),
        }
        .and_then(|_| match self.decoder.as_mut() {
            Some(decoder) => decoder.seek(&mut cursor),
            None => Ok(()),
        });
        self.track(result)?;
        self.next_row = self.row_base_in_stripe + (row_group * self.row_index_stride) as u64;
        self.pending = false;
        self.lost_position = false;
        Ok(())
    }

    fn load_indexes(&mut self, entries: &[RowIndexEntry], start_index: usize) -> Result<usize> {
        let present_count = self
            .present
            .as_ref()
            .map(|present| present.position_count())
            .unwrap_or_default();
        let end = start_index + present_count + self.decoder()?.position_count();
        let column_id = self.column_id;
        self.row_groups = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                entry
                    .positions
                    .get(start_index..end)
                    .map(|positions| positions.to_vec())
                    .ok_or_else(|| {
                        general_err!(
                            "Row index entry {} of column {} holds {} positions, expected at least {}",
                            i,
                            column_id,
                            entry.positions.len(),
                            end
                        )
                    })
            })
            .collect::<Result<_>>()?;
        Ok(end)
    }

    fn next(&mut self) -> Result<Self::Value> {
        if !self.pending {
            return Err(invalid_arg_err!(
                "Column {} has no present row to read at row {}",
                self.column_id,
                self.next_row
            ));
        }
        self.check_position()?;
        self.pending = false;
        let result = self.decoder()?.next();
        self.track(result)
    }

    fn get(&mut self, row: u64) -> Result<Option<Self::Value>> {
        if self.next_is_null(row)? {
            Ok(None)
        } else {
            self.next().map(Some)
        }
    }

    fn next_is_null(&mut self, row: u64) -> Result<bool> {
        self.decoder()?;
        if row < self.row_base_in_stripe {
            return Err(invalid_arg_err!(
                "Row {} is before the stripe starting at {}",
                row,
                self.row_base_in_stripe
            ));
        }
        let target_group = self.row_group_of(row);
        let current_group = self.row_group_of(self.next_row);
        if self.lost_position || row < self.next_row || target_group > current_group {
            match target_group {
                Some(group) if (group as usize) < self.row_groups.len() => {
                    self.seek(group as usize)?
                }
                _ if self.lost_position => self.check_position()?,
                // without a bookmark, later rows are reached by skipping
                _ if row >= self.next_row => {}
                _ => {
                    return Err(general_err!(
                        "Cannot move column {} back to row {} without a row index",
                        self.column_id,
                        row
                    ))
                }
            }
        }
        self.skip_present(row - self.next_row)?;
        Ok(!self.read_present()?)
    }

    fn next_is_null_in_complex_type(&mut self) -> Result<bool> {
        Ok(!self.read_present()?)
    }

    fn get_in_complex_type(&mut self, row: u64) -> Result<Option<Self::Value>> {
        self.decoder()?;
        if row < self.next_row {
            return Err(invalid_arg_err!(
                "Row {} of column {} was already read",
                row,
                self.column_id
            ));
        }
        self.skip_present(row - self.next_row)?;
        if self.next_is_null_in_complex_type()? {
            Ok(None)
        } else {
            self.next().map(Some)
        }
    }

    fn skip_rows(&mut self, num_non_null_values: u64) -> Result<()> {
        self.decoder()?;
        self.check_position()?;
        self.pending = false;
        let result = self.decoder()?.skip(num_non_null_values);
        self.track(result)
    }

    fn skip_rows_in_complex_type(&mut self, num_rows: u64) -> Result<()> {
        self.skip_present(num_rows)
    }

    fn close(&mut self) -> Result<()> {
        self.present = None;
        self.decoder = None;
        self.row_groups.clear();
        self.pending = false;
        self.lost_position = false;
        Ok(())
    }
}
