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

use arrow::error::Result;

use crate::{ColumnEncoding, ColumnEncodingKind, RowIndex, RowIndexEntry};

use super::{
    ColumnReader, LongDirectReader, StringDictionaryReader, StringDirectReader, StripeStreams,
};

/// The closed set of readers one logical column can use in a stripe.
pub trait ReaderVariant: ColumnReader + Sized {
    /// Builds the reader decoding `encoding`. An encoding without a reader is a
    /// configuration error.
    fn select(encoding: &ColumnEncoding, column_id: u32, row_index_stride: usize)
        -> Result<Self>;
}

/// Reads one logical column whose encoding may change from stripe to stripe.
///
/// Every stripe start builds a fresh variant for the column's encoding; all other
/// calls go to that variant.
pub struct EncodingDispatchReader<V: ReaderVariant> {
    column_id: u32,
    row_index_stride: usize,
    reader: Option<V>,
}

pub type StringColumnReader = EncodingDispatchReader<StringReaderVariant>;
pub type LongColumnReader = EncodingDispatchReader<LongReaderVariant>;

impl<V: ReaderVariant> EncodingDispatchReader<V> {
    pub fn new(column_id: u32, row_index_stride: usize) -> Self {
        Self {
            column_id,
            row_index_stride,
            reader: None,
        }
    }

    /// The variant of the current stripe.
    pub fn variant(&self) -> Option<&V> {
        self.reader.as_ref()
    }

    fn reader(&mut self) -> Result<&mut V> {
        let column_id = self.column_id;
        self.reader.as_mut().ok_or_else(|| {
            invalid_arg_err!("Column {} is read before its stripe started", column_id)
        })
    }
}

impl<V: ReaderVariant> ColumnReader for EncodingDispatchReader<V> {
    type Value = V::Value;

    fn start_stripe(
        &mut self,
        streams: &mut StripeStreams,
        encodings: &[ColumnEncoding],
        indexes: &[RowIndex],
        row_base_in_stripe: u64,
    ) -> Result<()> {
        if let Some(mut previous) = self.reader.take() {
            previous.close()?;
        }
        let encoding = encodings.get(self.column_id as usize).ok_or_else(|| {
            general_err!("Missing the encoding of column {}", self.column_id)
        })?;
        let mut reader = V::select(encoding, self.column_id, self.row_index_stride)?;
        log::debug!(
            "column {} uses {:?} encoding from row {}",
            self.column_id,
            encoding.kind,
            row_base_in_stripe
        );
        reader.start_stripe(streams, encodings, indexes, row_base_in_stripe)?;
        self.reader = Some(reader);
        Ok(())
    }

    fn seek(&mut self, row_group: usize) -> Result<()> {
        self.reader()?.seek(row_group)
    }

    fn load_indexes(&mut self, entries: &[RowIndexEntry], start_index: usize) -> Result<usize> {
        self.reader()?.load_indexes(entries, start_index)
    }

    fn next(&mut self) -> Result<Self::Value> {
        self.reader()?.next()
    }

    fn get(&mut self, row: u64) -> Result<Option<Self::Value>> {
        self.reader()?.get(row)
    }

    fn next_is_null(&mut self, row: u64) -> Result<bool> {
        self.reader()?.next_is_null(row)
    }

    fn next_is_null_in_complex_type(&mut self) -> Result<bool> {
        self.reader()?.next_is_null_in_complex_type()
    }

    fn get_in_complex_type(&mut self, row: u64) -> Result<Option<Self::Value>> {
        self.reader()?.get_in_complex_type(row)
    }

    fn skip_rows(&mut self, num_non_null_values: u64) -> Result<()> {
        self.reader()?.skip_rows(num_non_null_values)
    }

    fn skip_rows_in_complex_type(&mut self, num_rows: u64) -> Result<()> {
        self.reader()?.skip_rows_in_complex_type(num_rows)
    }

    fn close(&mut self) -> Result<()> {
        match self.reader.take() {
            Some(mut reader) => reader.close(),
            None => Ok(()),
        }
    }
}

macro_rules! impl_variant_reader {
    ($name:ident, $value:ty, [$($variant:ident),+]) => {
        impl ColumnReader for $name {
            type Value = $value;

            fn start_stripe(
                &mut self,
                streams: &mut StripeStreams,
                encodings: &[ColumnEncoding],
                indexes: &[RowIndex],
                row_base_in_stripe: u64,
            ) -> Result<()> {
                match self {
                    $($name::$variant(r) => {
                        r.start_stripe(streams, encodings, indexes, row_base_in_stripe)
                    })+
                }
            }

            fn seek(&mut self, row_group: usize) -> Result<()> {
                match self {
                    $($name::$variant(r) => r.seek(row_group),)+
                }
            }

            fn load_indexes(
                &mut self,
                entries: &[RowIndexEntry],
                start_index: usize,
            ) -> Result<usize> {
                match self {
                    $($name::$variant(r) => r.load_indexes(entries, start_index),)+
                }
            }

            fn next(&mut self) -> Result<$value> {
                match self {
                    $($name::$variant(r) => r.next(),)+
                }
            }

            fn get(&mut self, row: u64) -> Result<Option<$value>> {
                match self {
                    $($name::$variant(r) => r.get(row),)+
                }
            }

            fn next_is_null(&mut self, row: u64) -> Result<bool> {
                match self {
                    $($name::$variant(r) => r.next_is_null(row),)+
                }
            }

            fn next_is_null_in_complex_type(&mut self) -> Result<bool> {
                match self {
                    $($name::$variant(r) => r.next_is_null_in_complex_type(),)+
                }
            }

            fn get_in_complex_type(&mut self, row: u64) -> Result<Option<$value>> {
                match self {
                    $($name::$variant(r) => r.get_in_complex_type(row),)+
                }
            }

            fn skip_rows(&mut self, num_non_null_values: u64) -> Result<()> {
                match self {
                    $($name::$variant(r) => r.skip_rows(num_non_null_values),)+
                }
            }

            fn skip_rows_in_complex_type(&mut self, num_rows: u64) -> Result<()> {
                match self {
                    $($name::$variant(r) => r.skip_rows_in_complex_type(num_rows),)+
                }
            }

            fn close(&mut self) -> Result<()> {
                match self {
                    $($name::$variant(r) => r.close(),)+
                }
            }
        }
    };
}

fn unsupported(encoding: &ColumnEncoding, column_id: u32, type_name: &str) -> arrow::error::Error {
    nyi_err!(
        "{:?} encoding of {} column {} is not supported",
        encoding.kind,
        type_name,
        column_id
    )
}

pub enum StringReaderVariant {
    Direct(StringDirectReader),
    Dictionary(StringDictionaryReader),
}

impl_variant_reader!(StringReaderVariant, String, [Direct, Dictionary]);

impl ReaderVariant for StringReaderVariant {
    fn select(
        encoding: &ColumnEncoding,
        column_id: u32,
        row_index_stride: usize,
    ) -> Result<Self> {
        match encoding.kind {
            ColumnEncodingKind::Direct => Ok(Self::Direct(StringDirectReader::new(
                column_id,
                row_index_stride,
            ))),
            ColumnEncodingKind::Dictionary => Ok(Self::Dictionary(StringDictionaryReader::new(
                column_id,
                row_index_stride,
            ))),
            _ => Err(unsupported(encoding, column_id, "string")),
        }
    }
}

pub enum LongReaderVariant {
    Direct(LongDirectReader),
}

impl_variant_reader!(LongReaderVariant, i64, [Direct]);

impl ReaderVariant for LongReaderVariant {
    fn select(
        encoding: &ColumnEncoding,
        column_id: u32,
        row_index_stride: usize,
    ) -> Result<Self> {
        match encoding.kind {
            ColumnEncodingKind::Direct => Ok(Self::Direct(LongDirectReader::new(
                column_id,
                row_index_stride,
            ))),
            _ => Err(unsupported(encoding, column_id, "integer")),
        }
    }
}
