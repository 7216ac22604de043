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

use std::io::Read;

use arrow::error::Result;

use crate::encodings::{IntegerEncoding, RunLengthIntegerReader};
use crate::position::PositionProvider;
use crate::read::reader::{take_stream, LazyReader, ValueDecoder};
use crate::read::{InStream, StripeStreams};
use crate::{ColumnEncoding, StreamKind};

pub type StringDirectReader = LazyReader<StringDirectDecoder>;

/// DATA holds the concatenated values, LENGTH their byte lengths.
pub struct StringDirectDecoder {
    data: InStream,
    lengths: RunLengthIntegerReader<InStream>,
}

pub(crate) fn read_length(lengths: &mut RunLengthIntegerReader<InStream>) -> Result<usize> {
    let length = lengths.next()?;
    usize::try_from(length).map_err(|_| general_err!("Negative string length {}", length))
}

/// Reads `length` bytes into `scratch`. The buffer only grows with the bytes
/// actually read, so a corrupt length fails instead of allocating.
pub(crate) fn read_bytes(data: &mut InStream, length: usize, scratch: &mut Vec<u8>) -> Result<()> {
    scratch.clear();
    data.by_ref().take(length as u64).read_to_end(scratch)?;
    if scratch.len() != length {
        return Err(general_err!(
            "String of {} bytes runs past the end of its stream after {} bytes",
            length,
            scratch.len()
        ));
    }
    Ok(())
}

impl ValueDecoder for StringDirectDecoder {
    type Value = String;

    fn open(column_id: u32, _: &ColumnEncoding, streams: &mut StripeStreams) -> Result<Self> {
        let data = take_stream(streams, column_id, StreamKind::Data)?;
        let lengths = take_stream(streams, column_id, StreamKind::Length)?;
        Ok(Self {
            data,
            lengths: RunLengthIntegerReader::new(lengths, IntegerEncoding::unsigned_vint()),
        })
    }

    fn position_count(&self) -> usize {
        self.data.position_count() + self.lengths.position_count()
    }

    fn seek(&mut self, index: &mut dyn PositionProvider) -> Result<()> {
        self.data.seek(index)?;
        self.lengths.seek(index)
    }

    fn next(&mut self) -> Result<String> {
        let length = read_length(&mut self.lengths)?;
        let mut bytes = vec![];
        read_bytes(&mut self.data, length, &mut bytes)?;
        String::from_utf8(bytes).map_err(|e| general_err!("Invalid utf8 in string stream: {}", e))
    }

    fn skip(&mut self, n: u64) -> Result<()> {
        let mut total = 0u64;
        for _ in 0..n {
            let length = read_length(&mut self.lengths)? as u64;
            total = total
                .checked_add(length)
                .ok_or_else(|| general_err!("Skipped string lengths overflow"))?;
        }
        self.data.skip(total)
    }
}
