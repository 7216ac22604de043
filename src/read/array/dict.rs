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

use arrow::array::{MutableUtf8Array, TryPush, Utf8Array};
use arrow::error::Result;

use crate::encodings::{IntegerEncoding, RunLengthIntegerReader};
use crate::position::PositionProvider;
use crate::read::reader::{take_stream, LazyReader, ValueDecoder};
use crate::read::{InStream, StripeStreams};
use crate::{ColumnEncoding, StreamKind};

use super::utf8::{read_bytes, read_length};

pub type StringDictionaryReader = LazyReader<StringDictionaryDecoder>;

/// DATA holds dictionary ids, the dictionary itself is DICTIONARY_DATA with
/// the entry lengths in LENGTH. The dictionary is loaded when the decoder opens.
pub struct StringDictionaryDecoder {
    ids: RunLengthIntegerReader<InStream>,
    dictionary: Utf8Array<i32>,
}

impl StringDictionaryDecoder {
    pub fn dictionary(&self) -> &Utf8Array<i32> {
        &self.dictionary
    }

    fn read_dictionary(
        mut data: InStream,
        lengths: InStream,
        dictionary_size: usize,
    ) -> Result<Utf8Array<i32>> {
        let mut lengths = RunLengthIntegerReader::new(lengths, IntegerEncoding::unsigned_vint());
        // dictionary_size comes from metadata, entries are only added as they decode
        let mut dictionary = MutableUtf8Array::<i32>::new();
        let mut scratch = vec![];
        for _ in 0..dictionary_size {
            let length = read_length(&mut lengths)?;
            read_bytes(&mut data, length, &mut scratch)?;
            let value = std::str::from_utf8(&scratch)
                .map_err(|e| general_err!("Invalid utf8 in dictionary: {}", e))?;
            dictionary.try_push(Some(value))?;
        }
        Ok(dictionary.into())
    }
}

impl ValueDecoder for StringDictionaryDecoder {
    type Value = String;

    fn open(column_id: u32, encoding: &ColumnEncoding, streams: &mut StripeStreams) -> Result<Self> {
        let ids = take_stream(streams, column_id, StreamKind::Data)?;
        let data = take_stream(streams, column_id, StreamKind::DictionaryData)?;
        let lengths = take_stream(streams, column_id, StreamKind::Length)?;
        Ok(Self {
            ids: RunLengthIntegerReader::new(ids, IntegerEncoding::unsigned_vint()),
            dictionary: Self::read_dictionary(data, lengths, encoding.dictionary_size as usize)?,
        })
    }

    fn position_count(&self) -> usize {
        self.ids.position_count()
    }

    fn seek(&mut self, index: &mut dyn PositionProvider) -> Result<()> {
        self.ids.seek(index)
    }

    fn next(&mut self) -> Result<String> {
        let id = self.ids.next()?;
        match usize::try_from(id) {
            Ok(id) if id < self.dictionary.len() => Ok(self.dictionary.value(id).to_owned()),
            _ => Err(general_err!(
                "Dictionary id {} out of range for a dictionary of {} entries",
                id,
                self.dictionary.len()
            )),
        }
    }

    fn skip(&mut self, n: u64) -> Result<()> {
        self.ids.skip(n)
    }
}
