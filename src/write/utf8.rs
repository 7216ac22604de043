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

use std::io::Write;

use ahash::RandomState;
use arrow::error::Result;
use hashbrown::HashMap;

use crate::encodings::IntegerEncoding;
use crate::{ColumnEncoding, StreamKind};

use super::common::{ColumnWriterBase, StripeColumn, WriteOptions};

/// Writes a string column, choosing between dictionary and direct encoding
/// once the whole stripe is known.
///
/// - dictionary: DATA holds the dictionary id of every value, DICTIONARY_DATA the
///   concatenated entries and LENGTH their lengths.
/// - direct: DATA holds the concatenated values and LENGTH their lengths.
pub struct StringColumnWriter {
    options: WriteOptions,
    ids: HashMap<String, u32, RandomState>,
    // dictionary entries in insertion order
    keys: Vec<String>,
    rows: Vec<Option<u32>>,
}

impl StringColumnWriter {
    pub fn new(options: WriteOptions) -> Self {
        Self {
            options,
            ids: HashMap::default(),
            keys: vec![],
            rows: vec![],
        }
    }

    pub fn write(&mut self, value: Option<&str>) {
        let id = value.map(|value| match self.ids.get(value) {
            Some(id) => *id,
            None => {
                let id = self.keys.len() as u32;
                self.ids.insert(value.to_owned(), id);
                self.keys.push(value.to_owned());
                id
            }
        });
        self.rows.push(id);
    }

    fn use_dictionary(&self) -> bool {
        let non_null = self.rows.iter().filter(|row| row.is_some()).count();
        non_null > 0
            && self.keys.len() as f64 / non_null as f64
                <= self.options.dictionary_key_size_threshold
    }

    pub fn finish(self) -> Result<StripeColumn> {
        let use_dictionary = self.use_dictionary();
        log::debug!(
            "choose string encoding: {} distinct in {} rows, dictionary: {}",
            self.keys.len(),
            self.rows.len(),
            use_dictionary
        );
        if use_dictionary {
            self.finish_dictionary()
        } else {
            self.finish_direct()
        }
    }

    fn finish_dictionary(self) -> Result<StripeColumn> {
        let options = self.options;
        let mut base = ColumnWriterBase::new(options);
        let mut data = options.rle_stream(IntegerEncoding::unsigned_vint());
        for row in &self.rows {
            base.write_row(row.is_some(), &[&data])?;
            if let Some(id) = row {
                data.write(*id as i64)?;
            }
        }

        let mut dictionary_data = options.out_stream();
        let mut lengths = options.rle_stream(IntegerEncoding::unsigned_vint());
        for key in &self.keys {
            dictionary_data.write_all(key.as_bytes())?;
            lengths.write(key.len() as i64)?;
        }

        base.finish(
            ColumnEncoding::dictionary(self.keys.len() as u32),
            vec![
                (StreamKind::Data, data.into_inner()?.into_inner()?),
                (
                    StreamKind::DictionaryData,
                    dictionary_data.into_inner()?,
                ),
                (StreamKind::Length, lengths.into_inner()?.into_inner()?),
            ],
        )
    }

    fn finish_direct(self) -> Result<StripeColumn> {
        let options = self.options;
        let mut base = ColumnWriterBase::new(options);
        let mut data = options.out_stream();
        let mut lengths = options.rle_stream(IntegerEncoding::unsigned_vint());
        for row in &self.rows {
            base.write_row(row.is_some(), &[&data, &lengths])?;
            if let Some(id) = row {
                let value = &self.keys[*id as usize];
                data.write_all(value.as_bytes())?;
                lengths.write(value.len() as i64)?;
            }
        }

        base.finish(
            ColumnEncoding::direct(),
            vec![
                (StreamKind::Data, data.into_inner()?),
                (StreamKind::Length, lengths.into_inner()?.into_inner()?),
            ],
        )
    }
}
