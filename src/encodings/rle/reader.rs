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

use crate::encodings::serialization::{read_u8, try_read_u8};
use crate::encodings::{read_integer, skip_integers, IntegerEncoding};
use crate::position::PositionProvider;
use crate::read::InStream;

use super::{RunHeader, MAX_LITERAL_SIZE};

/// Reads back what [`RunLengthIntegerWriter`](super::RunLengthIntegerWriter) wrote.
pub struct RunLengthIntegerReader<R: Read> {
    input: R,
    encoding: IntegerEncoding,
    literals: Box<[i64; MAX_LITERAL_SIZE]>,
    num_literals: usize,
    used: usize,
    delta: i64,
    repeat: bool,
}

impl<R: Read> RunLengthIntegerReader<R> {
    pub fn new(input: R, encoding: IntegerEncoding) -> Self {
        Self {
            input,
            encoding,
            literals: Box::new([0; MAX_LITERAL_SIZE]),
            num_literals: 0,
            used: 0,
            delta: 0,
            repeat: false,
        }
    }

    pub fn encoding(&self) -> &IntegerEncoding {
        &self.encoding
    }

    pub fn get_ref(&self) -> &R {
        &self.input
    }

    pub fn into_inner(self) -> R {
        self.input
    }

    /// Whether another value can be read, loading the next run if needed.
    pub fn has_next(&mut self) -> Result<bool> {
        if self.used < self.num_literals {
            return Ok(true);
        }
        self.read_values()
    }

    pub fn next(&mut self) -> Result<i64> {
        if self.used == self.num_literals && !self.read_values()? {
            return Err(general_err!("Read past end of run length integer stream"));
        }
        let value = if self.repeat {
            self.literals[0].wrapping_add(self.delta.wrapping_mul(self.used as i64))
        } else {
            self.literals[self.used]
        };
        self.used += 1;
        Ok(value)
    }

    /// Appends the next `n` values to `output`.
    pub fn next_batch(&mut self, output: &mut Vec<i64>, n: usize) -> Result<()> {
        output.reserve(n);
        for _ in 0..n {
            output.push(self.next()?);
        }
        Ok(())
    }

    /// Skips `n` values. Runs that are skipped entirely are never decoded.
    pub fn skip(&mut self, mut n: u64) -> Result<()> {
        while n > 0 {
            if self.used == self.num_literals {
                let control = read_u8(&mut self.input)?;
                match RunHeader::from_control(control) {
                    RunHeader::Literal { count } if count as u64 <= n => {
                        skip_integers(&mut self.input, count, &self.encoding)?;
                        n -= count as u64;
                        continue;
                    }
                    header => self.load_run(header)?,
                }
            }
            let consume = n.min((self.num_literals - self.used) as u64);
            self.used += consume as usize;
            n -= consume;
        }
        Ok(())
    }

    /// Loads the next run, `false` at the end of the input.
    fn read_values(&mut self) -> Result<bool> {
        match try_read_u8(&mut self.input)? {
            Some(control) => {
                self.load_run(RunHeader::from_control(control))?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn load_run(&mut self, header: RunHeader) -> Result<()> {
        match header {
            RunHeader::FixedDelta { count } => {
                self.repeat = true;
                self.delta = read_u8(&mut self.input)? as i8 as i64;
                self.literals[0] = read_integer(&mut self.input, &self.encoding)?;
                self.num_literals = count;
            }
            RunHeader::Literal { count } => {
                self.repeat = false;
                for slot in self.literals[..count].iter_mut() {
                    *slot = read_integer(&mut self.input, &self.encoding)?;
                }
                self.num_literals = count;
            }
        }
        self.used = 0;
        Ok(())
    }
}

impl RunLengthIntegerReader<InStream> {
    /// Number of positions a bookmark of this stream holds.
    pub fn position_count(&self) -> usize {
        self.input.position_count() + 1
    }

    /// Moves to a bookmark recorded by the writer.
    ///
    /// The bookmark names the byte position of the run that was pending when it was
    /// taken and how many of its values had been written. The writer may have split
    /// those values into a literal run followed by a fixed delta run, so the count
    /// can reach into the run after the one found at the position.
    pub fn seek(&mut self, index: &mut dyn PositionProvider) -> Result<()> {
        self.input.seek(index)?;
        let mut consumed = index.next_position()? as usize;
        self.num_literals = 0;
        self.used = 0;
        while consumed > 0 {
            if !self.read_values()? {
                return Err(general_err!(
                    "Bookmark points {} values past the end of the stream",
                    consumed
                ));
            }
            let available = self.num_literals.min(consumed);
            self.used = available;
            consumed -= available;
        }
        Ok(())
    }
}
