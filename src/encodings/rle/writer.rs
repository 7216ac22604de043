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
use byteorder::WriteBytesExt;

use crate::encodings::{write_integer, IntegerEncoding};
use crate::position::{PositionRecorder, RecordPosition};
use crate::write::PositionedWrite;

use super::{RunHeader, MAX_DELTA, MAX_LITERAL_SIZE, MAX_REPEAT_SIZE, MIN_DELTA, MIN_REPEAT_SIZE};

/// What the pending buffer currently holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunState {
    Empty,
    /// Literals whose last value starts no usable delta.
    SingleValue,
    /// Literals whose last two values differ by `delta`, which fits in a byte.
    DeltaCandidate { delta: i64 },
    /// `literals[0]` is the base of a confirmed fixed delta run.
    Repeat { delta: i64 },
}

impl RunState {
    fn after_delta(delta: i64) -> Self {
        if (MIN_DELTA..=MAX_DELTA).contains(&delta) {
            RunState::DeltaCandidate { delta }
        } else {
            RunState::SingleValue
        }
    }
}

/// Writes a sequence of integers as fixed delta and literal runs.
///
/// Values are buffered until a run is complete. Two consecutive equal deltas
/// are needed before a fixed delta run is opened; when they show up at the tail
/// of a longer literal buffer the preceding literals are flushed on their own
/// and the last two buffered values become the head of the new run.
pub struct RunLengthIntegerWriter<W: PositionedWrite> {
    output: W,
    encoding: IntegerEncoding,
    literals: Box<[i64; MAX_LITERAL_SIZE]>,
    num_literals: usize,
    state: RunState,
}

impl<W: PositionedWrite> RunLengthIntegerWriter<W> {
    pub fn new(output: W, encoding: IntegerEncoding) -> Self {
        Self {
            output,
            encoding,
            literals: Box::new([0; MAX_LITERAL_SIZE]),
            num_literals: 0,
            state: RunState::Empty,
        }
    }

    pub fn encoding(&self) -> &IntegerEncoding {
        &self.encoding
    }

    pub fn write(&mut self, value: i64) -> Result<()> {
        self.encoding.check(value)?;
        match self.state {
            RunState::Empty => self.start(value),
            RunState::Repeat { delta } => {
                let expected = self.literals[0]
                    .wrapping_add(delta.wrapping_mul(self.num_literals as i64));
                if value == expected {
                    self.num_literals += 1;
                    if self.num_literals == MAX_REPEAT_SIZE {
                        self.write_values()?;
                    }
                } else {
                    self.write_values()?;
                    self.start(value);
                }
            }
            RunState::SingleValue => {
                self.state = RunState::after_delta(value.wrapping_sub(self.last()));
                self.push_literal(value)?;
            }
            RunState::DeltaCandidate { delta } => {
                let next_delta = value.wrapping_sub(self.last());
                if next_delta == delta {
                    self.confirm_repeat(delta)?;
                } else {
                    self.state = RunState::after_delta(next_delta);
                    self.push_literal(value)?;
                }
            }
        }
        Ok(())
    }

    /// Emits the pending run and flushes the output.
    pub fn flush(&mut self) -> Result<()> {
        self.write_values()?;
        self.output.flush()?;
        Ok(())
    }

    /// Emits the pending run and flushes the output, optionally keeping its buffers.
    pub fn flush_buffer(&mut self, reuse_buffer: bool) -> Result<()> {
        self.write_values()?;
        self.output.flush_buffer(reuse_buffer)
    }

    /// Memory held by the underlying output.
    pub fn buffer_size(&self) -> usize {
        self.output.buffer_size()
    }

    pub fn get_ref(&self) -> &W {
        &self.output
    }

    /// Flushes the pending run and returns the output.
    pub fn into_inner(mut self) -> Result<W> {
        self.flush()?;
        Ok(self.output)
    }

    fn last(&self) -> i64 {
        self.literals[self.num_literals - 1]
    }

    fn start(&mut self, value: i64) {
        self.literals[0] = value;
        self.num_literals = 1;
        self.state = RunState::SingleValue;
    }

    fn push_literal(&mut self, value: i64) -> Result<()> {
        self.literals[self.num_literals] = value;
        self.num_literals += 1;
        if self.num_literals == MAX_LITERAL_SIZE {
            self.write_values()?;
        }
        Ok(())
    }

    // The value completing the third equal step is implied by base and delta,
    // it is never stored.
    fn confirm_repeat(&mut self, delta: i64) -> Result<()> {
        if self.num_literals == MIN_REPEAT_SIZE - 1 {
            self.num_literals += 1;
        } else {
            self.num_literals -= MIN_REPEAT_SIZE - 1;
            let base = self.literals[self.num_literals];
            self.write_values()?;
            self.literals[0] = base;
            self.num_literals = MIN_REPEAT_SIZE;
        }
        self.state = RunState::Repeat { delta };
        Ok(())
    }

    fn write_values(&mut self) -> Result<()> {
        if self.num_literals == 0 {
            return Ok(());
        }
        match self.state {
            RunState::Repeat { delta } => {
                let header = RunHeader::FixedDelta {
                    count: self.num_literals,
                };
                self.output.write_u8(header.control())?;
                self.output.write_i8(delta as i8)?;
                write_integer(&mut self.output, self.literals[0], &self.encoding)?;
            }
            _ => {
                let header = RunHeader::Literal {
                    count: self.num_literals,
                };
                self.output.write_u8(header.control())?;
                for value in &self.literals[..self.num_literals] {
                    write_integer(&mut self.output, *value, &self.encoding)?;
                }
            }
        }
        self.num_literals = 0;
        self.state = RunState::Empty;
        Ok(())
    }
}

impl<W: PositionedWrite> RecordPosition for RunLengthIntegerWriter<W> {
    /// Records the output position followed by the number of values still pending.
    fn record_position(&self, recorder: &mut dyn PositionRecorder) {
        self.output.record_position(recorder);
        recorder.add_position(self.num_literals as u64);
    }
}
