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

//! Run-length encoding of integer streams.
//!
//! A control byte is written before each run. Values 0 to 127 start a fixed
//! delta run of 3 to 130 values: a signed delta byte and the base value follow.
//! Values -1 to -128 start a literal run of 1 to 128 values, which follow one
//! by one. Every value is laid out per the stream's [`IntegerEncoding`].
//!
//! For example, 100 sevens encode as `[0x61, 0x00, 0x07]` with unsigned varints,
//! and `[7, 2, 19]` as `[0xfd, 0x07, 0x02, 0x13]`.
//!
//! [`IntegerEncoding`]: super::IntegerEncoding

mod reader;
mod writer;

pub use reader::RunLengthIntegerReader;
pub use writer::RunLengthIntegerWriter;

pub const MIN_REPEAT_SIZE: usize = 3;
pub const MAX_REPEAT_SIZE: usize = 127 + MIN_REPEAT_SIZE;
pub const MAX_LITERAL_SIZE: usize = 128;
pub const MIN_DELTA: i64 = i8::MIN as i64;
pub const MAX_DELTA: i64 = i8::MAX as i64;

/// Decoded control byte of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunHeader {
    FixedDelta { count: usize },
    Literal { count: usize },
}

impl RunHeader {
    pub fn from_control(control: u8) -> Self {
        let control = control as i8;
        if control >= 0 {
            RunHeader::FixedDelta {
                count: control as usize + MIN_REPEAT_SIZE,
            }
        } else {
            RunHeader::Literal {
                count: control.unsigned_abs() as usize,
            }
        }
    }

    pub fn control(&self) -> u8 {
        match self {
            RunHeader::FixedDelta { count } => {
                debug_assert!((MIN_REPEAT_SIZE..=MAX_REPEAT_SIZE).contains(count));
                (count - MIN_REPEAT_SIZE) as u8
            }
            RunHeader::Literal { count } => {
                debug_assert!((1..=MAX_LITERAL_SIZE).contains(count));
                (-(*count as i16)) as i8 as u8
            }
        }
    }

    pub fn count(&self) -> usize {
        match self {
            RunHeader::FixedDelta { count } | RunHeader::Literal { count } => *count,
        }
    }
}
