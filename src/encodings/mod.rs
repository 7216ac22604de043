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

pub mod rle;
mod serialization;

use arrow::error::Result;

pub use self::rle::{RunHeader, RunLengthIntegerReader, RunLengthIntegerWriter};
pub use self::serialization::{
    read_integer, read_vslong, read_vulong, skip_integers, write_integer, write_vslong,
    write_vulong,
};

/// How a single integer value is laid out inside a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntegerEncoding {
    signed: bool,
    num_bytes: usize,
    use_vints: bool,
}

impl IntegerEncoding {
    /// - `signed`: values are sign-extended (fixed width) or zig-zag encoded (varint).
    /// - `num_bytes`: width of a fixed-width value, in `1..=8`.
    /// - `use_vints`: base-128 varints instead of fixed width.
    pub fn try_new(signed: bool, num_bytes: usize, use_vints: bool) -> Result<Self> {
        if !(1..=8).contains(&num_bytes) {
            return Err(general_err!(
                "Integer width must be between 1 and 8 bytes, got {}",
                num_bytes
            ));
        }
        Ok(Self {
            signed,
            num_bytes,
            use_vints,
        })
    }

    pub const fn signed_vint() -> Self {
        Self {
            signed: true,
            num_bytes: 8,
            use_vints: true,
        }
    }

    pub const fn unsigned_vint() -> Self {
        Self {
            signed: false,
            num_bytes: 8,
            use_vints: true,
        }
    }

    /// Presence flags: one unsigned byte per value, 1 for present.
    pub const fn presence() -> Self {
        Self {
            signed: false,
            num_bytes: 1,
            use_vints: false,
        }
    }

    pub fn is_signed(&self) -> bool {
        self.signed
    }

    pub fn num_bytes(&self) -> usize {
        self.num_bytes
    }

    pub fn use_vints(&self) -> bool {
        self.use_vints
    }

    /// Whether `value` survives a round trip through this encoding.
    pub fn can_represent(&self, value: i64) -> bool {
        if self.use_vints || self.num_bytes == 8 {
            return true;
        }
        let bits = self.num_bytes as u32 * 8;
        if self.signed {
            let bound = 1i64 << (bits - 1);
            (-bound..bound).contains(&value)
        } else {
            (0..1i64 << bits).contains(&value)
        }
    }

    pub(crate) fn check(&self, value: i64) -> Result<()> {
        if self.can_represent(value) {
            Ok(())
        } else {
            Err(invalid_arg_err!(
                "Value {} does not fit in {} {} bytes",
                value,
                self.num_bytes,
                if self.signed { "signed" } else { "unsigned" }
            ))
        }
    }
}
