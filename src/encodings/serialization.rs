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

use std::io::{ErrorKind, Read, Write};

use arrow::error::Result;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use super::IntegerEncoding;

// 64 bits in 7 bit groups
const MAX_VARINT_BYTES: usize = 10;

/// Reads one byte, `None` on a clean end of input.
pub(crate) fn try_read_u8<R: Read>(r: &mut R) -> Result<Option<u8>> {
    let mut buf = [0u8; 1];
    loop {
        match r.read(&mut buf) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(buf[0])),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
}

pub(crate) fn read_u8<R: Read>(r: &mut R) -> Result<u8> {
    try_read_u8(r)?.ok_or_else(|| general_err!("Read past end of stream"))
}

pub fn write_vulong<W: Write>(w: &mut W, mut value: u64) -> Result<()> {
    loop {
        if value & !0x7f == 0 {
            w.write_u8(value as u8)?;
            return Ok(());
        }
        w.write_u8((0x80 | (value & 0x7f)) as u8)?;
        value >>= 7;
    }
}

pub fn write_vslong<W: Write>(w: &mut W, value: i64) -> Result<()> {
    write_vulong(w, ((value << 1) ^ (value >> 63)) as u64)
}

pub fn read_vulong<R: Read>(r: &mut R) -> Result<u64> {
    let mut result = 0u64;
    for i in 0..MAX_VARINT_BYTES {
        let b = read_u8(r)?;
        // the last byte holds only the top bit
        if i == MAX_VARINT_BYTES - 1 && b > 1 {
            return Err(general_err!("Varint overflows 64 bits"));
        }
        result |= ((b & 0x7f) as u64) << (7 * i);
        if b & 0x80 == 0 {
            return Ok(result);
        }
    }
    Err(general_err!(
        "Varint is longer than {} bytes",
        MAX_VARINT_BYTES
    ))
}

pub fn read_vslong<R: Read>(r: &mut R) -> Result<i64> {
    let n = read_vulong(r)?;
    Ok((n >> 1) as i64 ^ -((n & 1) as i64))
}

pub fn write_integer<W: Write>(w: &mut W, value: i64, encoding: &IntegerEncoding) -> Result<()> {
    if encoding.use_vints {
        return if encoding.signed {
            write_vslong(w, value)
        } else {
            write_vulong(w, value as u64)
        };
    }
    encoding.check(value)?;
    if encoding.signed {
        w.write_int::<LittleEndian>(value, encoding.num_bytes)?;
    } else {
        w.write_uint::<LittleEndian>(value as u64, encoding.num_bytes)?;
    }
    Ok(())
}

pub fn read_integer<R: Read>(r: &mut R, encoding: &IntegerEncoding) -> Result<i64> {
    if encoding.use_vints {
        return if encoding.signed {
            read_vslong(r)
        } else {
            read_vulong(r).map(|v| v as i64)
        };
    }
    let value = if encoding.signed {
        r.read_int::<LittleEndian>(encoding.num_bytes)
    } else {
        r.read_uint::<LittleEndian>(encoding.num_bytes)
            .map(|v| v as i64)
    };
    value.map_err(|e| match e.kind() {
        ErrorKind::UnexpectedEof => general_err!("Read past end of stream"),
        _ => e.into(),
    })
}

/// Advances past `n` encoded values without decoding them.
pub fn skip_integers<R: Read>(r: &mut R, n: usize, encoding: &IntegerEncoding) -> Result<()> {
    if encoding.use_vints {
        for _ in 0..n {
            let mut length = 1;
            loop {
                let b = read_u8(r)?;
                if length == MAX_VARINT_BYTES && b > 1 {
                    return Err(general_err!("Varint overflows 64 bits"));
                }
                if b & 0x80 == 0 {
                    break;
                }
                length += 1;
            }
        }
        return Ok(());
    }
    let bytes = (n * encoding.num_bytes) as u64;
    let skipped = std::io::copy(&mut r.by_ref().take(bytes), &mut std::io::sink())?;
    if skipped != bytes {
        return Err(general_err!("Read past end of stream"));
    }
    Ok(())
}
