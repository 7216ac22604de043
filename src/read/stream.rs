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

use std::io::{self, Read};

use arrow::error::Result;
use bytes::Bytes;

use crate::compression::{CommonCompression, CHUNK_HEADER_SIZE};
use crate::position::PositionProvider;
use crate::Compression;

use super::ReadOptions;

/// The bytes of one stream, readable across compression chunks and seekable to
/// positions recorded by [`OutStream`](crate::write::OutStream).
#[derive(Debug, Clone)]
pub struct InStream {
    data: Bytes,
    compression: Compression,
    buffer_size: usize,
    // next unread byte, or next chunk header when compressed
    offset: usize,
    chunk: Vec<u8>,
    chunk_pos: usize,
}

impl InStream {
    pub fn new(data: Bytes, options: &ReadOptions) -> Self {
        Self {
            data,
            compression: options.compression,
            buffer_size: options.buffer_size,
            offset: 0,
            chunk: vec![],
            chunk_pos: 0,
        }
    }

    /// Size of the stream as stored.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of positions a bookmark of this stream holds.
    pub fn position_count(&self) -> usize {
        if self.compression.is_none() {
            1
        } else {
            2
        }
    }

    pub fn seek(&mut self, index: &mut dyn PositionProvider) -> Result<()> {
        let offset = index.next_position()? as usize;
        if offset > self.data.len() {
            return Err(general_err!(
                "Seek to {} in a stream of {} bytes",
                offset,
                self.data.len()
            ));
        }
        self.offset = offset;
        if self.compression.is_none() {
            return Ok(());
        }

        let uncompressed_offset = index.next_position()? as usize;
        self.chunk.clear();
        self.chunk_pos = 0;
        if uncompressed_offset > 0 {
            if !self.read_chunk()? || uncompressed_offset > self.chunk.len() {
                return Err(general_err!(
                    "Seek to {} in a chunk of {} bytes",
                    uncompressed_offset,
                    self.chunk.len()
                ));
            }
            self.chunk_pos = uncompressed_offset;
        }
        Ok(())
    }

    /// Advances `n` uncompressed bytes.
    pub fn skip(&mut self, mut n: u64) -> Result<()> {
        if self.compression.is_none() {
            let remaining = (self.data.len() - self.offset) as u64;
            if n > remaining {
                return Err(general_err!("Skip past end of stream"));
            }
            self.offset += n as usize;
            return Ok(());
        }
        loop {
            let available = (self.chunk.len() - self.chunk_pos) as u64;
            if n <= available {
                self.chunk_pos += n as usize;
                return Ok(());
            }
            n -= available;
            self.chunk_pos = self.chunk.len();
            if !self.read_chunk()? {
                return Err(general_err!("Skip past end of stream"));
            }
        }
    }

    /// Decompresses the chunk at `offset`, `false` at the end of the stream.
    fn read_chunk(&mut self) -> Result<bool> {
        if self.offset == self.data.len() {
            return Ok(false);
        }
        let header = self
            .data
            .get(self.offset..self.offset + CHUNK_HEADER_SIZE)
            .ok_or_else(|| general_err!("Truncated chunk header at {}", self.offset))?;
        let codec = Compression::from_codec(header[0])?;
        let compressed_size = u32::from_le_bytes([header[1], header[2], header[3], header[4]]);
        let uncompressed_size = u32::from_le_bytes([header[5], header[6], header[7], header[8]]);
        if uncompressed_size as usize > self.buffer_size {
            return Err(general_err!(
                "Chunk of {} bytes exceeds the buffer size {}",
                uncompressed_size,
                self.buffer_size
            ));
        }

        let start = self.offset + CHUNK_HEADER_SIZE;
        let input = self
            .data
            .get(start..start + compressed_size as usize)
            .ok_or_else(|| general_err!("Truncated chunk at {}", self.offset))?;

        self.chunk.clear();
        self.chunk.resize(uncompressed_size as usize, 0);
        CommonCompression::from(codec).decompress(input, &mut self.chunk)?;
        self.chunk_pos = 0;
        self.offset = start + compressed_size as usize;
        Ok(true)
    }
}

impl Read for InStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        if self.compression.is_none() {
            let n = buf.len().min(self.data.len() - self.offset);
            buf[..n].copy_from_slice(&self.data[self.offset..self.offset + n]);
            self.offset += n;
            return Ok(n);
        }
        while self.chunk_pos == self.chunk.len() {
            let loaded = self
                .read_chunk()
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
            if !loaded {
                return Ok(0);
            }
        }
        let n = buf.len().min(self.chunk.len() - self.chunk_pos);
        buf[..n].copy_from_slice(&self.chunk[self.chunk_pos..self.chunk_pos + n]);
        self.chunk_pos += n;
        Ok(n)
    }
}
