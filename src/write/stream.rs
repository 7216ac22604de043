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

use std::io::{self, Write};

use arrow::error::Result;

use crate::compression::{CommonCompression, CHUNK_HEADER_SIZE};
use crate::position::{PositionRecorder, RecordPosition};
use crate::Compression;

/// A byte sink whose position can be bookmarked.
pub trait PositionedWrite: Write + RecordPosition {
    /// Memory currently held for buffering.
    fn buffer_size(&self) -> usize;

    /// Writes out everything buffered. Unless `reuse_buffer` is set the buffers are released.
    fn flush_buffer(&mut self, reuse_buffer: bool) -> Result<()>;
}

/// Buffers the bytes of one stream and writes them out in chunks.
///
/// Without compression the chunks are written as they are. Otherwise every chunk
/// is prefixed by the compression header and holds at most `buffer_size`
/// uncompressed bytes; a chunk that does not shrink is stored uncompressed.
pub struct OutStream<W: Write> {
    inner: W,
    compression: Compression,
    codec: CommonCompression,
    buffer_size: usize,
    buffer: Vec<u8>,
    scratch: Vec<u8>,
    // bytes handed to `inner`
    written: u64,
    // bytes accepted through `write`
    len: u64,
}

impl<W: Write> OutStream<W> {
    pub fn new(inner: W, compression: Compression, buffer_size: usize) -> Self {
        Self {
            inner,
            compression,
            codec: CommonCompression::from(compression),
            buffer_size: buffer_size.max(1),
            buffer: vec![],
            scratch: vec![],
            written: 0,
            len: 0,
        }
    }

    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// Number of uncompressed bytes written so far.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Writes out the pending chunk and returns the sink.
    pub fn into_inner(mut self) -> Result<W> {
        self.spill()?;
        self.inner.flush()?;
        Ok(self.inner)
    }

    fn spill(&mut self) -> Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        if self.compression.is_none() {
            self.inner.write_all(&self.buffer)?;
            self.written += self.buffer.len() as u64;
            self.buffer.clear();
            return Ok(());
        }

        self.scratch.clear();
        self.scratch.extend_from_slice(&[0u8; CHUNK_HEADER_SIZE]);
        let mut compressed_size = self.codec.compress(&self.buffer, &mut self.scratch)?;
        let mut codec = self.compression;
        if compressed_size >= self.buffer.len() {
            self.scratch.truncate(CHUNK_HEADER_SIZE);
            self.scratch.extend_from_slice(&self.buffer);
            compressed_size = self.buffer.len();
            codec = Compression::None;
        }
        self.scratch[0] = u8::from(codec);
        self.scratch[1..5].copy_from_slice(&(compressed_size as u32).to_le_bytes());
        self.scratch[5..9].copy_from_slice(&(self.buffer.len() as u32).to_le_bytes());

        log::trace!(
            "write {:?} chunk at {}: {} -> {} bytes",
            codec,
            self.written,
            self.buffer.len(),
            compressed_size
        );

        self.inner.write_all(&self.scratch)?;
        self.written += self.scratch.len() as u64;
        self.buffer.clear();
        Ok(())
    }
}

fn to_io_error(e: arrow::error::Error) -> io::Error {
    io::Error::new(io::ErrorKind::Other, e)
}

impl<W: Write> Write for OutStream<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut rest = buf;
        while !rest.is_empty() {
            let n = rest.len().min(self.buffer_size - self.buffer.len());
            self.buffer.extend_from_slice(&rest[..n]);
            rest = &rest[n..];
            if self.buffer.len() == self.buffer_size {
                self.spill().map_err(to_io_error)?;
            }
        }
        self.len += buf.len() as u64;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.spill().map_err(to_io_error)?;
        self.inner.flush()
    }
}

impl<W: Write> RecordPosition for OutStream<W> {
    /// Uncompressed streams record the byte offset; compressed streams record the
    /// offset of the current chunk and the number of bytes already buffered in it.
    fn record_position(&self, recorder: &mut dyn PositionRecorder) {
        if self.compression.is_none() {
            recorder.add_position(self.written + self.buffer.len() as u64);
        } else {
            recorder.add_position(self.written);
            recorder.add_position(self.buffer.len() as u64);
        }
    }
}

impl<W: Write> PositionedWrite for OutStream<W> {
    fn buffer_size(&self) -> usize {
        self.buffer.capacity() + self.scratch.capacity()
    }

    fn flush_buffer(&mut self, reuse_buffer: bool) -> Result<()> {
        self.spill()?;
        self.inner.flush()?;
        if !reuse_buffer {
            self.buffer = vec![];
            self.scratch = vec![];
        }
        Ok(())
    }
}
