mod basic;

use arrow::error::Result;

pub(crate) use self::basic::CommonCompression;

/// codec(1 byte) + compressed size(4 bytes) + uncompressed size(4 bytes)
pub(crate) const CHUNK_HEADER_SIZE: usize = 9;

/// Compression codec applied to the chunks of a stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Compression {
    None,
    LZ4,
    ZSTD,
    SNAPPY,
}

impl Default for Compression {
    fn default() -> Self {
        Self::None
    }
}

impl Compression {
    pub fn is_none(&self) -> bool {
        matches!(self, Compression::None)
    }

    pub fn from_codec(t: u8) -> Result<Self> {
        match t {
            0 => Ok(Compression::None),
            1 => Ok(Compression::LZ4),
            2 => Ok(Compression::ZSTD),
            3 => Ok(Compression::SNAPPY),
            other => Err(general_err!("Unknown compression codec {}", other)),
        }
    }
}

impl From<Compression> for u8 {
    fn from(value: Compression) -> Self {
        match value {
            Compression::None => 0,
            Compression::LZ4 => 1,
            Compression::ZSTD => 2,
            Compression::SNAPPY => 3,
        }
    }
}
