use arrow::error::{Error, Result};

use crate::Compression;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommonCompression {
    None,
    LZ4,
    ZSTD,
    SNAPPY,
}

impl From<Compression> for CommonCompression {
    fn from(value: Compression) -> Self {
        match value {
            Compression::None => CommonCompression::None,
            Compression::LZ4 => CommonCompression::LZ4,
            Compression::ZSTD => CommonCompression::ZSTD,
            Compression::SNAPPY => CommonCompression::SNAPPY,
        }
    }
}

impl CommonCompression {
    /// Decompress `input` into `out_slice`, which must be exactly the uncompressed size.
    pub fn decompress(&self, input: &[u8], out_slice: &mut [u8]) -> Result<()> {
        let size = match self {
            Self::LZ4 => decompress_lz4(input, out_slice),
            Self::ZSTD => decompress_zstd(input, out_slice),
            Self::SNAPPY => decompress_snappy(input, out_slice),
            Self::None => {
                if input.len() != out_slice.len() {
                    return Err(general_err!(
                        "Uncompressed chunk holds {} bytes, expected {}",
                        input.len(),
                        out_slice.len()
                    ));
                }
                out_slice.copy_from_slice(input);
                Ok(input.len())
            }
        }?;
        if size != out_slice.len() {
            return Err(general_err!(
                "Decompressed {} bytes, expected {}",
                size,
                out_slice.len()
            ));
        }
        Ok(())
    }

    /// Append the compressed form of `input_buf` to `output_buf`, returning the appended size.
    pub fn compress(&self, input_buf: &[u8], output_buf: &mut Vec<u8>) -> Result<usize> {
        match self {
            Self::LZ4 => compress_lz4(input_buf, output_buf),
            Self::ZSTD => compress_zstd(input_buf, output_buf),
            Self::SNAPPY => compress_snappy(input_buf, output_buf),
            Self::None => {
                output_buf.extend_from_slice(input_buf);
                Ok(input_buf.len())
            }
        }
    }
}

pub fn decompress_lz4(input_buf: &[u8], output_buf: &mut [u8]) -> Result<usize> {
    lz4::block::decompress_to_buffer(input_buf, Some(output_buf.len() as i32), output_buf)
        .map_err(|e| e.into())
}

pub fn decompress_zstd(input_buf: &[u8], output_buf: &mut [u8]) -> Result<usize> {
    zstd::bulk::decompress_to_buffer(input_buf, output_buf).map_err(|e| e.into())
}

pub fn decompress_snappy(input_buf: &[u8], output_buf: &mut [u8]) -> Result<usize> {
    snap::raw::Decoder::new()
        .decompress(input_buf, output_buf)
        .map_err(|e| Error::External("decompress snappy failed".to_owned(), Box::new(e)))
}

pub fn compress_lz4(input_buf: &[u8], output_buf: &mut Vec<u8>) -> Result<usize> {
    let start = output_buf.len();
    let bound = lz4::block::compress_bound(input_buf.len())?;
    output_buf.resize(start + bound, 0);
    let size = lz4::block::compress_to_buffer(input_buf, None, false, &mut output_buf[start..])?;
    output_buf.truncate(start + size);
    Ok(size)
}

pub fn compress_zstd(input_buf: &[u8], output_buf: &mut Vec<u8>) -> Result<usize> {
    let start = output_buf.len();
    let bound = zstd::zstd_safe::compress_bound(input_buf.len());
    output_buf.resize(start + bound, 0);
    let size = zstd::bulk::compress_to_buffer(input_buf, &mut output_buf[start..], 0)?;
    output_buf.truncate(start + size);
    Ok(size)
}

pub fn compress_snappy(input_buf: &[u8], output_buf: &mut Vec<u8>) -> Result<usize> {
    let start = output_buf.len();
    let bound = snap::raw::max_compress_len(input_buf.len());
    output_buf.resize(start + bound, 0);
    let size = snap::raw::Encoder::new()
        .compress(input_buf, &mut output_buf[start..])
        .map_err(|e| Error::External("compress snappy failed".to_owned(), Box::new(e)))?;
    output_buf.truncate(start + size);
    Ok(size)
}
