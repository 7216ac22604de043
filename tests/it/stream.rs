use std::io::{Read, Seek, SeekFrom, Write};

use bytes::Bytes;
use rand::{rngs::StdRng, Rng, SeedableRng};
use strawstripe::{
    encodings::{IntegerEncoding, RunLengthIntegerReader, RunLengthIntegerWriter},
    position::{PositionCursor, RecordPosition},
    read::{InStream, ReadOptions},
    write::{OutStream, PositionedWrite},
    Compression,
};

#[test]
fn test_file_backed_stream() {
    let mut rng = StdRng::seed_from_u64(11);
    for compression in [Compression::None, Compression::LZ4, Compression::ZSTD] {
        let file = tempfile::tempfile().unwrap();
        let encoding = IntegerEncoding::unsigned_vint();
        let mut writer =
            RunLengthIntegerWriter::new(OutStream::new(file, compression, 512), encoding);

        let mut values = vec![];
        let mut bookmarks = vec![];
        for i in 0..20_000i64 {
            if i % 1000 == 0 {
                let mut positions = vec![];
                writer.record_position(&mut positions);
                bookmarks.push((values.len(), positions));
            }
            let value = if rng.gen_bool(0.5) {
                i / 10
            } else {
                rng.gen_range(0..1 << 20)
            };
            writer.write(value).unwrap();
            values.push(value);
        }

        let mut file = writer.into_inner().unwrap().into_inner().unwrap();
        file.seek(SeekFrom::Start(0)).unwrap();
        let mut bytes = vec![];
        file.read_to_end(&mut bytes).unwrap();

        let options = ReadOptions {
            compression,
            buffer_size: 512,
        };
        let mut reader =
            RunLengthIntegerReader::new(InStream::new(Bytes::from(bytes), &options), encoding);
        for (start, positions) in bookmarks.iter().rev() {
            reader.seek(&mut PositionCursor::new(positions)).unwrap();
            let mut batch = vec![];
            reader.next_batch(&mut batch, 1000).unwrap();
            assert_eq!(batch, values[*start..*start + 1000]);
        }
    }
}

#[test]
fn test_flush_buffer_releases_memory() {
    let mut stream = OutStream::new(vec![], Compression::SNAPPY, 4096);
    stream.write_all(&[7u8; 100]).unwrap();
    assert!(stream.buffer_size() >= 100);
    stream.flush_buffer(false).unwrap();
    assert_eq!(stream.buffer_size(), 0);

    stream.write_all(&[8u8; 100]).unwrap();
    stream.flush_buffer(true).unwrap();
    assert!(stream.buffer_size() > 0);

    let bytes = stream.into_inner().unwrap();
    let options = ReadOptions {
        compression: Compression::SNAPPY,
        buffer_size: 4096,
    };
    let mut output = vec![];
    InStream::new(Bytes::from(bytes), &options)
        .read_to_end(&mut output)
        .unwrap();
    assert_eq!(output[..100], [7u8; 100]);
    assert_eq!(output[100..], [8u8; 100]);
}

#[test]
fn test_incompressible_chunks_are_stored() {
    let mut rng = StdRng::seed_from_u64(5);
    let input: Vec<u8> = (0..1000).map(|_| rng.gen()).collect();
    let mut stream = OutStream::new(vec![], Compression::ZSTD, 256);
    stream.write_all(&input).unwrap();
    let bytes = stream.into_inner().unwrap();
    // stored chunks carry codec 0
    assert_eq!(bytes[0], 0);

    let options = ReadOptions {
        compression: Compression::ZSTD,
        buffer_size: 256,
    };
    let mut output = vec![];
    InStream::new(Bytes::from(bytes), &options)
        .read_to_end(&mut output)
        .unwrap();
    assert_eq!(output, input);
}
