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

use bytes::Bytes;
use rand::{rngs::StdRng, Rng, SeedableRng};
use strawstripe::{
    encodings::{
        read_integer, IntegerEncoding, RunHeader, RunLengthIntegerReader, RunLengthIntegerWriter,
    },
    position::{PositionCursor, RecordPosition},
    read::{InStream, ReadOptions},
    write::OutStream,
    Compression,
};

#[derive(Debug, PartialEq)]
enum Run {
    FixedDelta { base: i64, delta: i64, count: usize },
    Literal(Vec<i64>),
}

fn encode(values: &[i64], encoding: IntegerEncoding) -> Vec<u8> {
    let mut writer =
        RunLengthIntegerWriter::new(OutStream::new(vec![], Compression::None, 1 << 16), encoding);
    for value in values {
        writer.write(*value).unwrap();
    }
    writer.into_inner().unwrap().into_inner().unwrap()
}

fn decode(bytes: &[u8], encoding: IntegerEncoding) -> Vec<i64> {
    let mut reader = RunLengthIntegerReader::new(bytes, encoding);
    let mut values = vec![];
    while reader.has_next().unwrap() {
        values.push(reader.next().unwrap());
    }
    values
}

fn runs(mut bytes: &[u8], encoding: IntegerEncoding) -> Vec<Run> {
    let mut runs = vec![];
    while let Some((control, rest)) = bytes.split_first() {
        bytes = rest;
        match RunHeader::from_control(*control) {
            RunHeader::FixedDelta { count } => {
                let delta = bytes[0] as i8 as i64;
                bytes = &bytes[1..];
                let base = read_integer(&mut bytes, &encoding).unwrap();
                runs.push(Run::FixedDelta { base, delta, count });
            }
            RunHeader::Literal { count } => {
                let values = (0..count)
                    .map(|_| read_integer(&mut bytes, &encoding).unwrap())
                    .collect();
                runs.push(Run::Literal(values));
            }
        }
    }
    runs
}

fn value_in_range(rng: &mut StdRng, encoding: &IntegerEncoding) -> i64 {
    if encoding.use_vints() || encoding.num_bytes() == 8 {
        return rng.gen();
    }
    let bits = encoding.num_bytes() as u32 * 8;
    if encoding.is_signed() {
        let bound = 1i64 << (bits - 1);
        rng.gen_range(-bound..bound)
    } else {
        rng.gen_range(0..1i64 << bits)
    }
}

/// Random mix of literal stretches, repeats and small-step progressions.
fn random_values(rng: &mut StdRng, encoding: &IntegerEncoding, len: usize) -> Vec<i64> {
    let mut values = Vec::with_capacity(len);
    while values.len() < len {
        let remaining = len - values.len();
        match rng.gen_range(0..3) {
            0 => {
                for _ in 0..rng.gen_range(1..=remaining.min(200)) {
                    values.push(value_in_range(rng, encoding));
                }
            }
            kind => {
                let delta = if kind == 1 { 0 } else { rng.gen_range(-3..=3) };
                let base = value_in_range(rng, encoding);
                for i in 0..rng.gen_range(1..=remaining.min(400)) as i64 {
                    let value = base.wrapping_add(delta * i);
                    if encoding.can_represent(value) {
                        values.push(value);
                    } else {
                        values.push(value_in_range(rng, encoding));
                    }
                }
            }
        }
    }
    values
}

#[test]
fn test_round_trip_every_encoding() {
    let mut rng = StdRng::seed_from_u64(42);
    for signed in [true, false] {
        for num_bytes in [1, 2, 4, 8] {
            for use_vints in [true, false] {
                let encoding = IntegerEncoding::try_new(signed, num_bytes, use_vints).unwrap();
                let values = random_values(&mut rng, &encoding, 5000);
                let bytes = encode(&values, encoding);
                assert_eq!(decode(&bytes, encoding), values, "{:?}", encoding);
            }
        }
    }
}

#[test]
fn test_extreme_values() {
    let values = [i64::MIN, i64::MAX, -1, 0, i64::MIN, i64::MIN, i64::MIN, i64::MAX];
    for encoding in [
        IntegerEncoding::signed_vint(),
        IntegerEncoding::unsigned_vint(),
        IntegerEncoding::try_new(true, 8, false).unwrap(),
        IntegerEncoding::try_new(false, 8, false).unwrap(),
    ] {
        assert_eq!(decode(&encode(&values, encoding), encoding), values);
    }
}

#[test]
fn test_constant_delta_chunks() {
    let encoding = IntegerEncoding::signed_vint();
    for len in [3usize, 130, 133, 390, 1000] {
        let values: Vec<i64> = (0..len as i64).map(|i| 7 - 3 * i).collect();
        let runs = runs(&encode(&values, encoding), encoding);
        assert_eq!(runs.len(), (len + 129) / 130);
        for (i, run) in runs.iter().enumerate() {
            let expected_count = if i + 1 == runs.len() && len % 130 != 0 {
                len % 130
            } else {
                130
            };
            assert_eq!(
                run,
                &Run::FixedDelta {
                    base: values[i * 130],
                    delta: -3,
                    count: expected_count
                }
            );
        }
    }
}

#[test]
fn test_literal_only_runs() {
    let encoding = IntegerEncoding::unsigned_vint();
    // consecutive deltas always differ
    let values: Vec<i64> = (0..1000i64).map(|i| i * i).collect();
    let runs = runs(&encode(&values, encoding), encoding);
    let mut decoded = vec![];
    for run in runs {
        match run {
            Run::Literal(run) => {
                assert!(!run.is_empty() && run.len() <= 128);
                decoded.extend(run);
            }
            run => panic!("unexpected {:?}", run),
        }
    }
    assert_eq!(decoded, values);
}

#[test]
fn test_run_structure() {
    let encoding = IntegerEncoding::unsigned_vint();
    assert_eq!(
        runs(&encode(&[5, 9, 20, 40, 60], encoding), encoding),
        vec![
            Run::Literal(vec![5, 9]),
            Run::FixedDelta {
                base: 20,
                delta: 20,
                count: 3
            },
        ]
    );
    assert_eq!(
        runs(&encode(&[1, 2, 3], encoding), encoding),
        vec![Run::FixedDelta {
            base: 1,
            delta: 1,
            count: 3
        }]
    );
    assert_eq!(
        runs(&encode(&[7, 2, 19, 4, 1000], encoding), encoding),
        vec![Run::Literal(vec![7, 2, 19, 4, 1000])]
    );
    // a delta outside a signed byte never starts a run
    assert_eq!(
        runs(&encode(&[0, 200, 400, 600], encoding), encoding),
        vec![Run::Literal(vec![0, 200, 400, 600])]
    );
}

#[test]
fn test_flush_twice() {
    let mut writer = RunLengthIntegerWriter::new(
        OutStream::new(vec![], Compression::None, 1024),
        IntegerEncoding::signed_vint(),
    );
    for value in [4, 4, 4, 4, 9] {
        writer.write(value).unwrap();
    }
    writer.flush().unwrap();
    let len = writer.get_ref().len();
    writer.flush().unwrap();
    assert_eq!(writer.get_ref().len(), len);
}

fn seek_to_every_bookmark(values: &[i64], compression: Compression, buffer_size: usize) {
    let encoding = IntegerEncoding::signed_vint();
    let mut writer =
        RunLengthIntegerWriter::new(OutStream::new(vec![], compression, buffer_size), encoding);
    let mut bookmarks = Vec::with_capacity(values.len());
    for value in values {
        let mut positions = vec![];
        writer.record_position(&mut positions);
        bookmarks.push(positions);
        writer.write(*value).unwrap();
    }
    let bytes = writer.into_inner().unwrap().into_inner().unwrap();

    let options = ReadOptions {
        compression,
        buffer_size,
    };
    let stream = InStream::new(Bytes::from(bytes), &options);
    let mut reader = RunLengthIntegerReader::new(stream, encoding);
    assert_eq!(reader.position_count(), bookmarks[0].len());
    for i in (0..values.len()).rev() {
        let mut cursor = PositionCursor::new(&bookmarks[i]);
        reader.seek(&mut cursor).unwrap();
        assert_eq!(cursor.remaining(), 0);
        assert_eq!(reader.next().unwrap(), values[i], "bookmark {}", i);
        if i + 2 < values.len() {
            reader.skip(1).unwrap();
            assert_eq!(reader.next().unwrap(), values[i + 2]);
        }
    }
}

#[test]
fn test_seek_to_every_bookmark() {
    let mut rng = StdRng::seed_from_u64(7);
    let encoding = IntegerEncoding::signed_vint();
    let random = random_values(&mut rng, &encoding, 2000);
    // literal runs carved out in front of a fixed delta run
    let carve_out = [5, 9, 20, 40, 60, 80, 1, 2, 100, 3, 5, 7, 9, 11, 4, 4];
    for (compression, buffer_size) in [
        (Compression::None, 1 << 16),
        (Compression::LZ4, 64),
        (Compression::ZSTD, 100),
        (Compression::SNAPPY, 1000),
    ] {
        seek_to_every_bookmark(&random, compression, buffer_size);
        seek_to_every_bookmark(&carve_out, compression, buffer_size);
    }
}

#[test]
fn test_seek_past_end() {
    let encoding = IntegerEncoding::signed_vint();
    let bytes = encode(&[1, 2, 3], encoding);
    let options = ReadOptions::default();
    let stream = InStream::new(Bytes::from(bytes), &options);
    let mut reader = RunLengthIntegerReader::new(stream, encoding);
    assert!(reader.seek(&mut PositionCursor::new(&[0, 4])).is_err());
    assert!(reader.seek(&mut PositionCursor::new(&[0])).is_err());
}

#[test]
fn test_skip_matches_next() {
    let mut rng = StdRng::seed_from_u64(3);
    let encoding = IntegerEncoding::try_new(true, 4, false).unwrap();
    let values = random_values(&mut rng, &encoding, 3000);
    let bytes = encode(&values, encoding);
    let mut reader = RunLengthIntegerReader::new(bytes.as_slice(), encoding);
    let mut i = 0;
    while i < values.len() {
        assert_eq!(reader.next().unwrap(), values[i]);
        let skip = rng.gen_range(0..300).min(values.len() - i - 1);
        reader.skip(skip as u64).unwrap();
        i += skip + 1;
    }
    assert!(!reader.has_next().unwrap());
}
