use arrow::array::{Int64Array, Utf8Array};
use rand::{rngs::StdRng, Rng, SeedableRng};
use strawstripe::{
    read::{
        ColumnReader, LongColumnReader, LongReaderVariant, StringColumnReader,
        StringReaderVariant, StripeStreams,
    },
    write::{LongColumnWriter, StringColumnWriter, StripeColumn, WriteOptions},
    ColumnEncoding, ColumnEncodingKind, Compression, RowIndex, RowIndexEntry,
};

const STRIDE: usize = 100;

fn options(compression: Compression) -> WriteOptions {
    WriteOptions {
        compression,
        buffer_size: 1024,
        row_index_stride: STRIDE,
        ..Default::default()
    }
}

/// Column 0 is unused, the tested column is column 1.
fn stripe_inputs(
    column: &StripeColumn,
    options: &WriteOptions,
) -> (StripeStreams, Vec<ColumnEncoding>, Vec<RowIndex>) {
    let mut streams = StripeStreams::default();
    column.add_streams(1, &options.read_options(), &mut streams);
    let encodings = vec![ColumnEncoding::direct(), column.encoding];
    let indexes = vec![RowIndex::default(), column.index.clone()];
    (streams, encodings, indexes)
}

fn long_values(rng: &mut StdRng, len: usize) -> Vec<Option<i64>> {
    (0..len)
        .map(|i| match rng.gen_range(0..10) {
            0 => None,
            1..=5 => Some(i as i64 * 2),
            _ => Some(rng.gen_range(-1000..1000)),
        })
        .collect()
}

fn string_values(rng: &mut StdRng, len: usize, distinct: usize) -> Vec<Option<String>> {
    (0..len)
        .map(|_| match rng.gen_range(0..8) {
            0 => None,
            _ => Some(format!("value-{}", rng.gen_range(0..distinct))),
        })
        .collect()
}

fn write_strings(values: &[Option<String>], options: WriteOptions) -> StripeColumn {
    let mut writer = StringColumnWriter::new(options);
    for value in values {
        writer.write(value.as_deref());
    }
    writer.finish().unwrap()
}

#[test]
fn test_long_column_random_access() {
    let mut rng = StdRng::seed_from_u64(1);
    for compression in [Compression::None, Compression::LZ4, Compression::SNAPPY] {
        let options = options(compression);
        let values = long_values(&mut rng, 1234);
        let mut writer = LongColumnWriter::new(options);
        for value in &values {
            writer.write(*value).unwrap();
        }
        let column = writer.finish().unwrap();
        assert_eq!(column.num_rows, values.len() as u64);
        assert_eq!(column.index.entries.len(), (values.len() + STRIDE - 1) / STRIDE);

        let (mut streams, encodings, indexes) = stripe_inputs(&column, &options);
        let mut reader = LongColumnReader::new(1, STRIDE);
        reader.start_stripe(&mut streams, &encodings, &indexes, 500).unwrap();
        assert!(matches!(reader.variant(), Some(LongReaderVariant::Direct(_))));

        for _ in 0..500 {
            let row = rng.gen_range(0..values.len());
            assert_eq!(reader.get(500 + row as u64).unwrap(), values[row], "row {}", row);
        }
        reader.close().unwrap();
    }
}

#[test]
fn test_long_column_batches() {
    let mut rng = StdRng::seed_from_u64(2);
    let options = options(Compression::ZSTD);
    let values = long_values(&mut rng, 777);
    let mut writer = LongColumnWriter::new(options);
    for value in &values {
        writer.write(*value).unwrap();
    }
    let column = writer.finish().unwrap();
    let (mut streams, encodings, indexes) = stripe_inputs(&column, &options);
    let mut reader = LongColumnReader::new(1, STRIDE);
    reader.start_stripe(&mut streams, &encodings, &indexes, 0).unwrap();

    for (start, len) in [(0usize, 777usize), (650, 127), (10, 300), (399, 1)] {
        let array = reader.read_batch(start as u64, len).unwrap();
        let array = array.as_any().downcast_ref::<Int64Array>().unwrap();
        let expected: Int64Array = values[start..start + len].iter().collect();
        assert_eq!(array, &expected);
    }
}

#[test]
fn test_string_column_across_stripes() {
    let mut rng = StdRng::seed_from_u64(3);
    let options = options(Compression::LZ4);
    let mut reader = StringColumnReader::new(1, STRIDE);

    // few distinct values: dictionary, then mostly unique: direct, then dictionary again
    let stripes = [
        string_values(&mut rng, 640, 5),
        string_values(&mut rng, 333, 100_000),
        string_values(&mut rng, 250, 20),
    ];
    let expected_kinds = [
        ColumnEncodingKind::Dictionary,
        ColumnEncodingKind::Direct,
        ColumnEncodingKind::Dictionary,
    ];

    let mut row_base = 0u64;
    for (values, kind) in stripes.iter().zip(expected_kinds) {
        let column = write_strings(values, options);
        assert_eq!(column.encoding.kind, kind);
        let (mut streams, encodings, indexes) = stripe_inputs(&column, &options);
        reader
            .start_stripe(&mut streams, &encodings, &indexes, row_base)
            .unwrap();
        match kind {
            ColumnEncodingKind::Dictionary => assert!(matches!(
                reader.variant(),
                Some(StringReaderVariant::Dictionary(_))
            )),
            _ => assert!(matches!(
                reader.variant(),
                Some(StringReaderVariant::Direct(_))
            )),
        }

        // backwards through the stripe, every row group is sought
        for row in (0..values.len()).rev() {
            assert_eq!(reader.get(row_base + row as u64).unwrap(), values[row]);
        }

        let array = reader.read_batch(row_base, values.len()).unwrap();
        let array = array.as_any().downcast_ref::<Utf8Array<i32>>().unwrap();
        let expected: Utf8Array<i32> = values.iter().map(|v| v.as_deref()).collect();
        assert_eq!(array, &expected);

        row_base += values.len() as u64;
    }
    reader.close().unwrap();
    reader.close().unwrap();
}

#[test]
fn test_seek_and_skip_rows() {
    let options = options(Compression::None);
    let values: Vec<Option<String>> = (0..450)
        .map(|i| (i % 4 != 1).then(|| format!("{}", i % 7)))
        .collect();
    let column = write_strings(&values, options);
    let (mut streams, encodings, indexes) = stripe_inputs(&column, &options);
    let mut reader = StringColumnReader::new(1, STRIDE);
    reader.start_stripe(&mut streams, &encodings, &indexes, 0).unwrap();

    reader.seek(3).unwrap();
    assert!(!reader.next_is_null_in_complex_type().unwrap());
    assert_eq!(reader.next().unwrap(), values[300].clone().unwrap());

    // rows 301..=305 hold 3 values
    reader.skip_rows_in_complex_type(5).unwrap();
    assert_eq!(reader.get_in_complex_type(306).unwrap(), values[306]);

    // row 308 is present, 309 is null, skip the value of 308 explicitly
    assert!(!reader.next_is_null(308).unwrap());
    reader.skip_rows(1).unwrap();
    assert!(reader.next_is_null(309).unwrap());
    assert_eq!(reader.get(310).unwrap(), values[310]);

    assert!(reader.seek(5).is_err());
}

#[test]
fn test_load_indexes_of_shared_entries() {
    let options = options(Compression::ZSTD);
    let mut writer = LongColumnWriter::new(options);
    for i in 0..250 {
        writer.write((i % 3 != 0).then_some(i)).unwrap();
    }
    let column = writer.finish().unwrap();
    let (mut streams, encodings, _) = stripe_inputs(&column, &options);
    let mut reader = LongColumnReader::new(1, STRIDE);
    reader.start_stripe(&mut streams, &encodings, &[], 0).unwrap();

    // the positions of the column follow those of another column
    let shared: Vec<RowIndexEntry> = column
        .index
        .entries
        .iter()
        .map(|entry| {
            let mut positions = vec![9, 9, 9];
            positions.extend(&entry.positions);
            positions.push(42);
            RowIndexEntry { positions }
        })
        .collect();
    let end = reader.load_indexes(&shared, 3).unwrap();
    assert_eq!(end, 3 + column.index.entries[0].positions.len());

    reader.seek(2).unwrap();
    assert_eq!(reader.get(201).unwrap(), None);
    assert_eq!(reader.get(202).unwrap(), Some(202));
    assert_eq!(reader.get(101).unwrap(), Some(101));
}

#[test]
fn test_missing_stream_fails_stripe_start() {
    let options = options(Compression::None);
    let column = write_strings(&[Some("a".to_owned())], options);
    let (mut streams, encodings, indexes) = stripe_inputs(&column, &options);
    streams.retain(|name, _| name.kind != strawstripe::StreamKind::Length);

    let mut reader = StringColumnReader::new(1, STRIDE);
    assert!(reader
        .start_stripe(&mut streams, &encodings, &indexes, 0)
        .is_err());
    assert!(reader.variant().is_none());
    assert!(reader.get(0).is_err());
}
