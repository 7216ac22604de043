#[macro_use]
mod errors;

mod compression;
pub mod encodings;
pub mod position;

pub use compression::Compression;

pub mod read;
pub mod write;

use arrow::error::Result;

/// The role a stream plays for its column inside a stripe.
#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize,
)]
pub enum StreamKind {
    /// Run-length encoded presence flags, omitted when the column has no nulls.
    Present,
    Data,
    Length,
    DictionaryData,
}

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize,
)]
pub struct StreamName {
    pub column: u32,
    pub kind: StreamKind,
}

impl StreamName {
    pub fn new(column: u32, kind: StreamKind) -> Self {
        Self { column, kind }
    }
}

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize,
)]
pub enum ColumnEncodingKind {
    Direct,
    Dictionary,
    DirectV2,
    DictionaryV2,
}

impl ColumnEncodingKind {
    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            0 => Ok(Self::Direct),
            1 => Ok(Self::Dictionary),
            2 => Ok(Self::DirectV2),
            3 => Ok(Self::DictionaryV2),
            other => Err(general_err!("Unknown column encoding kind {}", other)),
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            Self::Direct => 0,
            Self::Dictionary => 1,
            Self::DirectV2 => 2,
            Self::DictionaryV2 => 3,
        }
    }
}

/// Per-stripe encoding of one column.
#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize,
)]
pub struct ColumnEncoding {
    pub kind: ColumnEncodingKind,
    // number of dictionary entries, zero for direct encodings
    pub dictionary_size: u32,
}

impl ColumnEncoding {
    pub fn direct() -> Self {
        Self {
            kind: ColumnEncodingKind::Direct,
            dictionary_size: 0,
        }
    }

    pub fn dictionary(dictionary_size: u32) -> Self {
        Self {
            kind: ColumnEncodingKind::Dictionary,
            dictionary_size,
        }
    }
}

/// Bookmarks of every stream of one column at the start of a row group.
#[derive(
    Clone,
    Debug,
    Default,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct RowIndexEntry {
    pub positions: Vec<u64>,
}

#[derive(
    Clone,
    Debug,
    Default,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct RowIndex {
    pub entries: Vec<RowIndexEntry>,
}

impl RowIndex {
    pub fn new(entries: Vec<RowIndexEntry>) -> Self {
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
