//! Bookmarks that let a stream reader resume decoding at a row-group start.
//!
//! A writer records, for every stream of a column, the positions that describe
//! "where the next value will go": first the byte position(s) of the underlying
//! sink, then the number of values still pending inside the run-length encoder.
//! A reader consumes the very same positions in the very same order.

use arrow::error::Result;

use crate::RowIndexEntry;

/// Receives the positions of a bookmark as they are recorded.
pub trait PositionRecorder {
    fn add_position(&mut self, position: u64);
}

impl PositionRecorder for Vec<u64> {
    fn add_position(&mut self, position: u64) {
        self.push(position);
    }
}

impl PositionRecorder for RowIndexEntry {
    fn add_position(&mut self, position: u64) {
        self.positions.push(position);
    }
}

/// Hands out the positions of a bookmark in recording order.
pub trait PositionProvider {
    fn next_position(&mut self) -> Result<u64>;
}

/// Something whose current position can be bookmarked.
pub trait RecordPosition {
    fn record_position(&self, recorder: &mut dyn PositionRecorder);
}

#[derive(Debug, Clone)]
pub struct PositionCursor<'a> {
    positions: &'a [u64],
    index: usize,
}

impl<'a> PositionCursor<'a> {
    pub fn new(positions: &'a [u64]) -> Self {
        Self {
            positions,
            index: 0,
        }
    }

    pub fn remaining(&self) -> usize {
        self.positions.len() - self.index
    }
}

impl<'a> PositionProvider for PositionCursor<'a> {
    fn next_position(&mut self) -> Result<u64> {
        match self.positions.get(self.index) {
            Some(position) => {
                self.index += 1;
                Ok(*position)
            }
            None => Err(general_err!(
                "Bookmark holds {} positions, more were requested",
                self.positions.len()
            )),
        }
    }
}
