use bytes::Bytes;

use crate::codec::column::{Column, ColumnValues};
use crate::codec::reader::{ColumnReader, ScalarReader};

/// Progress of a plain column.
#[derive(Debug)]
pub enum ScalarState {
    NotStarted,
    ReadingNullsMap,
    /// `strings` and `pending_len` only move for length-prefixed kinds.
    ReadingItems {
        strings: Vec<Bytes>,
        pending_len: Option<usize>,
    },
    Done(ColumnValues),
}

/// Progress of a nested array column.
#[derive(Debug)]
pub enum ArrayState {
    NotStarted,
    /// Dictionary prefix of a low-cardinality leaf, read ahead of the offsets.
    LeafPrefix,
    Offsets {
        layers: Vec<Vec<u64>>,
        current: Vec<u64>,
    },
    Leaf {
        offsets: Vec<Vec<u64>>,
        reader: Box<ColumnReader>,
    },
    Done(Column),
}

/// Progress of a low-cardinality column, one step per wire section.
#[derive(Debug)]
pub enum DictionaryState {
    Version,
    Header,
    Dictionary {
        key_code: u64,
        reader: Box<ScalarReader>,
    },
    RowCount {
        key_code: u64,
        dictionary: Column,
    },
    Keys {
        dictionary: Column,
        reader: Box<ScalarReader>,
    },
    Done(Column),
}

/// Outcome of one state-machine step.
pub(crate) enum Step<S> {
    Advanced(S),
    NeedMore(S),
}
