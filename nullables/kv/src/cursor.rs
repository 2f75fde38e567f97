use std::marker::PhantomData;

use lmdb_sys::{MDB_FIRST, MDB_NEXT, MDB_SET_RANGE, MDB_cursor_op};
use rocksdb::{DBRawIteratorWithThreadMode, MultiThreaded, TransactionDB};

use crate::ConfiguredDatabase;

type RocksDb = TransactionDB<MultiThreaded>;
pub(crate) type RocksSnapshotIterator = DBRawIteratorWithThreadMode<'static, RocksDb>;
pub(crate) type RocksTxnIterator =
    DBRawIteratorWithThreadMode<'static, rocksdb::Transaction<'static, RocksDb>>;

/// Ordered, seekable cursor over a single table. Keys are yielded in
/// byte-lexicographic order.
pub struct KvCursor<'txn> {
    strategy: CursorStrategy,
    // the inner iterators are transmuted to 'static, this ties the cursor
    // back to its transaction
    _marker: PhantomData<&'txn ()>,
}

pub(crate) enum CursorStrategy {
    Lmdb(lmdb::RoCursor<'static>),
    RocksSnapshot(RocksSnapshotIterator),
    RocksTxn(RocksTxnIterator),
    Nulled(NullCursor),
}

impl<'txn> KvCursor<'txn> {
    pub(crate) fn new(strategy: CursorStrategy) -> Self {
        Self {
            strategy,
            _marker: PhantomData,
        }
    }

    pub fn new_null(database: &ConfiguredDatabase) -> Self {
        Self::new(CursorStrategy::Nulled(NullCursor::new(database)))
    }

    pub fn new_null_empty() -> Self {
        Self::new(CursorStrategy::Nulled(NullCursor {
            entries: Vec::new(),
            position: 0,
        }))
    }

    /// Positions at the first entry
    pub fn first(&mut self) -> Option<(Vec<u8>, Vec<u8>)> {
        match &mut self.strategy {
            CursorStrategy::Lmdb(cursor) => lmdb_get(cursor, None, MDB_FIRST),
            CursorStrategy::RocksSnapshot(it) => {
                it.seek_to_first();
                rocks_item(it)
            }
            CursorStrategy::RocksTxn(it) => {
                it.seek_to_first();
                rocks_item(it)
            }
            CursorStrategy::Nulled(cursor) => cursor.first(),
        }
    }

    /// Positions at the first entry with a key greater than or equal to
    /// the given key
    pub fn seek(&mut self, key: &[u8]) -> Option<(Vec<u8>, Vec<u8>)> {
        match &mut self.strategy {
            CursorStrategy::Lmdb(cursor) => lmdb_get(cursor, Some(key), MDB_SET_RANGE),
            CursorStrategy::RocksSnapshot(it) => {
                it.seek(key);
                rocks_item(it)
            }
            CursorStrategy::RocksTxn(it) => {
                it.seek(key);
                rocks_item(it)
            }
            CursorStrategy::Nulled(cursor) => cursor.seek(key),
        }
    }

    /// Advances to the next entry
    pub fn next(&mut self) -> Option<(Vec<u8>, Vec<u8>)> {
        match &mut self.strategy {
            CursorStrategy::Lmdb(cursor) => lmdb_get(cursor, None, MDB_NEXT),
            CursorStrategy::RocksSnapshot(it) => {
                it.next();
                rocks_item(it)
            }
            CursorStrategy::RocksTxn(it) => {
                it.next();
                rocks_item(it)
            }
            CursorStrategy::Nulled(cursor) => cursor.next(),
        }
    }
}

fn lmdb_get(
    cursor: &mut lmdb::RoCursor<'static>,
    key: Option<&[u8]>,
    operation: MDB_cursor_op,
) -> Option<(Vec<u8>, Vec<u8>)> {
    use lmdb::Cursor;
    match cursor.get(key, None, operation) {
        Ok((Some(k), v)) => Some((k.to_vec(), v.to_vec())),
        Ok((None, _)) => panic!("cursor read returned no key"),
        Err(lmdb::Error::NotFound) => None,
        Err(e) => panic!("could not read from cursor: {:?}", e),
    }
}

fn rocks_item<D: rocksdb::DBAccess>(
    it: &mut DBRawIteratorWithThreadMode<'static, D>,
) -> Option<(Vec<u8>, Vec<u8>)> {
    if it.valid() {
        let (key, value) = it.item()?;
        Some((key.to_vec(), value.to_vec()))
    } else {
        None
    }
}

pub(crate) struct NullCursor {
    entries: Vec<(Vec<u8>, Vec<u8>)>,
    position: usize,
}

impl NullCursor {
    fn new(database: &ConfiguredDatabase) -> Self {
        Self {
            entries: database
                .entries
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            position: 0,
        }
    }

    fn first(&mut self) -> Option<(Vec<u8>, Vec<u8>)> {
        self.position = 0;
        self.current()
    }

    fn seek(&mut self, key: &[u8]) -> Option<(Vec<u8>, Vec<u8>)> {
        self.position = self
            .entries
            .partition_point(|(k, _)| k.as_slice() < key);
        self.current()
    }

    fn next(&mut self) -> Option<(Vec<u8>, Vec<u8>)> {
        self.position += 1;
        self.current()
    }

    fn current(&self) -> Option<(Vec<u8>, Vec<u8>)> {
        self.entries.get(self.position).cloned()
    }
}
