use std::{cmp::Ordering, ops::Bound};

use opal_nullable_kv::KvCursor;

/// Full ordered scan over a table, converting raw entries into typed
/// records
pub struct TableIterator<'txn, K, V> {
    cursor: KvCursor<'txn>,
    initialized: bool,
    convert: fn(&[u8], &[u8]) -> (K, V),
}

impl<'txn, K, V> TableIterator<'txn, K, V> {
    pub fn new(cursor: KvCursor<'txn>, convert: fn(&[u8], &[u8]) -> (K, V)) -> Self {
        Self {
            cursor,
            initialized: false,
            convert,
        }
    }
}

impl<K, V> Iterator for TableIterator<'_, K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        let entry = if !self.initialized {
            self.initialized = true;
            self.cursor.first()
        } else {
            self.cursor.next()
        };
        entry.map(|(k, v)| (self.convert)(&k, &v))
    }
}

/// Ordered scan over a key range of a table
pub struct RangeIterator<'txn, K, V> {
    cursor: KvCursor<'txn>,
    start: Bound<Vec<u8>>,
    end: Bound<Vec<u8>>,
    initialized: bool,
    empty: bool,
    convert: fn(&[u8], &[u8]) -> (K, V),
}

impl<'txn, K, V> RangeIterator<'txn, K, V> {
    pub fn new(
        cursor: KvCursor<'txn>,
        start: Bound<Vec<u8>>,
        end: Bound<Vec<u8>>,
        convert: fn(&[u8], &[u8]) -> (K, V),
    ) -> Self {
        Self {
            cursor,
            start,
            end,
            initialized: false,
            empty: false,
            convert,
        }
    }

    pub fn empty(convert: fn(&[u8], &[u8]) -> (K, V)) -> Self {
        Self {
            cursor: KvCursor::new_null_empty(),
            start: Bound::Unbounded,
            end: Bound::Unbounded,
            initialized: false,
            empty: true,
            convert,
        }
    }

    fn get_next_entry(&mut self) -> Option<(Vec<u8>, Vec<u8>)> {
        if self.empty {
            None
        } else if !self.initialized {
            self.initialized = true;
            self.get_first_entry()
        } else {
            self.cursor.next()
        }
    }

    fn get_first_entry(&mut self) -> Option<(Vec<u8>, Vec<u8>)> {
        match self.start.clone() {
            Bound::Included(start) => self.cursor.seek(&start),
            Bound::Excluded(start) => {
                let mut entry = self.cursor.seek(&start);
                while let Some((key, _)) = &entry {
                    if key != &start {
                        break;
                    }
                    entry = self.cursor.next();
                }
                entry
            }
            Bound::Unbounded => self.cursor.first(),
        }
    }

    fn should_include(&self, key: &[u8]) -> bool {
        match &self.end {
            Bound::Included(end) => {
                matches!(key.cmp(end.as_slice()), Ordering::Less | Ordering::Equal)
            }
            Bound::Excluded(end) => matches!(key.cmp(end.as_slice()), Ordering::Less),
            Bound::Unbounded => true,
        }
    }
}

impl<K, V> Iterator for RangeIterator<'_, K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        let (key, value) = self.get_next_entry()?;
        if self.should_include(&key) {
            Some((self.convert)(&key, &value))
        } else {
            None
        }
    }
}
