use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use rocksdb::SnapshotWithThreadMode;

use crate::{
    Backend, ConfiguredDatabase, Database, KvCursor, KvError, Result, Transaction,
    cursor::CursorStrategy,
    rocks_env::RocksDb,
};

pub struct ReadTransaction {
    strategy: ReadTxnStrategy,
    start: Instant,
}

impl ReadTransaction {
    pub(crate) fn new_lmdb(txn: lmdb::RoTransaction<'static>) -> Self {
        Self {
            strategy: ReadTxnStrategy::Lmdb(RoTransactionWrapper(txn)),
            start: Instant::now(),
        }
    }

    pub(crate) fn new_rocks(db: Arc<RocksDb>) -> Self {
        Self {
            strategy: ReadTxnStrategy::Rocks(RocksReadInner::new(db)),
            start: Instant::now(),
        }
    }

    pub fn new_null(databases: Vec<ConfiguredDatabase>) -> Self {
        Self {
            strategy: ReadTxnStrategy::Nulled(RoTransactionStub { databases }),
            start: Instant::now(),
        }
    }

    pub fn commit(self) {
        if let ReadTxnStrategy::Lmdb(s) = self.strategy {
            s.commit();
        }
    }

    /// Releases the snapshot and acquires a fresh one
    pub fn refresh(self) -> Self {
        match self.strategy {
            ReadTxnStrategy::Lmdb(s) => Self::new_lmdb(s.renew()),
            ReadTxnStrategy::Rocks(s) => Self::new_rocks(s.into_db()),
            ReadTxnStrategy::Nulled(s) => Self::new_null(s.databases),
        }
    }
}

impl Transaction for ReadTransaction {
    fn backend(&self) -> Backend {
        match &self.strategy {
            ReadTxnStrategy::Lmdb(_) | ReadTxnStrategy::Nulled(_) => Backend::Lmdb,
            ReadTxnStrategy::Rocks(_) => Backend::Rocksdb,
        }
    }

    fn is_refresh_needed_with(&self, max_duration: Duration) -> bool {
        self.start.elapsed() > max_duration
    }

    fn get(&self, database: Database, key: &[u8]) -> Result<Vec<u8>> {
        match &self.strategy {
            ReadTxnStrategy::Lmdb(s) => s.get(database, key),
            ReadTxnStrategy::Rocks(s) => s.get(database, key),
            ReadTxnStrategy::Nulled(s) => s.get(database, key),
        }
    }

    fn cursor(&self, database: Database) -> Result<KvCursor<'_>> {
        match &self.strategy {
            ReadTxnStrategy::Lmdb(s) => s.cursor(database),
            ReadTxnStrategy::Rocks(s) => s.cursor(database),
            ReadTxnStrategy::Nulled(s) => Ok(s.cursor(database)),
        }
    }

    fn count(&self, database: Database) -> u64 {
        match &self.strategy {
            ReadTxnStrategy::Lmdb(s) => s.count(database),
            ReadTxnStrategy::Rocks(s) => s.count(database),
            ReadTxnStrategy::Nulled(s) => s.count(database),
        }
    }
}

enum ReadTxnStrategy {
    Lmdb(RoTransactionWrapper),
    Rocks(RocksReadInner),
    Nulled(RoTransactionStub),
}

struct RoTransactionWrapper(lmdb::RoTransaction<'static>);

impl RoTransactionWrapper {
    fn commit(self) {
        lmdb::Transaction::commit(self.0).expect("Commit failed");
    }

    fn renew(self) -> lmdb::RoTransaction<'static> {
        self.0
            .reset()
            .renew()
            .expect("Could not renew transaction")
    }

    fn get(&self, database: Database, key: &[u8]) -> Result<Vec<u8>> {
        let bytes = lmdb::Transaction::get(&self.0, database.as_lmdb(), &key)?;
        Ok(bytes.to_vec())
    }

    fn cursor(&self, database: Database) -> Result<KvCursor<'_>> {
        let cursor = lmdb::Transaction::open_ro_cursor(&self.0, database.as_lmdb())?;
        let cursor =
            unsafe { std::mem::transmute::<lmdb::RoCursor<'_>, lmdb::RoCursor<'static>>(cursor) };
        Ok(KvCursor::new(CursorStrategy::Lmdb(cursor)))
    }

    fn count(&self, database: Database) -> u64 {
        let stat = lmdb::Transaction::stat(&self.0, database.as_lmdb());
        stat.map(|s| s.entries() as u64).unwrap_or_default()
    }
}

pub(crate) struct RocksReadInner {
    // declared before `db` so the snapshot is released first
    snapshot: SnapshotWithThreadMode<'static, RocksDb>,
    db: Arc<RocksDb>,
}

impl RocksReadInner {
    fn new(db: Arc<RocksDb>) -> Self {
        let snapshot = db.snapshot();
        // The snapshot borrows the database which we keep alive through
        // the Arc next to it
        let snapshot = unsafe {
            std::mem::transmute::<
                SnapshotWithThreadMode<'_, RocksDb>,
                SnapshotWithThreadMode<'static, RocksDb>,
            >(snapshot)
        };
        Self { snapshot, db }
    }

    fn into_db(self) -> Arc<RocksDb> {
        let Self { snapshot, db } = self;
        drop(snapshot);
        db
    }

    fn get(&self, database: Database, key: &[u8]) -> Result<Vec<u8>> {
        let cf = self
            .db
            .cf_handle(database.as_rocks())
            .ok_or(KvError::NotFound)?;
        match self.snapshot.get_cf(&cf, key) {
            Ok(Some(value)) => Ok(value),
            Ok(None) => Err(KvError::NotFound),
            Err(e) => Err(e.into()),
        }
    }

    fn cursor(&self, database: Database) -> Result<KvCursor<'_>> {
        let cf = self
            .db
            .cf_handle(database.as_rocks())
            .ok_or(KvError::NotFound)?;
        let it = self.snapshot.raw_iterator_cf(&cf);
        let it = unsafe {
            std::mem::transmute::<
                rocksdb::DBRawIteratorWithThreadMode<'_, RocksDb>,
                rocksdb::DBRawIteratorWithThreadMode<'static, RocksDb>,
            >(it)
        };
        Ok(KvCursor::new(CursorStrategy::RocksSnapshot(it)))
    }

    fn count(&self, database: Database) -> u64 {
        let Ok(mut cursor) = self.cursor(database) else {
            return 0;
        };
        let mut count = 0;
        let mut current = cursor.first();
        while current.is_some() {
            count += 1;
            current = cursor.next();
        }
        count
    }
}

struct RoTransactionStub {
    databases: Vec<ConfiguredDatabase>,
}

impl RoTransactionStub {
    fn get_database(&self, database: Database) -> Option<&ConfiguredDatabase> {
        self.databases.iter().find(|d| d.dbi == database)
    }

    fn get(&self, database: Database, key: &[u8]) -> Result<Vec<u8>> {
        let Some(db) = self.get_database(database) else {
            return Err(KvError::NotFound);
        };
        db.entries.get(key).cloned().ok_or(KvError::NotFound)
    }

    fn cursor(&self, database: Database) -> KvCursor<'_> {
        match self.get_database(database) {
            Some(db) => KvCursor::new_null(db),
            None => KvCursor::new_null_empty(),
        }
    }

    fn count(&self, database: Database) -> u64 {
        self.get_database(database)
            .map(|db| db.entries.len())
            .unwrap_or_default() as u64
    }
}
