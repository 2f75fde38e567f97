use std::{
    rc::Rc,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use opal_output_tracker::{OutputListener, OutputTracker};

use crate::{
    Backend, ConfiguredDatabase, Database, KvCursor, KvError, Result, Transaction,
    cursor::CursorStrategy,
    rocks_env::RocksDb,
};

#[derive(Clone, Debug, PartialEq)]
pub struct PutEvent {
    pub database: Database,
    pub key: Vec<u8>,
    pub value: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DeleteEvent {
    pub database: Database,
    pub key: Vec<u8>,
}

pub struct WriteTransaction {
    strategy: WriteTxnStrategy,
    put_listener: OutputListener<PutEvent>,
    delete_listener: OutputListener<DeleteEvent>,
    start: Instant,
}

impl WriteTransaction {
    pub(crate) fn new_lmdb(txn: lmdb::RwTransaction<'static>) -> Self {
        Self::with_strategy(WriteTxnStrategy::Lmdb(txn))
    }

    pub(crate) fn new_rocks(db: Arc<RocksDb>) -> Self {
        Self::with_strategy(WriteTxnStrategy::Rocks(RocksWriteInner::new(db)))
    }

    pub fn new_null(databases: Arc<Mutex<Vec<ConfiguredDatabase>>>) -> Self {
        let db_copies = databases.lock().unwrap().clone();
        Self::with_strategy(WriteTxnStrategy::Nulled(RwTransactionStub {
            db_copies,
            databases,
        }))
    }

    fn with_strategy(strategy: WriteTxnStrategy) -> Self {
        Self {
            strategy,
            put_listener: OutputListener::new(),
            delete_listener: OutputListener::new(),
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn track_puts(&self) -> Rc<OutputTracker<PutEvent>> {
        self.put_listener.track()
    }

    pub fn track_deletions(&self) -> Rc<OutputTracker<DeleteEvent>> {
        self.delete_listener.track()
    }

    pub fn put(&mut self, database: Database, key: &[u8], value: &[u8]) -> Result<()> {
        if self.put_listener.is_tracked() {
            self.put_listener.emit(PutEvent {
                database,
                key: key.to_vec(),
                value: value.to_vec(),
            });
        }
        match &mut self.strategy {
            WriteTxnStrategy::Lmdb(txn) => {
                lmdb::RwTransaction::put(txn, database.as_lmdb(), &key, &value, lmdb::WriteFlags::empty())?;
                Ok(())
            }
            WriteTxnStrategy::Rocks(inner) => inner.put(database, key, value),
            WriteTxnStrategy::Nulled(stub) => stub.put(database, key, value),
        }
    }

    pub fn delete(&mut self, database: Database, key: &[u8]) -> Result<()> {
        if self.delete_listener.is_tracked() {
            self.delete_listener.emit(DeleteEvent {
                database,
                key: key.to_vec(),
            });
        }
        match &mut self.strategy {
            WriteTxnStrategy::Lmdb(txn) => {
                match lmdb::RwTransaction::del(txn, database.as_lmdb(), &key, None) {
                    Ok(()) | Err(lmdb::Error::NotFound) => Ok(()),
                    Err(e) => Err(e.into()),
                }
            }
            WriteTxnStrategy::Rocks(inner) => inner.delete(database, key),
            WriteTxnStrategy::Nulled(stub) => stub.delete(database, key),
        }
    }

    pub fn commit(self) {
        match self.strategy {
            WriteTxnStrategy::Lmdb(txn) => {
                lmdb::Transaction::commit(txn).expect("Could not commit LMDB transaction")
            }
            WriteTxnStrategy::Rocks(inner) => inner.commit(),
            WriteTxnStrategy::Nulled(stub) => stub.commit(),
        }
    }
}

impl Transaction for WriteTransaction {
    fn backend(&self) -> Backend {
        match &self.strategy {
            WriteTxnStrategy::Lmdb(_) | WriteTxnStrategy::Nulled(_) => Backend::Lmdb,
            WriteTxnStrategy::Rocks(_) => Backend::Rocksdb,
        }
    }

    fn is_refresh_needed_with(&self, max_duration: Duration) -> bool {
        self.start.elapsed() > max_duration
    }

    fn get(&self, database: Database, key: &[u8]) -> Result<Vec<u8>> {
        match &self.strategy {
            WriteTxnStrategy::Lmdb(txn) => {
                let bytes = lmdb::Transaction::get(txn, database.as_lmdb(), &key)?;
                Ok(bytes.to_vec())
            }
            WriteTxnStrategy::Rocks(inner) => inner.get(database, key),
            WriteTxnStrategy::Nulled(stub) => stub.get(database, key),
        }
    }

    fn cursor(&self, database: Database) -> Result<KvCursor<'_>> {
        match &self.strategy {
            WriteTxnStrategy::Lmdb(txn) => {
                let cursor = lmdb::Transaction::open_ro_cursor(txn, database.as_lmdb())?;
                let cursor = unsafe {
                    std::mem::transmute::<lmdb::RoCursor<'_>, lmdb::RoCursor<'static>>(cursor)
                };
                Ok(KvCursor::new(CursorStrategy::Lmdb(cursor)))
            }
            WriteTxnStrategy::Rocks(inner) => inner.cursor(database),
            WriteTxnStrategy::Nulled(stub) => Ok(stub.cursor(database)),
        }
    }

    fn count(&self, database: Database) -> u64 {
        match &self.strategy {
            WriteTxnStrategy::Lmdb(txn) => lmdb::Transaction::stat(txn, database.as_lmdb())
                .map(|s| s.entries() as u64)
                .unwrap_or_default(),
            WriteTxnStrategy::Rocks(inner) => inner.count(database),
            WriteTxnStrategy::Nulled(stub) => stub.count(database),
        }
    }
}

enum WriteTxnStrategy {
    Lmdb(lmdb::RwTransaction<'static>),
    Rocks(RocksWriteInner),
    Nulled(RwTransactionStub),
}

struct RocksWriteInner {
    // declared before `db` so the transaction is released first
    txn: rocksdb::Transaction<'static, RocksDb>,
    db: Arc<RocksDb>,
}

impl RocksWriteInner {
    fn new(db: Arc<RocksDb>) -> Self {
        let txn = db.transaction();
        // The transaction borrows the database which we keep alive through
        // the Arc next to it
        let txn = unsafe {
            std::mem::transmute::<
                rocksdb::Transaction<'_, RocksDb>,
                rocksdb::Transaction<'static, RocksDb>,
            >(txn)
        };
        Self { txn, db }
    }

    fn cf(&self, database: Database) -> Result<Arc<rocksdb::BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(database.as_rocks())
            .ok_or(KvError::NotFound)
    }

    fn get(&self, database: Database, key: &[u8]) -> Result<Vec<u8>> {
        let cf = self.cf(database)?;
        match self.txn.get_cf(&cf, key) {
            Ok(Some(value)) => Ok(value),
            Ok(None) => Err(KvError::NotFound),
            Err(e) => Err(e.into()),
        }
    }

    fn put(&mut self, database: Database, key: &[u8], value: &[u8]) -> Result<()> {
        let cf = self.db
            .cf_handle(database.as_rocks())
            .ok_or(KvError::NotFound)?;
        self.txn.put_cf(&cf, key, value)?;
        Ok(())
    }

    fn delete(&mut self, database: Database, key: &[u8]) -> Result<()> {
        let cf = self.db
            .cf_handle(database.as_rocks())
            .ok_or(KvError::NotFound)?;
        match self.txn.delete_cf(&cf, key) {
            Ok(()) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn cursor(&self, database: Database) -> Result<KvCursor<'_>> {
        let cf = self.cf(database)?;
        let it = self.txn.raw_iterator_cf(&cf);
        let it = unsafe {
            std::mem::transmute::<
                rocksdb::DBRawIteratorWithThreadMode<'_, rocksdb::Transaction<'_, RocksDb>>,
                rocksdb::DBRawIteratorWithThreadMode<
                    'static,
                    rocksdb::Transaction<'static, RocksDb>,
                >,
            >(it)
        };
        Ok(KvCursor::new(CursorStrategy::RocksTxn(it)))
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

    fn commit(self) {
        self.txn.commit().expect("Could not commit RocksDB transaction");
    }
}

struct RwTransactionStub {
    db_copies: Vec<ConfiguredDatabase>,
    databases: Arc<Mutex<Vec<ConfiguredDatabase>>>,
}

impl RwTransactionStub {
    fn get_database(&self, database: Database) -> Option<&ConfiguredDatabase> {
        self.db_copies.iter().find(|d| d.dbi == database)
    }

    fn get_database_mut(&mut self, database: Database) -> Result<&mut ConfiguredDatabase> {
        self.db_copies
            .iter_mut()
            .find(|d| d.dbi == database)
            .ok_or(KvError::NotFound)
    }

    fn get(&self, database: Database, key: &[u8]) -> Result<Vec<u8>> {
        let db = self.get_database(database).ok_or(KvError::NotFound)?;
        db.entries.get(key).cloned().ok_or(KvError::NotFound)
    }

    fn put(&mut self, database: Database, key: &[u8], value: &[u8]) -> Result<()> {
        self.get_database_mut(database)?.insert(key, value);
        Ok(())
    }

    fn delete(&mut self, database: Database, key: &[u8]) -> Result<()> {
        self.get_database_mut(database)?.entries.remove(key);
        Ok(())
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

    fn commit(self) {
        *self.databases.lock().unwrap() = self.db_copies;
    }
}
