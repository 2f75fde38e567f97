mod configured_database;
mod cursor;
mod database;
mod environment;
mod lmdb_env;
mod ro_transaction;
mod rocks_env;
mod rw_transaction;

pub use configured_database::*;
pub use cursor::*;
pub use database::*;
pub use environment::*;
pub use ro_transaction::*;
pub use rw_transaction::*;

use std::time::Duration;
use thiserror::Error;

/// The storage engine behind an environment
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Backend {
    /// Memory-mapped B-tree, a single data file
    Lmdb,
    /// Log-structured merge tree, a directory
    Rocksdb,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KvError {
    #[error("entry not found")]
    NotFound,

    #[error("store error: {0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, KvError>;

impl From<lmdb::Error> for KvError {
    fn from(value: lmdb::Error) -> Self {
        match value {
            lmdb::Error::NotFound => KvError::NotFound,
            other => KvError::Other(other.to_string()),
        }
    }
}

impl From<rocksdb::Error> for KvError {
    fn from(value: rocksdb::Error) -> Self {
        KvError::Other(value.to_string())
    }
}

/// Common read surface of read and write transactions. A transaction is a
/// snapshot as of its opening moment; the backend discriminator is carried
/// for assertions only.
pub trait Transaction {
    fn backend(&self) -> Backend;
    fn is_refresh_needed(&self) -> bool {
        self.is_refresh_needed_with(Duration::from_millis(500))
    }
    fn is_refresh_needed_with(&self, max_duration: Duration) -> bool;
    fn get(&self, database: Database, key: &[u8]) -> Result<Vec<u8>>;
    fn exists(&self, database: Database, key: &[u8]) -> bool {
        match self.get(database, key) {
            Ok(_) => true,
            Err(KvError::NotFound) => false,
            Err(e) => panic!("exists failed: {:?}", e),
        }
    }
    fn cursor(&self, database: Database) -> Result<KvCursor<'_>>;
    fn count(&self, database: Database) -> u64;
}
