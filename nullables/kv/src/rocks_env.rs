use std::sync::Arc;

use rocksdb::{
    ColumnFamilyDescriptor, MultiThreaded, Options, TransactionDB, TransactionDBOptions,
};

use crate::{Database, EnvironmentOptions, KvError, ReadTransaction, Result, WriteTransaction};

pub(crate) type RocksDb = TransactionDB<MultiThreaded>;

/// The LSM backend. Stores the environment as a directory with one column
/// family per table.
pub(crate) struct RocksEnvironmentWrapper {
    db: Arc<RocksDb>,
    tables: Vec<&'static str>,
}

impl RocksEnvironmentWrapper {
    pub fn build(options: &EnvironmentOptions) -> Result<Self> {
        let mut db_options = Options::default();
        db_options.create_if_missing(true);
        db_options.create_missing_column_families(true);
        let txn_db_options = TransactionDBOptions::default();

        let descriptors: Vec<ColumnFamilyDescriptor> = options
            .tables
            .iter()
            .map(|name| ColumnFamilyDescriptor::new(*name, Options::default()))
            .collect();

        let db = TransactionDB::open_cf_descriptors(
            &db_options,
            &txn_db_options,
            &options.path,
            descriptors,
        )?;

        Ok(Self {
            db: Arc::new(db),
            tables: options.tables.clone(),
        })
    }

    pub fn begin_read(&self) -> ReadTransaction {
        ReadTransaction::new_rocks(self.db.clone())
    }

    pub fn begin_write(&self) -> WriteTransaction {
        WriteTransaction::new_rocks(self.db.clone())
    }

    pub fn create_db(&self, name: Option<&str>) -> Result<Database> {
        self.open_db(name)
    }

    pub fn open_db(&self, name: Option<&str>) -> Result<Database> {
        let Some(name) = name else {
            return Err(KvError::Other(
                "unnamed databases are not supported by the LSM backend".to_string(),
            ));
        };
        // Column families are created when the environment is opened, so
        // lookup against the configured table list suffices
        self.tables
            .iter()
            .find(|table| **table == name)
            .map(|table| Database::Rocks(*table))
            .ok_or(KvError::NotFound)
    }

    pub fn sync(&self) -> Result<()> {
        // Writes go through the write-ahead log, nothing to flush here
        Ok(())
    }
}
