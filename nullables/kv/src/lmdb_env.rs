use lmdb::{DatabaseFlags, EnvironmentFlags};

use crate::{Database, EnvironmentOptions, ReadTransaction, Result, WriteTransaction};

/// The memory-mapped B-tree backend. Stores the whole environment in a
/// single data file.
pub(crate) struct LmdbEnvironmentWrapper(lmdb::Environment);

impl LmdbEnvironmentWrapper {
    pub fn build(options: &EnvironmentOptions) -> Result<Self> {
        let env = lmdb::Environment::new()
            .set_max_dbs(options.max_dbs)
            .set_map_size(options.map_size)
            .set_flags(EnvironmentFlags::NO_SUB_DIR | EnvironmentFlags::NO_TLS)
            .open_with_permissions(&options.path, 0o600.try_into().unwrap())?;
        Ok(Self(env))
    }

    pub fn begin_read(&self) -> ReadTransaction {
        let txn = self
            .0
            .begin_ro_txn()
            .expect("Could not create LMDB read-only transaction");
        // The transaction borrows the environment. The environment is
        // required to outlive all of its transactions.
        let txn = unsafe {
            std::mem::transmute::<lmdb::RoTransaction<'_>, lmdb::RoTransaction<'static>>(txn)
        };
        ReadTransaction::new_lmdb(txn)
    }

    pub fn begin_write(&self) -> WriteTransaction {
        let txn = self
            .0
            .begin_rw_txn()
            .expect("Could not create LMDB read-write transaction");
        let txn = unsafe {
            std::mem::transmute::<lmdb::RwTransaction<'_>, lmdb::RwTransaction<'static>>(txn)
        };
        WriteTransaction::new_lmdb(txn)
    }

    pub fn create_db(&self, name: Option<&str>) -> Result<Database> {
        let db = self.0.create_db(name, DatabaseFlags::empty())?;
        Ok(Database::Lmdb(db))
    }

    pub fn open_db(&self, name: Option<&str>) -> Result<Database> {
        let db = self.0.open_db(name)?;
        Ok(Database::Lmdb(db))
    }

    pub fn sync(&self) -> Result<()> {
        self.0.sync(true)?;
        Ok(())
    }
}

impl Drop for LmdbEnvironmentWrapper {
    fn drop(&mut self) {
        let _ = self.0.sync(true);
    }
}
