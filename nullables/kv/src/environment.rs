use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use opal_output_tracker::{OutputListenerMt, OutputTrackerMt};

use crate::{
    Backend, ConfiguredDatabase, Database, KvError, ReadTransaction, Result, WriteTransaction,
    lmdb_env::LmdbEnvironmentWrapper, rocks_env::RocksEnvironmentWrapper,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnvironmentOptions {
    pub backend: Backend,
    /// Maximum number of named tables (B-tree backend only)
    pub max_dbs: u32,
    /// Memory map size (B-tree backend only)
    pub map_size: usize,
    /// Data file for the B-tree backend, directory for the LSM backend
    pub path: PathBuf,
    /// Column families opened up-front by the LSM backend
    pub tables: Vec<&'static str>,
}

/// A transactional key-value environment. Multiplexes the two persistent
/// backends and a nulled in-memory stub for tests.
pub struct Environment {
    strategy: EnvironmentStrategy,
    path: PathBuf,
}

enum EnvironmentStrategy {
    Lmdb(LmdbEnvironmentWrapper),
    Rocks(RocksEnvironmentWrapper),
    Nulled(EnvironmentStub),
}

impl Environment {
    pub fn create(options: EnvironmentOptions) -> Result<Self> {
        let path = options.path.clone();
        let strategy = match options.backend {
            Backend::Lmdb => EnvironmentStrategy::Lmdb(LmdbEnvironmentWrapper::build(&options)?),
            Backend::Rocksdb => {
                EnvironmentStrategy::Rocks(RocksEnvironmentWrapper::build(&options)?)
            }
        };
        Ok(Self { strategy, path })
    }

    pub fn new_null() -> Self {
        Self::new_null_with_data(Vec::new())
    }

    pub fn new_null_with_data(databases: Vec<ConfiguredDatabase>) -> Self {
        Self {
            strategy: EnvironmentStrategy::Nulled(EnvironmentStub::new(databases)),
            path: "/nulled/ledger".into(),
        }
    }

    pub fn null_builder() -> NullEnvironmentBuilder {
        NullEnvironmentBuilder {
            databases: Vec::new(),
        }
    }

    pub fn backend(&self) -> Backend {
        match &self.strategy {
            EnvironmentStrategy::Lmdb(_) | EnvironmentStrategy::Nulled(_) => Backend::Lmdb,
            EnvironmentStrategy::Rocks(_) => Backend::Rocksdb,
        }
    }

    pub fn file_path(&self) -> &Path {
        &self.path
    }

    pub fn begin_read(&self) -> ReadTransaction {
        match &self.strategy {
            EnvironmentStrategy::Lmdb(s) => s.begin_read(),
            EnvironmentStrategy::Rocks(s) => s.begin_read(),
            EnvironmentStrategy::Nulled(s) => s.begin_read(),
        }
    }

    pub fn begin_write(&self) -> WriteTransaction {
        match &self.strategy {
            EnvironmentStrategy::Lmdb(s) => s.begin_write(),
            EnvironmentStrategy::Rocks(s) => s.begin_write(),
            EnvironmentStrategy::Nulled(s) => s.begin_write(),
        }
    }

    /// Commits the given write transaction and starts a fresh one. Used by
    /// long-running operations to bound transaction duration.
    pub fn refresh(&self, txn: WriteTransaction) -> WriteTransaction {
        txn.commit();
        self.begin_write()
    }

    pub fn create_db(&self, name: Option<&str>) -> Result<Database> {
        match &self.strategy {
            EnvironmentStrategy::Lmdb(s) => s.create_db(name),
            EnvironmentStrategy::Rocks(s) => s.create_db(name),
            EnvironmentStrategy::Nulled(s) => s.create_db(name),
        }
    }

    pub fn open_db(&self, name: Option<&str>) -> Result<Database> {
        match &self.strategy {
            EnvironmentStrategy::Lmdb(s) => s.open_db(name),
            EnvironmentStrategy::Rocks(s) => s.open_db(name),
            EnvironmentStrategy::Nulled(s) => s.open_db(name),
        }
    }

    pub fn sync(&self) -> Result<()> {
        match &self.strategy {
            EnvironmentStrategy::Lmdb(s) => s.sync(),
            EnvironmentStrategy::Rocks(s) => s.sync(),
            EnvironmentStrategy::Nulled(_) => Ok(()),
        }
    }
}

/// Creates environments. Can be nulled so that tests can observe which
/// environments would have been created.
#[derive(Default)]
pub struct EnvironmentFactory {
    is_nulled: bool,
    create_listener: OutputListenerMt<EnvironmentOptions>,
}

impl EnvironmentFactory {
    pub fn new_null() -> Self {
        Self {
            is_nulled: true,
            create_listener: OutputListenerMt::default(),
        }
    }

    pub fn track(&self) -> Arc<OutputTrackerMt<EnvironmentOptions>> {
        self.create_listener.track()
    }

    pub fn create(&self, options: EnvironmentOptions) -> Result<Environment> {
        self.create_listener.emit(options.clone());
        if self.is_nulled {
            Ok(Environment::new_null())
        } else {
            Environment::create(options)
        }
    }
}

pub struct NullEnvironmentBuilder {
    databases: Vec<ConfiguredDatabase>,
}

impl NullEnvironmentBuilder {
    pub fn database(self, name: impl Into<String>, dbi: Database) -> NullDatabaseBuilder {
        NullDatabaseBuilder {
            database: ConfiguredDatabase::new(dbi, name),
            env_builder: self,
        }
    }

    pub fn configured_database(mut self, db: ConfiguredDatabase) -> Self {
        if self
            .databases
            .iter()
            .any(|x| x.dbi == db.dbi || x.db_name == db.db_name)
        {
            panic!(
                "trying to duplicate database for {:?} / {}",
                db.dbi, db.db_name
            );
        }
        self.databases.push(db);
        self
    }

    pub fn build(self) -> Environment {
        Environment::new_null_with_data(self.databases)
    }
}

pub struct NullDatabaseBuilder {
    database: ConfiguredDatabase,
    env_builder: NullEnvironmentBuilder,
}

impl NullDatabaseBuilder {
    pub fn entry(mut self, key: &[u8], value: &[u8]) -> Self {
        self.database.insert(key, value);
        self
    }

    pub fn build(self) -> NullEnvironmentBuilder {
        self.env_builder.configured_database(self.database)
    }
}

struct EnvironmentStub {
    databases: Arc<Mutex<Vec<ConfiguredDatabase>>>,
}

impl EnvironmentStub {
    fn new(databases: Vec<ConfiguredDatabase>) -> Self {
        Self {
            databases: Arc::new(Mutex::new(databases)),
        }
    }

    fn begin_read(&self) -> ReadTransaction {
        ReadTransaction::new_null(self.databases.lock().unwrap().clone())
    }

    fn begin_write(&self) -> WriteTransaction {
        WriteTransaction::new_null(self.databases.clone())
    }

    fn create_db(&self, name: Option<&str>) -> Result<Database> {
        let mut guard = self.databases.lock().unwrap();
        if let Some(db) = guard.iter().find(|x| name == Some(&x.db_name)) {
            return Ok(db.dbi);
        }

        let id = guard
            .iter()
            .map(|i| i.dbi.as_nulled())
            .max()
            .unwrap_or(41)
            + 1;
        let dbi = Database::new_null(id);
        guard.push(ConfiguredDatabase::new(dbi, name.unwrap_or_default()));
        Ok(dbi)
    }

    fn open_db(&self, name: Option<&str>) -> Result<Database> {
        self.databases
            .lock()
            .unwrap()
            .iter()
            .find(|x| name == Some(&x.db_name))
            .map(|x| x.dbi)
            .ok_or(KvError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Transaction;

    #[test]
    fn can_track_env_creations() {
        let env_factory = EnvironmentFactory::new_null();
        let tracker = env_factory.track();

        let options = EnvironmentOptions {
            backend: Backend::Lmdb,
            max_dbs: 42,
            map_size: 1024 * 1024,
            path: "test-kv-file.ldb".into(),
            tables: vec!["blocks"],
        };

        let _ = env_factory.create(options.clone());

        assert_eq!(tracker.output(), vec![options]);
    }

    mod nullability {
        use super::*;

        #[test]
        fn read_database() {
            let database = Database::new_null(1);
            let env = Environment::null_builder()
                .database("foo", database)
                .entry(&[1, 2], &[3, 4])
                .build()
                .build();

            let txn = env.begin_read();
            let result = txn.get(database, &[1, 2]).unwrap();
            assert_eq!(result, [3, 4]);
        }

        #[test]
        fn open_unknown_database_fails() {
            let env = Environment::new_null();
            let result = env.open_db(Some("UNKNOWN"));
            assert_eq!(result, Err(KvError::NotFound));
        }

        #[test]
        fn create_db() {
            let env = Environment::new_null();
            env.create_db(Some("mydb")).unwrap();
            let result = env.open_db(Some("mydb"));
            assert!(result.is_ok());
        }

        #[test]
        fn write_key_value() {
            let env = Environment::new_null();
            let dbi = env.create_db(Some("mydb")).unwrap();
            {
                let mut txn = env.begin_write();
                txn.put(dbi, &[1, 2], &[3, 4]).unwrap();
                txn.commit();
            }
            let txn = env.begin_read();
            let result = txn.get(dbi, &[1, 2]).unwrap();
            assert_eq!(result, [3, 4]);
        }

        #[test]
        fn uncommitted_writes_are_discarded() {
            let env = Environment::new_null();
            let dbi = env.create_db(Some("mydb")).unwrap();
            {
                let mut txn = env.begin_write();
                txn.put(dbi, &[1], &[2]).unwrap();
                // dropped without commit
            }
            let txn = env.begin_read();
            assert_eq!(txn.get(dbi, &[1]), Err(KvError::NotFound));
        }

        #[test]
        fn can_track_puts() {
            let env = Environment::new_null();
            let database = env.create_db(Some("testdb")).unwrap();

            let mut txn = env.begin_write();
            let tracker = txn.track_puts();
            txn.put(database, &[1, 2, 3], &[4, 5, 6]).unwrap();

            assert_eq!(
                tracker.output(),
                vec![PutEvent {
                    database,
                    key: vec![1, 2, 3],
                    value: vec![4, 5, 6],
                }]
            )
        }

        #[test]
        fn can_track_deletes() {
            let env = Environment::new_null();
            let database = env.create_db(Some("testdb")).unwrap();

            let mut txn = env.begin_write();
            let tracker = txn.track_deletions();
            txn.delete(database, &[1, 2, 3]).unwrap();

            assert_eq!(
                tracker.output(),
                vec![DeleteEvent {
                    database,
                    key: vec![1, 2, 3],
                }]
            )
        }

        #[test]
        fn cursor_over_nulled_entries() {
            let database = Database::new_null(1);
            let env = Environment::null_builder()
                .database("foo", database)
                .entry(&[2], &[20])
                .entry(&[1], &[10])
                .build()
                .build();

            let txn = env.begin_read();
            let mut cursor = txn.cursor(database).unwrap();
            assert_eq!(cursor.first(), Some((vec![1], vec![10])));
            assert_eq!(cursor.next(), Some((vec![2], vec![20])));
            assert_eq!(cursor.next(), None);
        }
    }
}
