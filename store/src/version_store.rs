use opal_nullable_kv::{Database, Environment, KvError, Transaction, WriteTransaction};

/// Schema version of the store, kept in the meta table
pub struct VersionStore {
    database: Database,
}

const VERSION_KEY: &[u8] = b"version";

impl VersionStore {
    pub fn new(env: &Environment) -> anyhow::Result<Self> {
        let database = env.create_db(Some("meta"))?;
        Ok(Self { database })
    }

    pub fn put(&self, txn: &mut WriteTransaction, version: i32) {
        txn.put(self.database, VERSION_KEY, &version.to_be_bytes())
            .expect("Could not put store version");
    }

    pub fn get(&self, txn: &dyn Transaction) -> Option<i32> {
        match txn.get(self.database, VERSION_KEY) {
            Ok(bytes) => Some(i32::from_be_bytes(
                bytes.as_slice().try_into().expect("Should be a valid version"),
            )),
            Err(KvError::NotFound) => None,
            Err(e) => panic!("Could not load store version: {:?}", e),
        }
    }
}
