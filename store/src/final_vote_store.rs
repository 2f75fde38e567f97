use opal_nullable_kv::{Database, Environment, KvError, Transaction, WriteTransaction};
use opal_types::{BlockHash, QualifiedRoot};

use crate::TableIterator;

/// Per-election final vote decisions, keyed by qualified root
pub struct FinalVoteStore {
    database: Database,
}

impl FinalVoteStore {
    pub fn new(env: &Environment) -> anyhow::Result<Self> {
        let database = env.create_db(Some("final_votes"))?;
        Ok(Self { database })
    }

    pub fn put(&self, txn: &mut WriteTransaction, root: &QualifiedRoot, hash: &BlockHash) {
        txn.put(self.database, &root.to_bytes(), hash.as_bytes())
            .expect("Could not put final vote");
    }

    pub fn get(&self, txn: &dyn Transaction, root: &QualifiedRoot) -> Option<BlockHash> {
        match txn.get(self.database, &root.to_bytes()) {
            Ok(bytes) => Some(BlockHash::from_slice(&bytes).expect("Should be a valid block hash")),
            Err(KvError::NotFound) => None,
            Err(e) => panic!("Could not load final vote: {:?}", e),
        }
    }

    pub fn del(&self, txn: &mut WriteTransaction, root: &QualifiedRoot) {
        txn.delete(self.database, &root.to_bytes())
            .expect("Could not delete final vote");
    }

    pub fn count(&self, txn: &dyn Transaction) -> u64 {
        txn.count(self.database)
    }

    pub fn iter<'tx>(
        &self,
        tx: &'tx dyn Transaction,
    ) -> impl Iterator<Item = (QualifiedRoot, BlockHash)> + 'tx {
        let cursor = tx
            .cursor(self.database)
            .expect("Could not read from final vote store");
        TableIterator::new(cursor, read_final_vote_record)
    }
}

fn read_final_vote_record(mut key: &[u8], value: &[u8]) -> (QualifiedRoot, BlockHash) {
    let root = QualifiedRoot::deserialize(&mut key).expect("Should be a valid qualified root");
    let hash = BlockHash::from_slice(value).expect("Should be a valid block hash");
    (root, hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_get_delete() {
        let env = Environment::new_null();
        let store = FinalVoteStore::new(&env).unwrap();
        let mut txn = env.begin_write();
        let root = QualifiedRoot::new_test_instance();

        assert_eq!(store.get(&txn, &root), None);

        store.put(&mut txn, &root, &BlockHash::from(7));
        assert_eq!(store.get(&txn, &root), Some(BlockHash::from(7)));

        store.del(&mut txn, &root);
        assert_eq!(store.get(&txn, &root), None);
    }
}
