use opal_nullable_kv::{Database, Environment, Transaction, WriteTransaction};
use opal_types::Amount;

use crate::TableIterator;

/// Sampled online voting weight, keyed by sample timestamp
pub struct OnlineWeightStore {
    database: Database,
}

impl OnlineWeightStore {
    pub fn new(env: &Environment) -> anyhow::Result<Self> {
        let database = env.create_db(Some("online_weight"))?;
        Ok(Self { database })
    }

    pub fn put(&self, txn: &mut WriteTransaction, timestamp: u64, weight: Amount) {
        txn.put(
            self.database,
            &timestamp.to_be_bytes(),
            &weight.to_be_bytes(),
        )
        .expect("Could not put online weight");
    }

    pub fn del(&self, txn: &mut WriteTransaction, timestamp: u64) {
        txn.delete(self.database, &timestamp.to_be_bytes())
            .expect("Could not delete online weight");
    }

    pub fn count(&self, txn: &dyn Transaction) -> u64 {
        txn.count(self.database)
    }

    pub fn iter<'tx>(&self, tx: &'tx dyn Transaction) -> impl Iterator<Item = (u64, Amount)> + 'tx {
        let cursor = tx
            .cursor(self.database)
            .expect("Could not read from online weight store");
        TableIterator::new(cursor, read_online_weight_record)
    }
}

fn read_online_weight_record(key: &[u8], mut value: &[u8]) -> (u64, Amount) {
    let timestamp = u64::from_be_bytes(key.try_into().expect("Should be a valid timestamp key"));
    let weight = Amount::deserialize(&mut value).expect("Should be a valid amount");
    (timestamp, weight)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_iter_delete() {
        let env = Environment::new_null();
        let store = OnlineWeightStore::new(&env).unwrap();
        let mut txn = env.begin_write();

        store.put(&mut txn, 200, Amount::raw(2));
        store.put(&mut txn, 100, Amount::raw(1));

        let entries: Vec<_> = store.iter(&txn).collect();
        assert_eq!(entries, vec![(100, Amount::raw(1)), (200, Amount::raw(2))]);

        store.del(&mut txn, 100);
        assert_eq!(store.count(&txn), 1);
    }
}
