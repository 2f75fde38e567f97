use std::{
    path::Path,
    sync::atomic::{AtomicU64, Ordering},
};

use tracing::info;

use opal_nullable_kv::{Backend, Environment, EnvironmentOptions, Transaction};
use opal_store::{Store, TABLE_NAMES};

use crate::{Ledger, ledger_builder::ROCKSDB_DIR};

impl Ledger {
    /// One-shot copy of every table from the B-tree backend into a fresh
    /// LSM store next to it. Refuses to run when the destination already
    /// exists. The source must be the B-tree backend; migration only goes
    /// in that direction.
    pub fn migrate_lmdb_to_rocksdb(&self, data_path: &Path) -> anyhow::Result<()> {
        ensure!(
            self.store.env.backend() == Backend::Lmdb,
            "migration source must be an LMDB store"
        );

        let destination = data_path.join(ROCKSDB_DIR);
        ensure!(
            !destination.exists(),
            "existing RocksDB folder found in '{}', remove it and try again",
            destination.display()
        );

        info!("Migrating LMDB database to RocksDB. This will take a while...");

        let rocksdb_env = Environment::create(EnvironmentOptions {
            backend: Backend::Rocksdb,
            max_dbs: 0,
            map_size: 0,
            path: destination,
            tables: TABLE_NAMES.to_vec(),
        })?;
        let rocksdb = Store::new(rocksdb_env)?;

        let thread_count = opal_utils::get_cpu_count();

        self.copy_blocks(&rocksdb, thread_count);
        self.copy_pending(&rocksdb, thread_count);
        self.copy_confirmation_heights(&rocksdb, thread_count);
        self.copy_accounts(&rocksdb, thread_count);
        self.copy_rep_weights(&rocksdb, thread_count);
        self.copy_small_tables(&rocksdb);

        self.verify_migration(&rocksdb)?;

        info!("Migration completed. Set `database_backend` to 'rocksdb' in the node configuration");
        info!("After confirming correct node operation, the data.ldb file can be deleted");

        Ok(())
    }

    fn copy_blocks(&self, rocksdb: &Store, thread_count: usize) {
        let table_size = self.store.block.count(&self.store.begin_read());
        info!("Step 1 of 6: Converting {} entries from the blocks table", table_size);

        let count = AtomicU64::new(0);
        self.store
            .block
            .for_each_par(&self.store.env, thread_count, |iter| {
                let mut txn = rocksdb.begin_write();
                for block in iter {
                    if txn.is_refresh_needed() {
                        txn = rocksdb.env.refresh(txn);
                    }
                    rocksdb.block.put(&mut txn, &block);
                    log_progress(&count, table_size);
                }
                txn.commit();
            });

        info!("{} block entries converted", count.load(Ordering::SeqCst));
    }

    fn copy_pending(&self, rocksdb: &Store, thread_count: usize) {
        let table_size = self.store.pending.count(&self.store.begin_read());
        info!("Step 2 of 6: Converting {} entries from the pending table", table_size);

        let count = AtomicU64::new(0);
        self.store
            .pending
            .for_each_par(&self.store.env, thread_count, |iter| {
                let mut txn = rocksdb.begin_write();
                for (key, info) in iter {
                    if txn.is_refresh_needed() {
                        txn = rocksdb.env.refresh(txn);
                    }
                    rocksdb.pending.put(&mut txn, &key, &info);
                    log_progress(&count, table_size);
                }
                txn.commit();
            });

        info!("{} pending entries converted", count.load(Ordering::SeqCst));
    }

    fn copy_confirmation_heights(&self, rocksdb: &Store, thread_count: usize) {
        let table_size = self
            .store
            .confirmation_height
            .count(&self.store.begin_read());
        info!(
            "Step 3 of 6: Converting {} entries from the confirmation height table",
            table_size
        );

        let count = AtomicU64::new(0);
        self.store
            .confirmation_height
            .for_each_par(&self.store.env, thread_count, |iter| {
                let mut txn = rocksdb.begin_write();
                for (account, info) in iter {
                    if txn.is_refresh_needed() {
                        txn = rocksdb.env.refresh(txn);
                    }
                    rocksdb.confirmation_height.put(&mut txn, &account, &info);
                    log_progress(&count, table_size);
                }
                txn.commit();
            });

        info!(
            "{} confirmation height entries converted",
            count.load(Ordering::SeqCst)
        );
    }

    fn copy_accounts(&self, rocksdb: &Store, thread_count: usize) {
        let table_size = self.store.account.count(&self.store.begin_read());
        info!("Step 4 of 6: Converting {} entries from the accounts table", table_size);

        let count = AtomicU64::new(0);
        self.store
            .account
            .for_each_par(&self.store.env, thread_count, |iter| {
                let mut txn = rocksdb.begin_write();
                for (account, info) in iter {
                    if txn.is_refresh_needed() {
                        txn = rocksdb.env.refresh(txn);
                    }
                    rocksdb.account.put(&mut txn, &account, &info);
                    log_progress(&count, table_size);
                }
                txn.commit();
            });

        info!("{} account entries converted", count.load(Ordering::SeqCst));
    }

    fn copy_rep_weights(&self, rocksdb: &Store, thread_count: usize) {
        let table_size = self.store.rep_weight.count(&self.store.begin_read());
        info!(
            "Step 5 of 6: Converting {} entries from the rep weights table",
            table_size
        );

        let count = AtomicU64::new(0);
        self.store
            .rep_weight
            .for_each_par(&self.store.env, thread_count, |iter| {
                let mut txn = rocksdb.begin_write();
                for (representative, weight) in iter {
                    if txn.is_refresh_needed() {
                        txn = rocksdb.env.refresh(txn);
                    }
                    rocksdb.rep_weight.put(&mut txn, representative, weight);
                    log_progress(&count, table_size);
                }
                txn.commit();
            });

        info!("{} rep weight entries converted", count.load(Ordering::SeqCst));
    }

    fn copy_small_tables(&self, rocksdb: &Store) {
        info!("Step 6 of 6: Converting pruned, final votes, online weight, peers and version");

        let lmdb_txn = self.store.begin_read();
        let mut txn = rocksdb.begin_write();

        for hash in self.store.pruned.iter(&lmdb_txn) {
            rocksdb.pruned.put(&mut txn, &hash);
        }

        for (root, hash) in self.store.final_vote.iter(&lmdb_txn) {
            rocksdb.final_vote.put(&mut txn, &root, &hash);
        }

        for (timestamp, weight) in self.store.online_weight.iter(&lmdb_txn) {
            rocksdb.online_weight.put(&mut txn, timestamp, weight);
        }

        for (endpoint, time) in self.store.peer.iter(&lmdb_txn) {
            rocksdb.peer.put(&mut txn, endpoint, time);
        }

        if let Some(version) = self.store.version.get(&lmdb_txn) {
            rocksdb.version.put(&mut txn, version);
        }

        txn.commit();
    }

    fn verify_migration(&self, rocksdb: &Store) -> anyhow::Result<()> {
        info!("Verifying the migrated store...");

        let lmdb_txn = self.store.begin_read();
        let rocksdb_txn = rocksdb.begin_read();

        // Count parity on the small tables
        ensure_count_parity(
            "pruned",
            self.store.pruned.count(&lmdb_txn),
            rocksdb.pruned.count(&rocksdb_txn),
        )?;
        ensure_count_parity(
            "final_votes",
            self.store.final_vote.count(&lmdb_txn),
            rocksdb.final_vote.count(&rocksdb_txn),
        )?;
        ensure_count_parity(
            "online_weight",
            self.store.online_weight.count(&lmdb_txn),
            rocksdb.online_weight.count(&rocksdb_txn),
        )?;
        ensure_count_parity(
            "peers",
            self.store.peer.count(&lmdb_txn),
            rocksdb.peer.count(&rocksdb_txn),
        )?;
        ensure_count_parity(
            "rep_weights",
            self.store.rep_weight.count(&lmdb_txn),
            rocksdb.rep_weight.count(&rocksdb_txn),
        )?;
        ensure!(
            self.store.version.get(&lmdb_txn) == rocksdb.version.get(&rocksdb_txn),
            "store version was not copied"
        );

        // For the large tables a random sample is round-tripped instead
        let blocks = self.any().random_blocks(42);
        ensure!(!blocks.is_empty(), "source store has no blocks");
        for block in blocks {
            let account = block.account();

            let copied = rocksdb.block.get(&rocksdb_txn, &block.hash());
            ensure!(
                copied.as_ref() == Some(&block),
                "block {} did not survive the migration",
                block.hash()
            );

            ensure!(
                rocksdb.account.get(&rocksdb_txn, &account).is_some(),
                "account {} is missing from the migrated store",
                account.encode_account()
            );

            // If a confirmation height exists in the source it must exist
            // in the destination
            if let Some(info) = self.store.confirmation_height.get(&lmdb_txn, &account) {
                ensure!(
                    rocksdb.confirmation_height.get(&rocksdb_txn, &account) == Some(info),
                    "confirmation height for {} is missing from the migrated store",
                    account.encode_account()
                );
            }
        }

        Ok(())
    }
}

fn log_progress(count: &AtomicU64, table_size: u64) {
    let converted = count.fetch_add(1, Ordering::SeqCst) + 1;
    if converted % 500_000 == 0 && table_size > 0 {
        info!("{} entries converted ({}%)", converted, converted * 100 / table_size);
    }
}

fn ensure_count_parity(table: &str, source: u64, destination: u64) -> anyhow::Result<()> {
    ensure!(
        source == destination,
        "{} table count mismatch after migration: {} != {}",
        table,
        source,
        destination
    );
    Ok(())
}
