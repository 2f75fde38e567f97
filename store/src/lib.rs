mod account_store;
mod block_store;
mod confirmation_height_store;
mod final_vote_store;
mod iterator;
mod online_weight_store;
mod peer_store;
mod pending_store;
mod pruned_store;
mod rep_weight_store;
mod store;
mod version_store;
mod write_queue;

pub use account_store::{AccountStore, ConfiguredAccountDatabaseBuilder};
pub use block_store::{BlockStore, ConfiguredBlockDatabaseBuilder};
pub use confirmation_height_store::{
    ConfiguredConfirmationHeightDatabaseBuilder, ConfirmationHeightStore,
};
pub use final_vote_store::FinalVoteStore;
pub use iterator::{RangeIterator, TableIterator};
pub use online_weight_store::OnlineWeightStore;
pub use peer_store::{ConfiguredPeersDatabaseBuilder, PeerStore};
pub use pending_store::{ConfiguredPendingDatabaseBuilder, PendingStore, read_pending_record};
pub use pruned_store::{ConfiguredPrunedDatabaseBuilder, PrunedStore};
pub use rep_weight_store::{ConfiguredRepWeightDatabaseBuilder, RepWeightStore};
pub use store::{LedgerCache, Store};
pub use version_store::VersionStore;
pub use write_queue::{WriteGuard, WriteQueue, Writer};

use primitive_types::{U256, U512};

pub const STORE_VERSION_MINIMUM: i32 = 24;
pub const STORE_VERSION_CURRENT: i32 = 24;

/// Every named table of the ledger store. The LSM backend opens one column
/// family per entry.
pub const TABLE_NAMES: [&str; 10] = [
    "accounts",
    "blocks",
    "pending",
    "pruned",
    "confirmation_height",
    "rep_weights",
    "final_votes",
    "online_weight",
    "peers",
    "meta",
];

use opal_nullable_kv::Database;

pub const ACCOUNT_TEST_DATABASE: Database = Database::new_null(1);
pub const BLOCK_TEST_DATABASE: Database = Database::new_null(2);
pub const PENDING_TEST_DATABASE: Database = Database::new_null(3);
pub const PRUNED_TEST_DATABASE: Database = Database::new_null(4);
pub const CONFIRMATION_HEIGHT_TEST_DATABASE: Database = Database::new_null(5);
pub const REP_WEIGHT_TEST_DATABASE: Database = Database::new_null(6);
pub const FINAL_VOTE_TEST_DATABASE: Database = Database::new_null(7);
pub const ONLINE_WEIGHT_TEST_DATABASE: Database = Database::new_null(8);
pub const PEERS_TEST_DATABASE: Database = Database::new_null(9);
pub const META_TEST_DATABASE: Database = Database::new_null(10);

struct Split<T> {
    start: T,
    end: T,
    is_last: bool,
}

/// Partitions the 32 byte key space into equal shards and runs the action
/// once per shard on its own thread
pub(crate) fn parallel_traversal(
    thread_count: usize,
    action: &(impl Fn(U256, U256, bool) + Send + Sync),
) {
    debug_assert!(thread_count > 0);
    let split = U256::max_value() / thread_count;

    let splits: Vec<_> = (0..thread_count)
        .map(|i| Split {
            start: split * i,
            end: split * (i + 1),
            is_last: i == thread_count - 1,
        })
        .collect();

    std::thread::scope(|s| {
        for split in &splits[1..] {
            std::thread::Builder::new()
                .name("DB par traversl".to_owned())
                .spawn_scoped(s, move || {
                    action(split.start, split.end, split.is_last);
                })
                .unwrap();
        }

        let first = &splits[0];
        action(first.start, first.end, first.is_last);
    });
}

/// Same as [`parallel_traversal`] for tables with 64 byte keys
pub(crate) fn parallel_traversal_u512(
    thread_count: usize,
    action: &(impl Fn(U512, U512, bool) + Send + Sync),
) {
    debug_assert!(thread_count > 0);
    let split = U512::max_value() / thread_count;

    let splits: Vec<_> = (0..thread_count)
        .map(|i| Split {
            start: split * i,
            end: split * (i + 1),
            is_last: i == thread_count - 1,
        })
        .collect();

    std::thread::scope(|s| {
        for split in &splits[1..] {
            std::thread::Builder::new()
                .name("DB par traversl".to_owned())
                .spawn_scoped(s, move || {
                    action(split.start, split.end, split.is_last);
                })
                .unwrap();
        }

        let first = &splits[0];
        action(first.start, first.end, first.is_last);
    });
}
