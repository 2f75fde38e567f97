use std::{
    collections::BTreeMap,
    sync::{
        RwLock,
        atomic::{AtomicU64, Ordering},
    },
};

use strum_macros::{EnumIter, IntoStaticStr};
use tracing::debug;

/// Primary statistics category
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum StatType {
    Ledger,
    Rollback,
    ConfirmationHeight,
    Pruning,
}

/// Detailed statistics entry within a category
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum DetailType {
    All,
    Send,
    Receive,
    Open,
    Change,
    StateBlock,
    EpochBlock,
    Fork,
    Old,
    GapPrevious,
    GapSource,
    RollbackFailed,
    DependentUnconfirmed,
    BlocksConfirmed,
    AlreadyCemented,
    LedgerPruning,
    PrunedCount,
}

#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug)]
pub enum Direction {
    In,
    Out,
}

#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug)]
struct CounterKey {
    stat_type: StatType,
    detail: DetailType,
    dir: Direction,
}

/// Atomic counter sink for ledger events. Counters are created lazily on
/// first use and live for the lifetime of the ledger.
#[derive(Default)]
pub struct Stats {
    counters: RwLock<BTreeMap<CounterKey, AtomicU64>>,
}

impl Stats {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn inc(&self, stat_type: StatType, detail: DetailType) {
        self.add(stat_type, detail, 1)
    }

    pub fn add(&self, stat_type: StatType, detail: DetailType, value: u64) {
        self.add_dir(stat_type, detail, Direction::In, value)
    }

    pub fn add_dir(&self, stat_type: StatType, detail: DetailType, dir: Direction, value: u64) {
        if value == 0 {
            return;
        }

        let key = CounterKey {
            stat_type,
            detail,
            dir,
        };

        // Two-step to avoid taking the exclusive lock in the common case
        {
            let counters = self.counters.read().unwrap();
            if let Some(counter) = counters.get(&key) {
                counter.fetch_add(value, Ordering::Relaxed);
                return;
            }
        }

        let mut counters = self.counters.write().unwrap();
        counters
            .entry(key)
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(value, Ordering::Relaxed);
    }

    pub fn count(&self, stat_type: StatType, detail: DetailType) -> u64 {
        self.count_dir(stat_type, detail, Direction::In)
    }

    pub fn count_dir(&self, stat_type: StatType, detail: DetailType, dir: Direction) -> u64 {
        let key = CounterKey {
            stat_type,
            detail,
            dir,
        };
        self.counters
            .read()
            .unwrap()
            .get(&key)
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or_default()
    }

    pub fn log_counters(&self) {
        let counters = self.counters.read().unwrap();
        for (key, counter) in counters.iter() {
            debug!(
                "{}::{} = {}",
                <&'static str>::from(key.stat_type),
                <&'static str>::from(key.detail),
                counter.load(Ordering::Relaxed)
            );
        }
    }
}
