use std::{
    cmp::{max, min},
    path::PathBuf,
    sync::Arc,
};

use opal_nullable_kv::{Backend, EnvironmentFactory, EnvironmentOptions};
use opal_store::TABLE_NAMES;
use opal_types::Amount;
use opal_utils::{get_cpu_count, stats::Stats};

use crate::{
    BootstrapWeights, GenerateCacheFlags, Ledger, LedgerConfig, LedgerConstants, RepWeightCache,
};

/// One directory per node. The B-tree backend keeps a single file inside
/// it, the LSM backend a subdirectory.
pub const LMDB_DATA_FILE: &str = "data.ldb";
pub const ROCKSDB_DIR: &str = "rocksdb";

const LMDB_MAP_SIZE: usize = 128 * 1024 * 1024 * 1024;
const LMDB_MAX_DBS: u32 = 128;

/// Error-returning factory for [`Ledger`]
pub struct LedgerBuilder<'a> {
    path: PathBuf,
    config: LedgerConfig,
    env_factory: Option<&'a EnvironmentFactory>,
    bootstrap_weights: Option<BootstrapWeights>,
    stats: Option<Arc<Stats>>,
    ledger_constants: Option<LedgerConstants>,
    generate_cache: GenerateCacheFlags,
    thread_count: usize,
}

impl<'a> LedgerBuilder<'a> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            config: LedgerConfig::default(),
            env_factory: None,
            bootstrap_weights: None,
            stats: None,
            ledger_constants: None,
            generate_cache: GenerateCacheFlags::new(),
            thread_count: 0,
        }
    }

    pub fn env_factory(mut self, env_factory: &'a EnvironmentFactory) -> Self {
        self.env_factory = Some(env_factory);
        self
    }

    pub fn config(mut self, config: LedgerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn bootstrap_weights(mut self, weights: BootstrapWeights) -> Self {
        self.bootstrap_weights = Some(weights);
        self
    }

    pub fn constants(mut self, constants: LedgerConstants) -> Self {
        self.ledger_constants = Some(constants);
        self
    }

    pub fn stats(mut self, stats: Arc<Stats>) -> Self {
        self.stats = Some(stats);
        self
    }

    pub fn generate_cache(mut self, flags: GenerateCacheFlags) -> Self {
        self.generate_cache = flags;
        self
    }

    pub fn init_thread_count(mut self, count: usize) -> Self {
        self.thread_count = count;
        self
    }

    pub fn finish(mut self) -> anyhow::Result<Ledger> {
        self.config.validate()?;

        let mut generate_cache = self.generate_cache.clone();
        generate_cache.consistency_check |= self.config.consistency_check;

        let ledger_constants = self
            .ledger_constants
            .take()
            .unwrap_or_else(LedgerConstants::live);

        let bootstrap_weights = self.bootstrap_weights.unwrap_or_default();
        let rep_weights = Arc::new(RepWeightCache::with_bootstrap_weights(
            bootstrap_weights,
            Arc::new(opal_store::LedgerCache::new()),
        ));

        let stats = self.stats.unwrap_or_else(|| Arc::new(Stats::default()));

        if self.thread_count == 0 {
            // Between 10 and 40 threads, scales well even in low power
            // systems as long as actions are I/O bound
            self.thread_count = max(10, min(40, 11 * get_cpu_count()));
        }

        let backend: Backend = self.config.database_backend.into();
        let env_options = EnvironmentOptions {
            backend,
            max_dbs: LMDB_MAX_DBS,
            map_size: LMDB_MAP_SIZE,
            path: match backend {
                Backend::Lmdb => self.path.join(LMDB_DATA_FILE),
                Backend::Rocksdb => self.path.join(ROCKSDB_DIR),
            },
            tables: TABLE_NAMES.to_vec(),
        };

        let default_env_factory = EnvironmentFactory::default();
        let env_factory = self.env_factory.unwrap_or(&default_env_factory);
        let env = env_factory.create(env_options)?;

        Ledger::with_cache_flags(
            env,
            ledger_constants,
            self.config.min_rep_weight,
            rep_weights,
            stats,
            self.thread_count,
            &generate_cache,
            self.config.max_backlog_size,
            self.config.max_rollback_depth,
        )
    }
}
