#[macro_use]
extern crate anyhow;

#[macro_use]
extern crate strum_macros;

mod block_cementer;
mod block_insertion;
mod block_rollback;
mod config;
mod dependent_blocks_finder;
mod generate_cache_flags;
mod ledger;
mod ledger_builder;
mod ledger_constants;
mod ledger_inserter;
mod ledger_sets;
mod migrate;
mod rep_weight_cache;
mod rep_weights_updater;
mod representative_block_finder;

#[cfg(test)]
mod ledger_tests;

pub(crate) use block_rollback::BlockRollbackPerformer;
pub use block_rollback::RollbackError;
pub use config::{DatabaseBackend, LedgerConfig};
pub use dependent_blocks_finder::DependentBlocksFinder;
pub use generate_cache_flags::GenerateCacheFlags;
pub use ledger::*;
pub use ledger_builder::LedgerBuilder;
pub use ledger_constants::{
    DEV_GENESIS_ACCOUNT, DEV_GENESIS_BLOCK, DEV_GENESIS_HASH, DEV_GENESIS_PUB_KEY,
    LEDGER_CONSTANTS_STUB, LedgerConstants,
};
pub use ledger_inserter::{LedgerBlockInserter, LedgerInserter};
pub use ledger_sets::*;
pub use rep_weight_cache::{BootstrapWeights, RepWeightCache, RepWeights};
pub use rep_weights_updater::RepWeightsUpdater;
pub(crate) use representative_block_finder::RepresentativeBlockFinder;
