use serde::{Deserialize, Serialize};
use tracing::error;

use opal_nullable_kv::Backend;
use opal_types::Amount;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    Lmdb,
    Rocksdb,
}

impl From<DatabaseBackend> for Backend {
    fn from(value: DatabaseBackend) -> Self {
        match value {
            DatabaseBackend::Lmdb => Backend::Lmdb,
            DatabaseBackend::Rocksdb => Backend::Rocksdb,
        }
    }
}

/// Configuration recognized by the ledger engine
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    pub database_backend: DatabaseBackend,

    /// Representatives below this weight are excluded from enumerated
    /// weight snapshots. Totals always include them.
    pub min_rep_weight: Amount,

    /// Soft upper bound for the unconfirmed block count used by external
    /// schedulers. 0 means unlimited.
    pub max_backlog_size: u64,

    /// Bound for cascading rollbacks
    pub max_rollback_depth: usize,

    /// Run the full balance sum verification at startup
    pub consistency_check: bool,

    /// Retired switch that used to select the LSM backend. Only consulted
    /// to detect stale configurations.
    #[serde(rename = "rocksdb_enable")]
    pub legacy_rocksdb_enable: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            database_backend: DatabaseBackend::Lmdb,
            min_rep_weight: Amount::ZERO,
            max_backlog_size: 0,
            max_rollback_depth: 4096,
            consistency_check: false,
            legacy_rocksdb_enable: false,
        }
    }
}

impl LedgerConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.legacy_rocksdb_enable && self.database_backend == DatabaseBackend::Lmdb {
            error!("Legacy RocksDB setting detected in the configuration");
            error!("Use 'database_backend' to select the rocksdb backend instead");
            bail!("legacy rocksdb flag conflicts with the lmdb backend");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = LedgerConfig::default();
        assert_eq!(config.database_backend, DatabaseBackend::Lmdb);
        assert_eq!(config.max_backlog_size, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn backend_names() {
        let json = serde_json::to_string(&DatabaseBackend::Rocksdb).unwrap();
        assert_eq!(json, "\"rocksdb\"");
        let parsed: DatabaseBackend = serde_json::from_str("\"lmdb\"").unwrap();
        assert_eq!(parsed, DatabaseBackend::Lmdb);
    }

    #[test]
    fn stale_rocksdb_flag_is_rejected() {
        let config = LedgerConfig {
            legacy_rocksdb_enable: true,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = LedgerConfig {
            legacy_rocksdb_enable: true,
            database_backend: DatabaseBackend::Rocksdb,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
