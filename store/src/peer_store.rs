use std::{
    net::{Ipv6Addr, SocketAddrV6},
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use opal_nullable_kv::{ConfiguredDatabase, Database, Environment, Transaction, WriteTransaction};

use crate::{PEERS_TEST_DATABASE, TableIterator};

/// Recently seen peer endpoints and when they were last seen
pub struct PeerStore {
    database: Database,
}

impl PeerStore {
    pub fn new(env: &Environment) -> anyhow::Result<Self> {
        let database = env.create_db(Some("peers"))?;
        Ok(Self { database })
    }

    pub fn put(&self, txn: &mut WriteTransaction, endpoint: SocketAddrV6, time: SystemTime) {
        txn.put(
            self.database,
            &endpoint_key(&endpoint),
            &time_value(time),
        )
        .expect("Could not put peer");
    }

    pub fn del(&self, txn: &mut WriteTransaction, endpoint: SocketAddrV6) {
        txn.delete(self.database, &endpoint_key(&endpoint))
            .expect("Could not delete peer");
    }

    pub fn exists(&self, txn: &dyn Transaction, endpoint: SocketAddrV6) -> bool {
        txn.exists(self.database, &endpoint_key(&endpoint))
    }

    pub fn count(&self, txn: &dyn Transaction) -> u64 {
        txn.count(self.database)
    }

    pub fn iter<'tx>(
        &self,
        tx: &'tx dyn Transaction,
    ) -> impl Iterator<Item = (SocketAddrV6, SystemTime)> + 'tx {
        let cursor = tx
            .cursor(self.database)
            .expect("Could not read from peer store");
        TableIterator::new(cursor, read_peer_record)
    }
}

fn endpoint_key(endpoint: &SocketAddrV6) -> [u8; 18] {
    let mut key = [0u8; 18];
    key[..16].copy_from_slice(&endpoint.ip().octets());
    key[16..].copy_from_slice(&endpoint.port().to_be_bytes());
    key
}

fn time_value(time: SystemTime) -> [u8; 8] {
    let millis = time
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default();
    millis.to_be_bytes()
}

fn read_peer_record(key: &[u8], value: &[u8]) -> (SocketAddrV6, SystemTime) {
    let ip = Ipv6Addr::from(<[u8; 16]>::try_from(&key[..16]).expect("Should be a valid peer ip"));
    let port = u16::from_be_bytes(key[16..].try_into().expect("Should be a valid peer port"));
    let millis = u64::from_be_bytes(value.try_into().expect("Should be a valid peer timestamp"));
    (
        SocketAddrV6::new(ip, port, 0, 0),
        UNIX_EPOCH + Duration::from_millis(millis),
    )
}

pub struct ConfiguredPeersDatabaseBuilder {
    database: ConfiguredDatabase,
}

impl ConfiguredPeersDatabaseBuilder {
    pub fn new() -> Self {
        Self {
            database: ConfiguredDatabase::new(PEERS_TEST_DATABASE, "peers"),
        }
    }

    pub fn peer(mut self, endpoint: SocketAddrV6, time: SystemTime) -> Self {
        self.database
            .insert(endpoint_key(&endpoint), time_value(time));
        self
    }

    pub fn build(self) -> ConfiguredDatabase {
        self.database
    }
}

impl Default for ConfiguredPeersDatabaseBuilder {
    fn default() -> Self {
        Self::new()
    }
}
