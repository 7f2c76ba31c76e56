//! Key-value store abstraction and L1 origin accessors.
use std::collections::BTreeMap;

use alethia_l2_primitives::L1Origin;
use alloy_primitives::U256;
use alloy_rlp::Decodable;
use auto_impl::auto_impl;
use parking_lot::RwLock;

use crate::{
    error::DatabaseError,
    model::{HEAD_L1_ORIGIN_KEY, StoredL1Origin, l1_origin_key},
};

/// A byte-oriented key-value backend.
#[auto_impl(&, Arc)]
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, DatabaseError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn put(&self, key: &[u8], value: Vec<u8>) -> Result<(), DatabaseError>;
}

/// An in-memory [`KeyValueStore`].
#[derive(Debug, Default)]
pub struct MemoryDatabase {
    /// Entries ordered by key.
    entries: RwLock<BTreeMap<Vec<u8>, Vec<u8>>>,
}

impl MemoryDatabase {
    /// Creates an empty database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the database holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl KeyValueStore for MemoryDatabase {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, DatabaseError> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn put(&self, key: &[u8], value: Vec<u8>) -> Result<(), DatabaseError> {
        self.entries.write().insert(key.to_vec(), value);
        Ok(())
    }
}

/// Reads and decodes the RLP value under `key`.
fn read_rlp<T: Decodable>(db: &impl KeyValueStore, key: &[u8]) -> Result<T, DatabaseError> {
    let raw = db.get(key)?.ok_or(DatabaseError::NotFound)?;
    Ok(alloy_rlp::decode_exact(raw)?)
}

/// Reads the L1 origin record of the given L2 block.
pub fn read_l1_origin(
    db: &impl KeyValueStore,
    block_id: U256,
) -> Result<StoredL1Origin, DatabaseError> {
    read_rlp(db, &l1_origin_key(block_id))
}

/// Writes the L1 origin record keyed by its block id.
pub fn write_l1_origin(db: &impl KeyValueStore, origin: &StoredL1Origin) -> Result<(), DatabaseError> {
    db.put(&l1_origin_key(origin.block_id), alloy_rlp::encode(origin))
}

/// Reads the latest L2 block id that has an L1 origin.
pub fn read_head_l1_origin(db: &impl KeyValueStore) -> Result<U256, DatabaseError> {
    read_rlp(db, HEAD_L1_ORIGIN_KEY)
}

/// Writes the latest L2 block id that has an L1 origin.
pub fn write_head_l1_origin(db: &impl KeyValueStore, block_id: U256) -> Result<(), DatabaseError> {
    db.put(HEAD_L1_ORIGIN_KEY, alloy_rlp::encode(block_id))
}

/// Typed access to the L1 origins kept in a [`KeyValueStore`].
#[derive(Debug, Clone, Default)]
pub struct L1OriginStore<DB> {
    /// Backend holding the encoded records.
    db: DB,
}

impl<DB: KeyValueStore> L1OriginStore<DB> {
    /// Wraps a key-value backend.
    pub const fn new(db: DB) -> Self {
        Self { db }
    }

    /// Returns the underlying backend.
    pub const fn db(&self) -> &DB {
        &self.db
    }

    /// Returns the L1 origin of the given L2 block.
    pub fn get(&self, block_id: U256) -> Result<L1Origin, DatabaseError> {
        read_l1_origin(&self.db, block_id).map(StoredL1Origin::into_rpc)
    }

    /// Stores an L1 origin under its block id.
    pub fn put(&self, origin: &L1Origin) -> Result<(), DatabaseError> {
        write_l1_origin(&self.db, &origin.into())
    }

    /// Returns the L1 origin of the latest L2 block that has one.
    pub fn get_head(&self) -> Result<L1Origin, DatabaseError> {
        self.get(self.get_head_id()?)
    }

    /// Returns the latest L2 block id that has an L1 origin.
    pub fn get_head_id(&self) -> Result<U256, DatabaseError> {
        read_head_l1_origin(&self.db)
    }

    /// Moves the head marker to `block_id`.
    pub fn set_head(&self, block_id: U256) -> Result<(), DatabaseError> {
        write_head_l1_origin(&self.db, block_id)
    }
}
