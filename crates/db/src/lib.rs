#![cfg_attr(not(test), warn(missing_docs, clippy::missing_docs_in_private_items))]
#![cfg_attr(test, allow(missing_docs, clippy::missing_docs_in_private_items))]
//! Taiko L1 origin records and the key-value store they live in.
/// Error type of the origin store.
pub mod error;
/// Stored record models and key layout.
pub mod model;
/// Key-value backends and the origin store facade.
pub mod store;

pub use error::DatabaseError;
pub use model::StoredL1Origin;
pub use store::{
    KeyValueStore, L1OriginStore, MemoryDatabase, read_head_l1_origin, read_l1_origin,
    write_head_l1_origin, write_l1_origin,
};
