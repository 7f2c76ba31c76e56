#![cfg_attr(not(test), warn(missing_docs, clippy::missing_docs_in_private_items))]
#![cfg_attr(test, allow(missing_docs, clippy::missing_docs_in_private_items))]
//! Data types shared by the Taiko L2 consensus engine, block builders, origin store and RPC.

/// Externally supplied block metadata.
pub mod metadata;
/// Cross-layer origin records in their RPC form.
pub mod l1_origin;
/// Recovered transactions, pending sets and the tx-list wire codec.
pub mod transaction;
/// Transaction lists produced by the proposal builders.
pub mod tx_list;
/// Signed transaction fixtures.
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use l1_origin::L1Origin;
pub use metadata::BlockMetadata;
pub use transaction::{
    PendingTransactions, RecoveredTx, decode_tx_list, encode_tx_list, encoded_tx_len,
    withdrawals_root,
};
pub use tx_list::{PreBuiltTxList, TransactionList};
