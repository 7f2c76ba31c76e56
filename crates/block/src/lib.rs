#![cfg_attr(not(test), warn(missing_docs, clippy::missing_docs_in_private_items))]
#![cfg_attr(test, allow(missing_docs, clippy::missing_docs_in_private_items))]
//! Taiko L2 transaction-list building, pool splitting, and proposed-block sealing.
/// Greedy packing of pending transactions into one list.
pub mod builder;
/// Per-list execution environment and gas accounting.
pub mod environment;
/// Error types for execution, sealing, and splitting.
pub mod error;
/// Allocation-pass splitting of pool content without execution.
pub mod splitter;
/// Collaborator traits for state access and the transaction pool.
pub mod state;
/// Price-and-nonce ordered transaction selection.
pub mod tx_selection;
/// Multi-list building and block sealing against the canonical chain.
pub mod worker;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use builder::{TxListLimits, commit_l2_transactions};
pub use environment::{ExecutionEnvironment, GasPool};
pub use error::{BlockSealError, SplitError, TxExecutionError};
pub use splitter::PoolContentSplitter;
pub use state::{ExecutionState, PendingPool, StateProviderFactory, TxAccessContext, TxOutcome};
pub use tx_selection::{TransactionsByPriceAndNonce, split_locals};
pub use worker::{GenerateParams, SealOutcome, SkippedTx, TaikoWorker};
