//! Transaction execution, block sealing and pool splitting errors.
use alethia_l2_consensus::{ConsensusError, ProviderError};
use alloy_primitives::{Address, B256};

/// Per-transaction faults reported while committing a transaction to an execution environment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TxExecutionError {
    /// The block gas pool cannot cover the transaction gas limit.
    #[error("gas limit reached: have {available}, want {required}")]
    GasLimitReached {
        /// Gas left in the pool.
        available: u64,
        /// Gas limit of the transaction.
        required: u64,
    },
    /// The transaction nonce is below the sender's account nonce.
    #[error("nonce too low: address {address}, tx: {tx} state: {state}")]
    NonceTooLow {
        /// Sender address.
        address: Address,
        /// Transaction nonce.
        tx: u64,
        /// Account nonce.
        state: u64,
    },
    /// The transaction nonce is above the sender's account nonce.
    #[error("nonce too high: address {address}, tx: {tx} state: {state}")]
    NonceTooHigh {
        /// Sender address.
        address: Address,
        /// Transaction nonce.
        tx: u64,
        /// Account nonce.
        state: u64,
    },
    /// The transaction type is not enabled at this block.
    #[error("transaction type {0} not supported")]
    TxTypeNotSupported(u8),
    /// The sender could not be recovered from the signature.
    #[error("invalid sender signature")]
    SenderRecovery,
    /// Any other execution failure.
    #[error("execution failed: {0}")]
    Execution(String),
}

/// Errors that abort sealing a proposed block.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BlockSealError {
    /// The proposed transaction list is not a valid RLP list of transactions.
    #[error("failed to decode txList: {0}")]
    TxListDecode(#[from] alloy_rlp::Error),
    /// The proposed transaction list is empty; every block carries the anchor transaction.
    #[error("too less transactions in the block")]
    EmptyTxList,
    /// The sealed block was not delivered by the engine.
    #[error("sealing result for {0} was not delivered")]
    SealResultMissing(B256),
    /// Header preparation or sealing failed.
    #[error(transparent)]
    Consensus(ConsensusError),
    /// The state store failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl From<ConsensusError> for BlockSealError {
    fn from(err: ConsensusError) -> Self {
        match err {
            ConsensusError::Provider(err) => Self::Provider(err),
            err => Self::Consensus(err),
        }
    }
}

/// Errors of the pool content splitter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SplitError {
    /// A local account is not a valid hex address.
    #[error("invalid account: {0}")]
    InvalidAccount(String),
}
