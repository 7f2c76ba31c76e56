//! Consensus engine errors.
use alloy_primitives::{B256, U256};

use crate::provider::ProviderError;

/// Errors returned by the Taiko consensus engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConsensusError {
    /// The header timestamp is ahead of the local clock.
    #[error("block in the future: timestamp {timestamp} > now {now}")]
    FutureBlock {
        /// Header timestamp.
        timestamp: u64,
        /// Local clock, in seconds.
        now: u64,
    },
    /// The header `extraData` exceeds the chain limit.
    #[error("extra-data too long: {len} > {max}")]
    ExtraDataTooLong {
        /// Length of the header `extraData`.
        len: usize,
        /// Maximum allowed length.
        max: usize,
    },
    /// The header timestamp is older than its parent's.
    #[error("timestamp older than parent: {timestamp} < {parent_timestamp}")]
    OlderBlockTime {
        /// Parent timestamp.
        parent_timestamp: u64,
        /// Header timestamp.
        timestamp: u64,
    },
    /// The block number does not extend the parent, or is the genesis number when sealing.
    #[error("invalid block number {0}")]
    InvalidNumber(u64),
    /// The header carries a non-zero difficulty.
    #[error("invalid difficulty: have {0}, want 0")]
    InvalidDifficulty(U256),
    /// The header gas limit exceeds the chain maximum.
    #[error("invalid gasLimit: have {gas_limit}, max {max}")]
    InvalidGasLimit {
        /// Header gas limit.
        gas_limit: u64,
        /// Maximum allowed gas limit.
        max: u64,
    },
    /// The header uses more gas than its limit.
    #[error("invalid gasUsed: have {gas_used}, gasLimit {gas_limit}")]
    InvalidGasUsed {
        /// Header gas used.
        gas_used: u64,
        /// Header gas limit.
        gas_limit: u64,
    },
    /// The header or block carries uncles.
    #[error("uncles not empty")]
    UnclesNotEmpty,
    /// A non-zero base fee was set before London.
    #[error("base fee not zero: {0}")]
    BaseFeeNotZero(u64),
    /// The parent block is not known.
    #[error("unknown ancestor {0}")]
    UnknownAncestor(B256),
    /// The chain store failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}
