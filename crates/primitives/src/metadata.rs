//! Proposer-supplied block metadata.
use alloy_eips::eip4895::Withdrawal;
use alloy_primitives::{Address, B256, Bytes};
use serde::{Deserialize, Serialize};

/// Block metadata supplied by the proposer when a block is sealed from a chosen tx list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockMetadata {
    /// Recipient of the block fees.
    pub beneficiary: Address,
    /// Gas limit of the sealed block.
    #[serde(with = "alloy_serde::quantity")]
    pub gas_limit: u64,
    /// Block timestamp, in seconds.
    #[serde(with = "alloy_serde::quantity")]
    pub timestamp: u64,
    /// Randomness carried in the header `mixHash`.
    pub mix_hash: B256,
    /// RLP encoded transaction list, the mandatory anchor transaction first.
    pub tx_list: Bytes,
    /// Header `extraData`.
    pub extra_data: Bytes,
    /// Withdrawals to include after Shanghai.
    #[serde(default)]
    pub withdrawals: Vec<Withdrawal>,
}
