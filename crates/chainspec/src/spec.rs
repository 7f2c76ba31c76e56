//! Taiko chain-spec type and per-block execution rules.
use alloy_hardforks::{EthereumHardfork, EthereumHardforks, ForkCondition};
use alloy_primitives::{Address, address};

use crate::{MAX_GAS_LIMIT, MAXIMUM_EXTRA_DATA_SIZE, hardfork::ChainHardforks};

/// Transaction type byte of legacy transactions.
pub const LEGACY_TX_TYPE: u8 = 0x00;
/// Transaction type byte of EIP-2930 transactions.
pub const EIP2930_TX_TYPE: u8 = 0x01;
/// Transaction type byte of EIP-1559 transactions.
pub const EIP1559_TX_TYPE: u8 = 0x02;
/// Transaction type byte of EIP-4844 transactions.
pub const EIP4844_TX_TYPE: u8 = 0x03;
/// Transaction type byte of EIP-7702 transactions.
pub const EIP7702_TX_TYPE: u8 = 0x04;

/// A Taiko chain specification.
///
/// Describes the chain ID, which hardforks are active under which conditions, and the header
/// limits enforced by the Taiko consensus rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaikoChainSpec {
    /// The chain ID.
    pub chain_id: u64,
    /// Hardfork activation table.
    pub hardforks: ChainHardforks,
    /// Maximum length of the header `extraData` field.
    pub max_extra_data_size: usize,
    /// Maximum header gas limit.
    pub max_gas_limit: u64,
}

impl Default for TaikoChainSpec {
    fn default() -> Self {
        Self::new(crate::TAIKO_DEVNET_CHAIN_ID, crate::hardfork::TAIKO_DEVNET_HARDFORKS.clone())
    }
}

impl TaikoChainSpec {
    /// Creates a chain spec with the default Taiko header limits.
    pub fn new(chain_id: u64, hardforks: ChainHardforks) -> Self {
        Self {
            chain_id,
            hardforks,
            max_extra_data_size: MAXIMUM_EXTRA_DATA_SIZE,
            max_gas_limit: MAX_GAS_LIMIT,
        }
    }

    /// Returns a copy of this spec with `fork` activated under `condition`.
    pub fn with_fork(mut self, fork: EthereumHardfork, condition: ForkCondition) -> Self {
        self.hardforks.insert(fork, condition);
        self
    }

    /// Returns whether EIP-155 replay protection is recognized at the given block.
    pub fn is_eip155_active_at_block(&self, block_number: u64) -> bool {
        self.is_spurious_dragon_active_at_block(block_number)
    }

    /// Returns whether blocks at this timestamp carry withdrawals.
    pub fn is_withdrawals_active_at_timestamp(&self, timestamp: u64) -> bool {
        self.is_shanghai_active_at_timestamp(timestamp)
    }

    /// Collects the execution rules in force for a block.
    pub fn rules(&self, block_number: u64, timestamp: u64) -> Rules {
        Rules {
            chain_id: self.chain_id,
            is_eip155: self.is_eip155_active_at_block(block_number),
            is_berlin: self.is_berlin_active_at_block(block_number),
            is_london: self.is_london_active_at_block(block_number),
            is_shanghai: self.is_shanghai_active_at_timestamp(timestamp),
            is_cancun: self.is_cancun_active_at_timestamp(timestamp),
            is_prague: self.is_prague_active_at_timestamp(timestamp),
        }
    }
}

impl EthereumHardforks for TaikoChainSpec {
    /// Retrieves [`ForkCondition`] by an [`EthereumHardfork`]. If `fork` is not present, returns
    /// [`ForkCondition::Never`].
    fn ethereum_fork_activation(&self, fork: EthereumHardfork) -> ForkCondition {
        self.hardforks.fork(fork)
    }
}

/// Execution rules derived from the chain spec for one block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rules {
    /// The chain ID.
    pub chain_id: u64,
    /// EIP-155 replay protection.
    pub is_eip155: bool,
    /// Berlin (EIP-2930 access lists).
    pub is_berlin: bool,
    /// London (EIP-1559 fee market transactions).
    pub is_london: bool,
    /// Shanghai (withdrawals).
    pub is_shanghai: bool,
    /// Cancun (point evaluation precompile).
    pub is_cancun: bool,
    /// Prague (BLS precompiles, EIP-7702).
    pub is_prague: bool,
}

impl Rules {
    /// Returns whether a transaction of type `tx_type` may be included under these rules.
    ///
    /// Blob transactions are never accepted on L2.
    pub const fn is_tx_type_supported(&self, tx_type: u8) -> bool {
        match tx_type {
            LEGACY_TX_TYPE => true,
            EIP2930_TX_TYPE => self.is_berlin,
            EIP1559_TX_TYPE => self.is_london,
            EIP7702_TX_TYPE => self.is_prague,
            _ => false,
        }
    }

    /// Returns the precompiled contract addresses active under these rules.
    pub fn active_precompiles(&self) -> Vec<Address> {
        let mut precompiles = ISTANBUL_PRECOMPILES.to_vec();
        if self.is_cancun {
            precompiles.push(POINT_EVALUATION_PRECOMPILE);
        }
        if self.is_prague {
            precompiles.extend_from_slice(&PRAGUE_BLS_PRECOMPILES);
        }
        precompiles
    }
}

/// Precompiles available since Istanbul (`0x01..=0x09`).
const ISTANBUL_PRECOMPILES: [Address; 9] = [
    address!("0x0000000000000000000000000000000000000001"),
    address!("0x0000000000000000000000000000000000000002"),
    address!("0x0000000000000000000000000000000000000003"),
    address!("0x0000000000000000000000000000000000000004"),
    address!("0x0000000000000000000000000000000000000005"),
    address!("0x0000000000000000000000000000000000000006"),
    address!("0x0000000000000000000000000000000000000007"),
    address!("0x0000000000000000000000000000000000000008"),
    address!("0x0000000000000000000000000000000000000009"),
];

/// KZG point evaluation precompile introduced in Cancun.
const POINT_EVALUATION_PRECOMPILE: Address =
    address!("0x000000000000000000000000000000000000000a");

/// BLS12-381 precompiles introduced in Prague (`0x0b..=0x11`).
const PRAGUE_BLS_PRECOMPILES: [Address; 7] = [
    address!("0x000000000000000000000000000000000000000b"),
    address!("0x000000000000000000000000000000000000000c"),
    address!("0x000000000000000000000000000000000000000d"),
    address!("0x000000000000000000000000000000000000000e"),
    address!("0x000000000000000000000000000000000000000f"),
    address!("0x0000000000000000000000000000000000000010"),
    address!("0x0000000000000000000000000000000000000011"),
];
