#![cfg_attr(not(test), warn(missing_docs, clippy::missing_docs_in_private_items))]
#![cfg_attr(test, allow(missing_docs, clippy::missing_docs_in_private_items))]
//! Taiko L2 chain specification, hardfork activations and per-block execution rules.
use std::sync::{Arc, LazyLock};

use crate::{
    hardfork::{TAIKO_DEVNET_HARDFORKS, TAIKO_MAINNET_HARDFORKS},
    spec::TaikoChainSpec,
};

/// Hardfork identifiers and activation schedules.
pub mod hardfork;
/// The chain specification type and the per-block [`spec::Rules`].
pub mod spec;

/// Chain ID of the Taiko Mainnet network.
pub const TAIKO_MAINNET_CHAIN_ID: u64 = 167_000;

/// Chain ID of the Taiko Devnet network.
pub const TAIKO_DEVNET_CHAIN_ID: u64 = 167_001;

/// Maximum size of the header `extraData` field, in bytes.
pub const MAXIMUM_EXTRA_DATA_SIZE: usize = 32;

/// Maximum header gas limit (2^63-1).
pub const MAX_GAS_LIMIT: u64 = 0x7fff_ffff_ffff_ffff;

/// Gas charged for the cheapest possible transaction (a plain value transfer).
pub const MIN_TRANSACTION_GAS: u64 = 21_000;

/// The Taiko Mainnet spec
pub static TAIKO_MAINNET: LazyLock<Arc<TaikoChainSpec>> = LazyLock::new(|| {
    TaikoChainSpec::new(TAIKO_MAINNET_CHAIN_ID, TAIKO_MAINNET_HARDFORKS.clone()).into()
});

/// The Taiko Devnet spec
pub static TAIKO_DEVNET: LazyLock<Arc<TaikoChainSpec>> = LazyLock::new(|| {
    TaikoChainSpec::new(TAIKO_DEVNET_CHAIN_ID, TAIKO_DEVNET_HARDFORKS.clone()).into()
});

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_static_specs_carry_chain_ids() {
        assert_eq!(TAIKO_MAINNET.chain_id, TAIKO_MAINNET_CHAIN_ID);
        assert_eq!(TAIKO_DEVNET.chain_id, TAIKO_DEVNET_CHAIN_ID);
        assert_eq!(TAIKO_DEVNET.max_extra_data_size, MAXIMUM_EXTRA_DATA_SIZE);
        assert_eq!(TAIKO_DEVNET.max_gas_limit, MAX_GAS_LIMIT);
    }
}
