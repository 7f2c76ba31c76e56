//! Hardfork activation tables for the Taiko networks.
use std::sync::LazyLock;

use alloy_hardforks::{EthereumHardfork, ForkCondition};

/// Ordered list of Ethereum hardforks and their activation conditions for one chain.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChainHardforks {
    /// Hardforks in activation order.
    forks: Vec<(EthereumHardfork, ForkCondition)>,
}

impl ChainHardforks {
    /// Creates a new hardfork table from the given activation list.
    pub fn new(forks: Vec<(EthereumHardfork, ForkCondition)>) -> Self {
        Self { forks }
    }

    /// Retrieves the [`ForkCondition`] of `fork`, [`ForkCondition::Never`] when absent.
    pub fn fork(&self, fork: EthereumHardfork) -> ForkCondition {
        self.forks
            .iter()
            .find_map(|(known, condition)| (*known == fork).then_some(*condition))
            .unwrap_or(ForkCondition::Never)
    }

    /// Inserts or replaces the activation condition of `fork`.
    pub fn insert(&mut self, fork: EthereumHardfork, condition: ForkCondition) {
        match self.forks.iter_mut().find(|(known, _)| *known == fork) {
            Some(entry) => entry.1 = condition,
            None => self.forks.push((fork, condition)),
        }
    }

    /// Returns an iterator over all configured hardforks.
    pub fn forks_iter(&self) -> impl Iterator<Item = &(EthereumHardfork, ForkCondition)> {
        self.forks.iter()
    }
}

/// Taiko Mainnet list of hardforks.
pub static TAIKO_MAINNET_HARDFORKS: LazyLock<ChainHardforks> =
    LazyLock::new(|| ChainHardforks::new(shared_hardforks()));

/// Taiko Devnet list of hardforks.
pub static TAIKO_DEVNET_HARDFORKS: LazyLock<ChainHardforks> = LazyLock::new(|| {
    let mut forks = ChainHardforks::new(shared_hardforks());
    forks.insert(EthereumHardfork::Cancun, ForkCondition::Timestamp(0));
    forks.insert(EthereumHardfork::Prague, ForkCondition::Timestamp(0));
    forks
});

/// Hardforks every Taiko network activates at genesis.
fn shared_hardforks() -> Vec<(EthereumHardfork, ForkCondition)> {
    vec![
        (EthereumHardfork::Frontier, ForkCondition::Block(0)),
        (EthereumHardfork::Homestead, ForkCondition::Block(0)),
        (EthereumHardfork::Tangerine, ForkCondition::Block(0)),
        (EthereumHardfork::SpuriousDragon, ForkCondition::Block(0)),
        (EthereumHardfork::Byzantium, ForkCondition::Block(0)),
        (EthereumHardfork::Constantinople, ForkCondition::Block(0)),
        (EthereumHardfork::Petersburg, ForkCondition::Block(0)),
        (EthereumHardfork::Istanbul, ForkCondition::Block(0)),
        (EthereumHardfork::Berlin, ForkCondition::Block(0)),
        (EthereumHardfork::London, ForkCondition::Block(0)),
        (EthereumHardfork::Shanghai, ForkCondition::Timestamp(0)),
    ]
}
