#![cfg_attr(not(test), warn(missing_docs, clippy::missing_docs_in_private_items))]
#![cfg_attr(test, allow(missing_docs, clippy::missing_docs_in_private_items))]
//! Command line arguments and tracing setup for the Taiko L2 block preparation core.
use std::sync::Arc;

use alethia_l2_chainspec::spec::TaikoChainSpec;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Proposal limits and logging argument groups.
pub mod args;
/// Chain-spec parser for Taiko network names.
pub mod parser;

pub use args::{LogArgs, TxPoolContentArgs};
pub use parser::{SUPPORTED_CHAINS, chain_value_parser};

/// The main alethia-l2 cli interface.
#[derive(Debug, Parser)]
#[command(name = "alethia-l2", version, about)]
pub struct TaikoCli {
    /// The chain this node is running.
    #[arg(
        long,
        value_name = "CHAIN",
        default_value = SUPPORTED_CHAINS[0],
        value_parser = chain_value_parser,
        help_heading = "Chain"
    )]
    pub chain: Arc<TaikoChainSpec>,

    /// Transaction list proposal limits.
    #[command(flatten)]
    pub txpool: TxPoolContentArgs,

    /// Logging options.
    #[command(flatten)]
    pub logs: LogArgs,
}

impl TaikoCli {
    /// Parsers only the default CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parsers only the default CLI arguments from the given iterator
    pub fn try_parse_args_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::try_parse_from(itr)
    }

    /// Installs a `fmt` subscriber filtered by `RUST_LOG`, defaulting to the `-v` level.
    pub fn init_tracing(&self) -> eyre::Result<()> {
        let filter = EnvFilter::builder()
            .with_default_directive(self.logs.level_filter().into())
            .from_env_lossy();

        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()
            .map_err(|e| eyre::eyre!("Failed to initialize tracing subscriber: {e}"))?;

        info!(target: "alethia_l2::cli", chain_id = self.chain.chain_id, "Initialized tracing");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_chain() {
        let cli = TaikoCli::try_parse_args_from(["alethia-l2"]).unwrap();
        assert_eq!(cli.chain.chain_id, 167_000);
        assert_eq!(cli.txpool, TxPoolContentArgs::default());
    }

    #[test]
    fn test_parse_chain() {
        let cli =
            TaikoCli::try_parse_args_from(["alethia-l2", "--chain", "devnet", "-vvv"]).unwrap();
        assert_eq!(cli.chain.chain_id, 167_001);
        assert_eq!(cli.logs.verbosity, 3);

        assert!(TaikoCli::try_parse_args_from(["alethia-l2", "--chain", "hoodi"]).is_err());
    }
}
