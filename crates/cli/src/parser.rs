use std::sync::Arc;

use alethia_l2_chainspec::{TAIKO_DEVNET, TAIKO_MAINNET, spec::TaikoChainSpec};

/// Chains supported by alethia-l2. First value should be used as the default.
pub const SUPPORTED_CHAINS: &[&str] = &["mainnet", "devnet"];

/// Clap value parser for [`TaikoChainSpec`]s, matching a known chain by name.
pub fn chain_value_parser(s: &str) -> eyre::Result<Arc<TaikoChainSpec>> {
    Ok(match s {
        "mainnet" => TAIKO_MAINNET.clone(),
        "devnet" => TAIKO_DEVNET.clone(),
        _ => eyre::bail!("unsupported chain `{s}`, expected one of {SUPPORTED_CHAINS:?}"),
    })
}
