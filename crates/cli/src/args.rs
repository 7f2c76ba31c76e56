use alethia_l2_block::{PoolContentSplitter, TxListLimits};
use alloy_primitives::Address;
use clap::ArgAction;
use tracing::level_filters::LevelFilter;

/// Limits used when proposing transaction lists from the pool.
#[derive(Debug, Clone, PartialEq, Eq, clap::Args)]
#[command(next_help_heading = "Taiko proposals")]
pub struct TxPoolContentArgs {
    /// Maximum number of transactions in one list.
    #[arg(long = "txpool.max-transactions-per-list", default_value_t = 150)]
    pub max_transactions_per_list: u64,

    /// Gas available to one list.
    #[arg(long = "txpool.block-max-gas-limit", default_value_t = 240_000_000)]
    pub block_max_gas_limit: u64,

    /// Encoded size a list must stay below, in bytes.
    #[arg(long = "txpool.max-bytes-per-tx-list", default_value_t = 120_000)]
    pub max_bytes_per_tx_list: u64,

    /// Maximum number of lists built per request.
    #[arg(long = "txpool.max-transactions-lists", default_value_t = 1)]
    pub max_transactions_lists: u64,

    /// Transactions with a lower gas limit are never proposed.
    #[arg(long = "txpool.min-tx-gas-limit", default_value_t = 21_000)]
    pub min_tx_gas_limit: u64,

    /// Comma separated senders whose transactions are proposed first.
    #[arg(long = "txpool.locals", value_delimiter = ',')]
    pub locals: Vec<Address>,
}

impl Default for TxPoolContentArgs {
    fn default() -> Self {
        Self {
            max_transactions_per_list: 150,
            block_max_gas_limit: 240_000_000,
            max_bytes_per_tx_list: 120_000,
            max_transactions_lists: 1,
            min_tx_gas_limit: 21_000,
            locals: Vec::new(),
        }
    }
}

impl TxPoolContentArgs {
    /// Limits of the executing list builder.
    pub const fn limits(&self) -> TxListLimits {
        TxListLimits {
            max_transactions_per_list: self.max_transactions_per_list,
            block_max_gas_limit: self.block_max_gas_limit,
            max_bytes_per_tx_list: self.max_bytes_per_tx_list,
        }
    }

    /// Configuration of the non-executing content splitter.
    pub fn splitter(&self) -> PoolContentSplitter {
        PoolContentSplitter {
            max_transactions_per_block: self.max_transactions_per_list,
            block_max_gas_limit: self.block_max_gas_limit,
            max_bytes_per_tx_list: self.max_bytes_per_tx_list,
            min_tx_gas_limit: self.min_tx_gas_limit,
            locals: self.locals.clone(),
        }
    }
}

/// Log verbosity.
#[derive(Debug, Clone, Default, PartialEq, Eq, clap::Args)]
#[command(next_help_heading = "Logging")]
pub struct LogArgs {
    /// Increase logging verbosity: `-v` info, `-vv` debug, `-vvv` trace.
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbosity: u8,
}

impl LogArgs {
    /// The default level when `RUST_LOG` is unset.
    pub const fn level_filter(&self) -> LevelFilter {
        match self.verbosity {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Debug, Parser)]
    struct CommandParser {
        #[command(flatten)]
        txpool: TxPoolContentArgs,
        #[command(flatten)]
        logs: LogArgs,
    }

    #[test]
    fn test_default_args() {
        let args = CommandParser::parse_from(["alethia-l2"]);
        assert_eq!(args.txpool, TxPoolContentArgs::default());
        assert_eq!(args.logs.level_filter(), LevelFilter::WARN);
    }

    #[test]
    fn test_parse_txpool_args() {
        let a = Address::repeat_byte(0xaa);
        let b = Address::repeat_byte(0xbb);
        let args = CommandParser::parse_from([
            "alethia-l2".to_string(),
            "--txpool.max-transactions-per-list".to_string(),
            "10".to_string(),
            "--txpool.block-max-gas-limit".to_string(),
            "1000000".to_string(),
            "--txpool.max-bytes-per-tx-list".to_string(),
            "4096".to_string(),
            "--txpool.max-transactions-lists".to_string(),
            "3".to_string(),
            "--txpool.min-tx-gas-limit".to_string(),
            "25000".to_string(),
            "--txpool.locals".to_string(),
            format!("{a},{b}"),
            "-vv".to_string(),
        ]);

        assert_eq!(
            args.txpool.limits(),
            TxListLimits {
                max_transactions_per_list: 10,
                block_max_gas_limit: 1_000_000,
                max_bytes_per_tx_list: 4096,
            }
        );
        assert_eq!(args.txpool.max_transactions_lists, 3);

        let splitter = args.txpool.splitter();
        assert_eq!(splitter.min_tx_gas_limit, 25_000);
        assert_eq!(splitter.locals, vec![a, b]);
        assert_eq!(args.logs.level_filter(), LevelFilter::DEBUG);
    }

    #[test]
    fn test_reject_malformed_local() {
        assert!(CommandParser::try_parse_from(["alethia-l2", "--txpool.locals", "0x12"]).is_err());
    }
}
