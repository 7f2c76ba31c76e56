use alethia_l2_block::{PendingPool, PoolContentSplitter};
use alethia_l2_consensus::ReceiptsReader;
use alethia_l2_db::{KeyValueStore, L1OriginStore};
use alethia_l2_primitives::L1Origin;
use alloy_consensus::{ReceiptEnvelope, TxEnvelope};
use alloy_primitives::{B256, U256};
use jsonrpsee::{core::RpcResult, proc_macros::rpc};
use tracing::debug;

use crate::eth::error::TaikoApiError;

/// trait interface for a custom rpc namespace: `taiko`
///
/// This defines the Taiko namespace where all methods are configured as trait functions.
#[rpc(server, namespace = "taiko")]
pub trait TaikoExtApi {
    /// Returns the L1 origin of the latest L2 block that has one.
    #[method(name = "headL1Origin")]
    fn head_l1_origin(&self) -> RpcResult<Option<L1Origin>>;
    /// Returns the L1 origin of the given L2 block.
    #[method(name = "l1OriginByID")]
    fn l1_origin_by_id(&self, id: U256) -> RpcResult<Option<L1Origin>>;
    /// Returns the receipts of a possibly non-canonical block.
    #[method(name = "getThrowawayTransactionReceipts")]
    fn get_throwaway_transaction_receipts(&self, hash: B256) -> RpcResult<Vec<ReceiptEnvelope>>;
    /// Returns the first transaction list cut from the pending pool.
    #[method(name = "txPoolContent")]
    fn tx_pool_content(
        &self,
        max_transactions_per_block: u64,
        block_max_gas_limit: u64,
        max_bytes_per_tx_list: u64,
        min_tx_gas_limit: u64,
        locals: String,
    ) -> RpcResult<Vec<TxEnvelope>>;
}

/// The Taiko RPC extension implementation.
#[derive(Debug)]
pub struct TaikoExt<DB, Chain, Pool> {
    /// L1 origin records.
    origins: L1OriginStore<DB>,
    /// Receipt source for throwaway blocks.
    chain: Chain,
    /// Transaction pool.
    pool: Pool,
}

impl<DB, Chain, Pool> TaikoExt<DB, Chain, Pool> {
    /// Creates a new instance of `TaikoExt`.
    pub fn new(origins: L1OriginStore<DB>, chain: Chain, pool: Pool) -> Self {
        Self { origins, chain, pool }
    }
}

impl<DB, Chain, Pool> TaikoExtApiServer for TaikoExt<DB, Chain, Pool>
where
    DB: KeyValueStore + 'static,
    Chain: ReceiptsReader + 'static,
    Pool: PendingPool + 'static,
{
    /// Retrieves the L1 origin of the latest L2 block that has one.
    fn head_l1_origin(&self) -> RpcResult<Option<L1Origin>> {
        Ok(Some(self.origins.get_head().map_err(TaikoApiError::from)?))
    }

    /// Retrieves the L1 origin by its ID from the database.
    fn l1_origin_by_id(&self, id: U256) -> RpcResult<Option<L1Origin>> {
        Ok(Some(self.origins.get(id).map_err(TaikoApiError::from)?))
    }

    /// Returns the receipts of a block without checking that it is canonical.
    fn get_throwaway_transaction_receipts(&self, hash: B256) -> RpcResult<Vec<ReceiptEnvelope>> {
        Ok(self
            .chain
            .receipts_by_block_hash(hash)
            .map_err(TaikoApiError::from)?
            .ok_or(TaikoApiError::GethNotFound)?)
    }

    /// Returns the first list the content splitter cuts from the pending pool.
    fn tx_pool_content(
        &self,
        max_transactions_per_block: u64,
        block_max_gas_limit: u64,
        max_bytes_per_tx_list: u64,
        min_tx_gas_limit: u64,
        locals: String,
    ) -> RpcResult<Vec<TxEnvelope>> {
        let splitter = PoolContentSplitter {
            max_transactions_per_block,
            block_max_gas_limit,
            max_bytes_per_tx_list,
            min_tx_gas_limit,
            locals: Vec::new(),
        }
        .with_locals(&locals)
        .map_err(TaikoApiError::from)?;

        let pending = self.pool.pending(false);
        debug!(target: "taiko_rpc", senders = pending.len(), "Fetched pending transactions");

        Ok(splitter
            .split(pending)
            .into_iter()
            .next()
            .map(|list| list.txs.into_iter().map(|tx| tx.into_inner()).collect())
            .unwrap_or_default())
    }
}
