#![allow(clippy::too_many_arguments)]
use alethia_l2_block::{PendingPool, StateProviderFactory, TaikoWorker, TxListLimits};
use alethia_l2_consensus::ChainHeaderReader;
use alethia_l2_db::{KeyValueStore, L1OriginStore};
use alethia_l2_primitives::{L1Origin, PreBuiltTxList, TransactionList};
use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use jsonrpsee::{core::RpcResult, proc_macros::rpc};
use tracing::info;

use crate::eth::error::TaikoApiError;

/// trait interface for a custom auth rpc namespace: `taikoAuth`
///
/// This defines the Taiko namespace where all methods are configured as trait functions.
#[rpc(server, namespace = "taikoAuth")]
pub trait TaikoAuthExtApi {
    /// Moves the head L1 origin marker to the given L2 block.
    #[method(name = "setHeadL1Origin")]
    async fn set_head_l1_origin(&self, id: U256) -> RpcResult<U256>;
    /// Stores the L1 origin of an L2 block.
    #[method(name = "updateL1Origin")]
    async fn update_l1_origin(&self, l1_origin: L1Origin) -> RpcResult<Option<L1Origin>>;
    /// Builds up to `max_transactions_lists` executed transaction lists from the pool.
    #[method(name = "txPoolContent")]
    async fn tx_pool_content(
        &self,
        beneficiary: Address,
        base_fee: u64,
        max_transactions_per_block: u64,
        block_max_gas_limit: u64,
        max_bytes_per_tx_list: u64,
        locals: Option<Vec<Address>>,
        max_transactions_lists: u64,
    ) -> RpcResult<Vec<PreBuiltTxList>>;
}

/// A concrete implementation of the `TaikoAuthExtApi` trait.
#[derive(Debug)]
pub struct TaikoAuthExt<DB, Chain, Factory, Pool> {
    /// L1 origin records.
    origins: L1OriginStore<DB>,
    /// List builder over the canonical head.
    worker: TaikoWorker<Chain, Factory, Pool>,
}

impl<DB, Chain, Factory, Pool> TaikoAuthExt<DB, Chain, Factory, Pool> {
    /// Creates a new instance of `TaikoAuthExt`.
    pub fn new(origins: L1OriginStore<DB>, worker: TaikoWorker<Chain, Factory, Pool>) -> Self {
        Self { origins, worker }
    }
}

#[async_trait]
impl<DB, Chain, Factory, Pool> TaikoAuthExtApiServer for TaikoAuthExt<DB, Chain, Factory, Pool>
where
    DB: KeyValueStore + 'static,
    Chain: ChainHeaderReader + 'static,
    Factory: StateProviderFactory + 'static,
    Pool: PendingPool + 'static,
{
    /// Sets the L1 head origin in the database.
    async fn set_head_l1_origin(&self, id: U256) -> RpcResult<U256> {
        self.origins.set_head(id).map_err(TaikoApiError::from)?;
        Ok(id)
    }

    /// Updates the L1 origin in the database.
    async fn update_l1_origin(&self, l1_origin: L1Origin) -> RpcResult<Option<L1Origin>> {
        self.origins.put(&l1_origin).map_err(TaikoApiError::from)?;
        Ok(Some(l1_origin))
    }

    /// Retrieves the transaction pool content with the given limits.
    async fn tx_pool_content(
        &self,
        beneficiary: Address,
        base_fee: u64,
        max_transactions_per_block: u64,
        block_max_gas_limit: u64,
        max_bytes_per_tx_list: u64,
        locals: Option<Vec<Address>>,
        max_transactions_lists: u64,
    ) -> RpcResult<Vec<PreBuiltTxList>> {
        if max_transactions_lists == 0 {
            return Err(TaikoApiError::InvalidParams(
                "`maxTransactionsLists` must not be `0`".to_string(),
            )
            .into());
        }

        info!(target: "taiko_rpc", ?beneficiary, base_fee, max_transactions_per_block, block_max_gas_limit, max_bytes_per_tx_list, ?locals, max_transactions_lists, "Building prebuilt transaction lists from the pool");

        let limits = TxListLimits {
            max_transactions_per_list: max_transactions_per_block,
            block_max_gas_limit,
            max_bytes_per_tx_list,
        };
        let lists = self
            .worker
            .build_transactions_lists(
                beneficiary,
                Some(base_fee),
                limits,
                &locals.unwrap_or_default(),
                max_transactions_lists,
            )
            .map_err(TaikoApiError::from)?;

        Ok(lists.into_iter().map(TransactionList::into_prebuilt).collect())
    }
}
