//! Collaborator interfaces for block state and the transaction pool.
use alethia_l2_chainspec::spec::Rules;
use alethia_l2_consensus::ProviderError;
use alethia_l2_primitives::{PendingTransactions, RecoveredTx};
use alloy_consensus::Header;
use alloy_eips::eip2930::AccessList;
use alloy_primitives::{Address, B256, Log};
use auto_impl::auto_impl;

use crate::error::TxExecutionError;

/// Accounts and slots touched by a transaction before it runs (EIP-2929 warm set).
#[derive(Debug, Clone, Copy)]
pub struct TxAccessContext<'a> {
    /// Rules of the block being built.
    pub rules: &'a Rules,
    /// Transaction sender.
    pub sender: Address,
    /// Block beneficiary.
    pub coinbase: Address,
    /// Call target, `None` for contract creation.
    pub to: Option<Address>,
    /// Active precompiles.
    pub precompiles: &'a [Address],
    /// Access list declared by the transaction.
    pub access_list: Option<&'a AccessList>,
}

/// Result of a successfully committed transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TxOutcome {
    /// Gas consumed by the transaction.
    pub gas_used: u64,
    /// Whether execution succeeded (EIP-658 status).
    pub success: bool,
    /// Emitted logs.
    pub logs: Vec<Log>,
}

/// Mutable per-block state used to execute transactions.
///
/// A failed [`ExecutionState::execute_transaction`] leaves the state untouched.
pub trait ExecutionState {
    /// Warms the accounts touched by the next transaction.
    fn prepare(&mut self, ctx: &TxAccessContext<'_>);

    /// Sets the hash and index used for logs of the next transaction.
    fn set_tx_context(&mut self, tx_hash: B256, index: usize);

    /// Executes and commits a transaction on top of the current state.
    ///
    /// `is_anchor` marks the protocol's mandatory first transaction of a proposed block.
    fn execute_transaction(
        &mut self,
        header: &Header,
        tx: &RecoveredTx,
        is_anchor: bool,
    ) -> Result<TxOutcome, TxExecutionError>;

    /// Computes the state root of the current state.
    fn intermediate_root(&mut self) -> B256;
}

/// Opens execution states at a given block.
#[auto_impl(&, Arc)]
pub trait StateProviderFactory: Send + Sync {
    /// The state type handed out.
    type State: ExecutionState;

    /// Returns a fresh state on top of the block with the given hash.
    fn state_by_block_hash(&self, hash: B256) -> Result<Self::State, ProviderError>;
}

/// Pending transaction source.
#[auto_impl(&, Arc)]
pub trait PendingPool: Send + Sync {
    /// Returns executable transactions grouped by sender, each ordered by nonce.
    ///
    /// With `enforce_tips` set, transactions below the pool's minimum tip are left out.
    fn pending(&self, enforce_tips: bool) -> PendingTransactions;
}
