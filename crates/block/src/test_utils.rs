//! In-memory state and pool collaborators.
use std::{
    collections::{BTreeMap, HashMap, HashSet},
    sync::Arc,
};

use alethia_l2_consensus::ProviderError;
use alethia_l2_primitives::{PendingTransactions, RecoveredTx};
use alloy_consensus::{Header, Transaction};
use alloy_primitives::{Address, B256, Log, U256, keccak256};
use parking_lot::{Mutex, RwLock};

use crate::{
    error::TxExecutionError,
    state::{ExecutionState, PendingPool, StateProviderFactory, TxAccessContext, TxOutcome},
};

/// Gas charged for a transaction without calldata.
const BASE_GAS: u64 = 21_000;
/// Gas charged per calldata byte.
const CALLDATA_BYTE_GAS: u64 = 16;

/// One executed transaction as seen by [`MockState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionRecord {
    /// Transaction hash.
    pub hash: B256,
    /// Index set through [`ExecutionState::set_tx_context`].
    pub index: usize,
    /// Whether the transaction ran as the anchor.
    pub is_anchor: bool,
    /// Sender passed to the last [`ExecutionState::prepare`], if any.
    pub prepared_sender: Option<Address>,
}

/// Factory of [`MockState`]s sharing one account configuration.
#[derive(Debug, Clone, Default)]
pub struct MockStateFactory {
    nonces: HashMap<Address, u64>,
    balances: HashMap<Address, U256>,
    failures: HashSet<B256>,
    missing: HashSet<B256>,
    records: Arc<Mutex<Vec<ExecutionRecord>>>,
}

impl MockStateFactory {
    /// Sets the account nonce of `address`.
    pub fn with_nonce(mut self, address: Address, nonce: u64) -> Self {
        self.nonces.insert(address, nonce);
        self
    }

    /// Limits the balance of `address`. Accounts without a balance are never short of funds.
    pub fn with_balance(mut self, address: Address, balance: U256) -> Self {
        self.balances.insert(address, balance);
        self
    }

    /// Makes the transaction with `hash` fail execution.
    pub fn with_failure(mut self, hash: B256) -> Self {
        self.failures.insert(hash);
        self
    }

    /// Makes the state of block `hash` unavailable.
    pub fn with_missing_state(mut self, hash: B256) -> Self {
        self.missing.insert(hash);
        self
    }

    /// Transactions executed by every state opened so far.
    pub fn records(&self) -> Vec<ExecutionRecord> {
        self.records.lock().clone()
    }
}

impl StateProviderFactory for MockStateFactory {
    type State = MockState;

    fn state_by_block_hash(&self, hash: B256) -> Result<Self::State, ProviderError> {
        if self.missing.contains(&hash) {
            return Err(ProviderError::StateUnavailable(hash));
        }
        Ok(MockState {
            nonces: self.nonces.clone(),
            balances: self.balances.clone(),
            failures: self.failures.clone(),
            records: Arc::clone(&self.records),
            index: 0,
            prepared_sender: None,
        })
    }
}

/// Nonce and balance tracking state; every successful transaction only bumps the sender nonce.
#[derive(Debug)]
pub struct MockState {
    nonces: HashMap<Address, u64>,
    balances: HashMap<Address, U256>,
    failures: HashSet<B256>,
    records: Arc<Mutex<Vec<ExecutionRecord>>>,
    index: usize,
    prepared_sender: Option<Address>,
}

impl ExecutionState for MockState {
    fn prepare(&mut self, ctx: &TxAccessContext<'_>) {
        self.prepared_sender = Some(ctx.sender);
    }

    fn set_tx_context(&mut self, _tx_hash: B256, index: usize) {
        self.index = index;
    }

    fn execute_transaction(
        &mut self,
        _header: &Header,
        tx: &RecoveredTx,
        is_anchor: bool,
    ) -> Result<TxOutcome, TxExecutionError> {
        let hash = *tx.tx_hash();
        let sender = tx.signer();
        if self.failures.contains(&hash) {
            return Err(TxExecutionError::Execution("execution reverted".to_string()));
        }

        let state = self.nonces.get(&sender).copied().unwrap_or_default();
        if tx.nonce() < state {
            return Err(TxExecutionError::NonceTooLow { address: sender, tx: tx.nonce(), state });
        }
        if tx.nonce() > state {
            return Err(TxExecutionError::NonceTooHigh { address: sender, tx: tx.nonce(), state });
        }

        let gas_used = BASE_GAS + CALLDATA_BYTE_GAS * tx.input().len() as u64;
        if tx.gas_limit() < gas_used {
            return Err(TxExecutionError::Execution("intrinsic gas too low".to_string()));
        }

        if let Some(balance) = self.balances.get_mut(&sender) {
            let cost = U256::from(tx.gas_limit()) * U256::from(tx.max_fee_per_gas()) + tx.value();
            if *balance < cost {
                return Err(TxExecutionError::Execution(
                    "insufficient funds for gas * price + value".to_string(),
                ));
            }
            *balance -= cost;
        }

        self.nonces.insert(sender, state + 1);
        self.records.lock().push(ExecutionRecord {
            hash,
            index: self.index,
            is_anchor,
            prepared_sender: self.prepared_sender.take(),
        });

        let logs = match tx.to() {
            Some(to) if !tx.input().is_empty() => {
                vec![Log::new_unchecked(to, vec![], tx.input().clone())]
            }
            _ => vec![],
        };
        Ok(TxOutcome { gas_used, success: true, logs })
    }

    fn intermediate_root(&mut self) -> B256 {
        let nonces: BTreeMap<_, _> = self.nonces.iter().collect();
        let mut preimage = Vec::with_capacity(nonces.len() * 28);
        for (address, nonce) in nonces {
            preimage.extend_from_slice(address.as_slice());
            preimage.extend_from_slice(&nonce.to_be_bytes());
        }
        keccak256(preimage)
    }
}

/// Transaction pool holding pending transactions in memory.
#[derive(Debug, Default)]
pub struct MockPool {
    pending: RwLock<PendingTransactions>,
}

impl MockPool {
    /// Creates a pool from a list of transactions.
    pub fn new(txs: impl IntoIterator<Item = RecoveredTx>) -> Self {
        let pool = Self::default();
        for tx in txs {
            pool.add(tx);
        }
        pool
    }

    /// Adds a transaction, keeping its sender queue sorted by nonce.
    pub fn add(&self, tx: RecoveredTx) {
        let mut pending = self.pending.write();
        let queue = pending.entry(tx.signer()).or_default();
        queue.push(tx);
        queue.sort_by_key(|tx| tx.nonce());
    }
}

impl PendingPool for MockPool {
    fn pending(&self, _enforce_tips: bool) -> PendingTransactions {
        self.pending.read().clone()
    }
}
