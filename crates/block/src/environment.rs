//! Scratch environment for building one block or one transaction list.
use alethia_l2_chainspec::spec::Rules;
use alethia_l2_primitives::RecoveredTx;
use alloy_consensus::{
    Eip658Value, Header, Receipt, ReceiptEnvelope, ReceiptWithBloom, Transaction, TxType,
};
use alloy_eips::{Typed2718, eip4895::Withdrawals};
use alloy_primitives::logs_bloom;

use crate::{
    error::TxExecutionError,
    state::{ExecutionState, TxOutcome},
};

/// Remaining gas budget of the block under construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GasPool(u64);

impl GasPool {
    /// Creates a pool holding `gas`.
    pub const fn new(gas: u64) -> Self {
        Self(gas)
    }

    /// Gas left in the pool.
    pub const fn gas(&self) -> u64 {
        self.0
    }

    /// Returns gas to the pool.
    pub fn add_gas(&mut self, amount: u64) {
        self.0 = self.0.saturating_add(amount);
    }

    /// Takes gas from the pool, failing when it cannot cover `amount`.
    pub fn sub_gas(&mut self, amount: u64) -> Result<(), TxExecutionError> {
        if self.0 < amount {
            return Err(TxExecutionError::GasLimitReached { available: self.0, required: amount });
        }
        self.0 -= amount;
        Ok(())
    }
}

/// Working state of a single build attempt.
///
/// Owned by exactly one builder and discarded afterwards.
#[derive(Debug)]
pub struct ExecutionEnvironment<S> {
    /// Header being built.
    pub header: Header,
    /// Remaining block gas.
    pub gas_pool: GasPool,
    /// Block state.
    pub state: S,
    /// Rules in force for the header.
    pub rules: Rules,
    /// Committed transactions.
    pub txs: Vec<RecoveredTx>,
    /// Receipts of the committed transactions.
    pub receipts: Vec<ReceiptEnvelope>,
    /// Count of committed transactions, maintained by the caller.
    pub tcount: usize,
    /// Withdrawals included in the block.
    pub withdrawals: Option<Withdrawals>,
}

impl<S: ExecutionState> ExecutionEnvironment<S> {
    /// Creates an environment whose gas pool holds the header gas limit.
    pub fn new(header: Header, state: S, rules: Rules, withdrawals: Option<Withdrawals>) -> Self {
        Self {
            gas_pool: GasPool::new(header.gas_limit),
            header,
            state,
            rules,
            txs: Vec::new(),
            receipts: Vec::new(),
            tcount: 0,
            withdrawals,
        }
    }

    /// Sets the header gas limit and refills the gas pool with it.
    pub fn reset_gas_limit(&mut self, gas_limit: u64) {
        self.header.gas_limit = gas_limit;
        self.gas_pool = GasPool::new(gas_limit);
    }

    /// Executes `tx` and appends it with its receipt, returning the gas it used.
    ///
    /// On error nothing is recorded and the reserved gas is returned to the pool.
    pub fn commit_transaction(
        &mut self,
        tx: &RecoveredTx,
        is_anchor: bool,
    ) -> Result<u64, TxExecutionError> {
        if !self.rules.is_tx_type_supported(tx.ty()) {
            return Err(TxExecutionError::TxTypeNotSupported(tx.ty()));
        }

        let gas_limit = tx.gas_limit();
        self.gas_pool.sub_gas(gas_limit)?;

        let TxOutcome { gas_used, success, logs } =
            match self.state.execute_transaction(&self.header, tx, is_anchor) {
                Ok(outcome) => outcome,
                Err(err) => {
                    self.gas_pool.add_gas(gas_limit);
                    return Err(err);
                }
            };

        self.gas_pool.add_gas(gas_limit.saturating_sub(gas_used));
        self.header.gas_used += gas_used;

        let logs_bloom = logs_bloom(logs.iter());
        let receipt = ReceiptWithBloom {
            receipt: Receipt {
                status: Eip658Value::Eip658(success),
                cumulative_gas_used: self.header.gas_used,
                logs,
            },
            logs_bloom,
        };
        self.receipts.push(match tx.tx_type() {
            TxType::Legacy => ReceiptEnvelope::Legacy(receipt),
            TxType::Eip2930 => ReceiptEnvelope::Eip2930(receipt),
            TxType::Eip1559 => ReceiptEnvelope::Eip1559(receipt),
            TxType::Eip4844 => ReceiptEnvelope::Eip4844(receipt),
            TxType::Eip7702 => ReceiptEnvelope::Eip7702(receipt),
        });
        self.txs.push(tx.clone());

        Ok(gas_used)
    }
}
