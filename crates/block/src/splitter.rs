//! Allocation-pass partitioning of the pending pool into proposal-ready lists.
//!
//! Unlike [`crate::builder`], nothing is executed: every sender queue is filtered on its own,
//! then the surviving transactions are cut into consecutive lists under the list ceilings.
use std::str::FromStr;

use alethia_l2_primitives::{PendingTransactions, RecoveredTx, TransactionList, encoded_tx_len};
use alloy_consensus::Transaction;
use alloy_primitives::Address;
use tracing::trace;

use crate::error::SplitError;

/// Splits pool content into transaction lists without executing it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolContentSplitter {
    /// Maximum number of transactions in one list.
    pub max_transactions_per_block: u64,
    /// Gas available to one list, counted by transaction gas limits.
    pub block_max_gas_limit: u64,
    /// Encoded size a list must stay below.
    pub max_bytes_per_tx_list: u64,
    /// Transactions with a lower gas limit are not proposed.
    pub min_tx_gas_limit: u64,
    /// Senders packed before everyone else.
    pub locals: Vec<Address>,
}

impl PoolContentSplitter {
    /// Sets the local senders from a comma separated list of hex addresses.
    ///
    /// A blank string means no locals; any malformed entry rejects the whole list.
    pub fn with_locals(mut self, locals: &str) -> Result<Self, SplitError> {
        self.locals = if locals.trim().is_empty() {
            Vec::new()
        } else {
            locals
                .split(',')
                .map(|account| {
                    let account = account.trim();
                    Address::from_str(account)
                        .map_err(|_| SplitError::InvalidAccount(account.to_string()))
                })
                .collect::<Result<_, _>>()?
        };
        Ok(self)
    }

    /// Returns why `tx` ends its sender's queue, if it does.
    fn truncation_reason(&self, tx: &RecoveredTx) -> Option<&'static str> {
        if tx.max_fee_per_gas() == 0 {
            return Some("zero fee cap");
        }
        if tx.gas_limit() < self.min_tx_gas_limit {
            return Some("gas limit below minimum");
        }
        if tx.gas_limit() > self.block_max_gas_limit {
            return Some(if tx.input().is_empty() {
                "high gas transfer"
            } else {
                "gas limit above list ceiling"
            });
        }
        if encoded_tx_len(tx) >= self.max_bytes_per_tx_list {
            return Some("too large for a list");
        }
        None
    }

    /// Truncates every sender queue at its first unusable transaction and orders the rest:
    /// locals first, then remotes, senders by address, each queue by nonce.
    fn filter(&self, pending: PendingTransactions) -> Vec<RecoveredTx> {
        let (mut locals, mut remotes) = (Vec::new(), Vec::new());
        for (sender, queue) in pending {
            let target = if self.locals.contains(&sender) { &mut locals } else { &mut remotes };
            for tx in queue {
                if let Some(reason) = self.truncation_reason(&tx) {
                    trace!(target: "tx_selection", %sender, hash = %tx.tx_hash(), reason, "Truncating sender queue");
                    break;
                }
                target.push(tx);
            }
        }
        locals.append(&mut remotes);
        locals
    }

    /// Partitions the pending set into disjoint lists honoring the count, gas and byte ceilings.
    pub fn split(&self, pending: PendingTransactions) -> Vec<TransactionList> {
        let mut lists = Vec::new();
        if self.max_transactions_per_block == 0 {
            return lists;
        }
        let mut current = TransactionList::default();

        for tx in self.filter(pending) {
            let gas = tx.gas_limit();
            let size = encoded_tx_len(&tx);
            let full = current.len() as u64 >= self.max_transactions_per_block ||
                current.estimated_gas_used + gas > self.block_max_gas_limit ||
                current.bytes_length + size >= self.max_bytes_per_tx_list;
            if full && !current.is_empty() {
                lists.push(std::mem::take(&mut current));
            }
            current.push(tx, gas, size);
        }
        if !current.is_empty() {
            lists.push(current);
        }
        lists
    }
}
