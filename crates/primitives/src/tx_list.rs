use alloy_consensus::TxEnvelope;
use serde::{Deserialize, Serialize};

use crate::RecoveredTx;

/// An ordered batch of transactions proposed for one block, with its running totals.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionList {
    /// Transactions in inclusion order.
    pub txs: Vec<RecoveredTx>,
    /// Gas consumed by the transactions when they were packed.
    pub estimated_gas_used: u64,
    /// Sum of the encoded transaction sizes.
    pub bytes_length: u64,
}

impl TransactionList {
    /// Appends a transaction and accounts its gas and size.
    pub fn push(&mut self, tx: RecoveredTx, gas_used: u64, size: u64) {
        self.txs.push(tx);
        self.estimated_gas_used += gas_used;
        self.bytes_length += size;
    }

    /// Number of transactions in the list.
    pub fn len(&self) -> usize {
        self.txs.len()
    }

    /// Whether the list holds no transactions.
    pub fn is_empty(&self) -> bool {
        self.txs.is_empty()
    }

    /// Converts the list into its RPC form, dropping recovered senders.
    pub fn into_prebuilt(self) -> PreBuiltTxList {
        PreBuiltTxList {
            tx_list: self.txs.into_iter().map(|tx| tx.into_inner()).collect(),
            estimated_gas_used: self.estimated_gas_used,
            bytes_length: self.bytes_length,
        }
    }
}

/// A pre-built transaction list that contains the mempool content.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreBuiltTxList<T = TxEnvelope> {
    /// The transactions.
    pub tx_list: Vec<T>,
    /// Gas consumed by the transactions when they were packed.
    pub estimated_gas_used: u64,
    /// Sum of the encoded transaction sizes.
    pub bytes_length: u64,
}

impl<T> Default for PreBuiltTxList<T> {
    fn default() -> Self {
        Self { tx_list: vec![], estimated_gas_used: 0, bytes_length: 0 }
    }
}
