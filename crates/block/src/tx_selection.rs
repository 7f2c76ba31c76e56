//! Price and nonce ordered supply of pending transactions.
//!
//! Across senders transactions come out by decreasing effective tip; within one sender by
//! increasing nonce. Only the head transaction of each sender competes for the next slot.
use std::{
    cmp::Ordering,
    collections::{BinaryHeap, HashMap, VecDeque},
};

use alethia_l2_primitives::{PendingTransactions, RecoveredTx};
use alloy_consensus::Transaction;
use alloy_primitives::Address;
use tracing::trace;

/// Head transaction of one sender.
#[derive(Debug)]
struct SenderHead {
    /// The transaction.
    tx: RecoveredTx,
    /// Effective tip at the supply's base fee.
    tip: u128,
    /// Sender order of insertion, breaks price ties.
    seq: u64,
}

impl PartialEq for SenderHead {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SenderHead {}

impl PartialOrd for SenderHead {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SenderHead {
    fn cmp(&self, other: &Self) -> Ordering {
        self.tip.cmp(&other.tip).then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Pending transactions ordered by price across senders and by nonce within a sender.
#[derive(Debug, Default)]
pub struct TransactionsByPriceAndNonce {
    /// Remaining transactions of each sender, behind its head.
    txs: HashMap<Address, VecDeque<RecoveredTx>>,
    /// Current head of every sender.
    heads: BinaryHeap<SenderHead>,
    /// Base fee used to compute effective tips.
    base_fee: u64,
}

impl TransactionsByPriceAndNonce {
    /// Builds the supply from a pending set.
    ///
    /// Senders whose head transaction cannot pay `base_fee` are left out.
    pub fn new(pending: PendingTransactions, base_fee: Option<u64>) -> Self {
        let base_fee = base_fee.unwrap_or_default();
        let mut supply = Self { base_fee, ..Default::default() };

        for (seq, (sender, queue)) in pending.into_iter().enumerate() {
            let mut queue = VecDeque::from(queue);
            let Some(head) = queue.pop_front() else { continue };
            let Some(tip) = head.effective_tip_per_gas(base_fee) else {
                trace!(target: "tx_selection", %sender, "Dropping sender below base fee");
                continue;
            };
            supply.heads.push(SenderHead { tx: head, tip, seq: seq as u64 });
            supply.txs.insert(sender, queue);
        }
        supply
    }

    /// Returns the next transaction without consuming it.
    pub fn peek(&self) -> Option<&RecoveredTx> {
        self.heads.peek().map(|head| &head.tx)
    }

    /// Replaces the current head with the next transaction of the same sender.
    pub fn shift(&mut self) {
        let Some(head) = self.heads.pop() else { return };
        let sender = head.tx.signer();
        let next = self.txs.get_mut(&sender).and_then(VecDeque::pop_front);
        match next.and_then(|tx| tx.effective_tip_per_gas(self.base_fee).map(|tip| (tx, tip))) {
            Some((tx, tip)) => self.heads.push(SenderHead { tx, tip, seq: head.seq }),
            None => {
                self.txs.remove(&sender);
            }
        }
    }

    /// Drops the current head together with all later transactions of its sender.
    pub fn pop(&mut self) {
        if let Some(head) = self.heads.pop() {
            self.txs.remove(&head.tx.signer());
        }
    }

    /// Whether the supply is exhausted.
    pub fn is_empty(&self) -> bool {
        self.heads.is_empty()
    }
}

/// Moves the queues of `locals` out of `pending`, returning `(locals, remotes)`.
pub fn split_locals(
    mut pending: PendingTransactions,
    locals: &[Address],
) -> (PendingTransactions, PendingTransactions) {
    let mut local_txs = PendingTransactions::new();
    for local in locals {
        if let Some(txs) = pending.remove(local).filter(|txs| !txs.is_empty()) {
            local_txs.insert(*local, txs);
        }
    }
    (local_txs, pending)
}
