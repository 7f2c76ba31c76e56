//! Greedy packing of pending transactions into one bounded transaction list.
use alethia_l2_chainspec::MIN_TRANSACTION_GAS;
use alethia_l2_primitives::{TransactionList, encoded_tx_len};
use alloy_consensus::Transaction;
use tracing::{debug, trace};

use crate::{
    environment::ExecutionEnvironment, error::TxExecutionError, state::ExecutionState,
    tx_selection::TransactionsByPriceAndNonce,
};

/// Ceilings applied to every transaction list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxListLimits {
    /// Maximum number of transactions in one list.
    pub max_transactions_per_list: u64,
    /// Gas available to one list.
    pub block_max_gas_limit: u64,
    /// Encoded size a list must stay below.
    pub max_bytes_per_tx_list: u64,
}

/// Commits transactions from `locals`, then `remotes`, into `env` until a ceiling is hit.
///
/// Returns the packed list and whether both supplies were drained. Faulty transactions are
/// skipped and never abort the list.
pub fn commit_l2_transactions<S: ExecutionState>(
    env: &mut ExecutionEnvironment<S>,
    locals: &mut TransactionsByPriceAndNonce,
    remotes: &mut TransactionsByPriceAndNonce,
    max_transactions_per_list: u64,
    max_bytes_per_tx_list: u64,
) -> (TransactionList, bool) {
    let mut list = TransactionList::default();
    if max_transactions_per_list == 0 {
        return (list, false);
    }
    let mut is_local = true;

    loop {
        if env.gas_pool.gas() < MIN_TRANSACTION_GAS {
            trace!(target: "tx_selection", have = env.gas_pool.gas(), want = MIN_TRANSACTION_GAS, "Not enough gas for further transactions");
            return (list, false);
        }

        let txs = if is_local { &mut *locals } else { &mut *remotes };
        let Some(tx) = txs.peek().cloned() else {
            if is_local {
                is_local = false;
                continue;
            }
            return (list, true);
        };
        let sender = tx.signer();
        let hash = *tx.tx_hash();

        let size = encoded_tx_len(&tx);
        if list.bytes_length + size >= max_bytes_per_tx_list {
            trace!(target: "tx_selection", bytes = list.bytes_length, size, "Transaction list byte limit reached");
            return (list, false);
        }

        if tx.chain_id().is_some() && !env.rules.is_eip155 {
            trace!(target: "tx_selection", %hash, "Ignoring replay protected transaction");
            txs.pop();
            continue;
        }

        env.state.set_tx_context(hash, env.tcount);
        match env.commit_transaction(&tx, false) {
            Ok(gas_used) => {
                env.tcount += 1;
                list.push(tx, gas_used, size);
                // Shift before stopping: the next list starts from the parent state again.
                txs.shift();
                if env.tcount as u64 >= max_transactions_per_list {
                    return (list, false);
                }
            }
            Err(TxExecutionError::GasLimitReached { .. }) => {
                trace!(target: "tx_selection", %sender, "Gas limit exceeded for current block");
                txs.pop();
            }
            Err(TxExecutionError::NonceTooLow { tx: nonce, .. }) => {
                trace!(target: "tx_selection", %sender, nonce, "Skipping transaction with low nonce");
                txs.shift();
            }
            Err(TxExecutionError::NonceTooHigh { tx: nonce, .. }) => {
                trace!(target: "tx_selection", %sender, nonce, "Skipping account with high nonce");
                txs.pop();
            }
            Err(TxExecutionError::TxTypeNotSupported(ty)) => {
                trace!(target: "tx_selection", %sender, ty, "Skipping unsupported transaction type");
                txs.pop();
            }
            Err(err) => {
                debug!(target: "tx_selection", %hash, %err, "Transaction failed, account skipped");
                txs.shift();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        state::StateProviderFactory,
        test_utils::{MockState, MockStateFactory},
    };
    use alethia_l2_chainspec::{TAIKO_DEVNET, spec::Rules};
    use alethia_l2_primitives::{
        PendingTransactions, RecoveredTx,
        test_utils::{TestAccounts, legacy, transfer},
    };
    use alloy_consensus::Header;
    use alloy_primitives::{B256, U256};

    const GAS: u64 = 1_000_000;

    fn env_with(factory: &MockStateFactory, rules: Rules) -> ExecutionEnvironment<MockState> {
        let header = Header { number: 1, gas_limit: GAS, ..Default::default() };
        ExecutionEnvironment::new(header, factory.state_by_block_hash(B256::ZERO).unwrap(), rules, None)
    }

    fn supply(txs: Vec<RecoveredTx>) -> TransactionsByPriceAndNonce {
        let mut pending = PendingTransactions::new();
        for tx in txs {
            pending.entry(tx.signer()).or_default().push(tx);
        }
        TransactionsByPriceAndNonce::new(pending, Some(1))
    }

    #[test]
    fn test_locals_before_remotes_and_drained() {
        let accounts = TestAccounts::new(2);
        let factory = MockStateFactory::default();
        let mut env = env_with(&factory, TAIKO_DEVNET.rules(1, 1));

        let mut locals = supply(vec![transfer(&accounts[0], 0, 2, 21_000)]);
        let mut remotes = supply(vec![transfer(&accounts[1], 0, 100, 21_000)]);

        let (list, drained) = commit_l2_transactions(&mut env, &mut locals, &mut remotes, 10, 10_000);
        assert!(drained);
        assert_eq!(list.len(), 2);
        assert_eq!(list.txs[0].signer(), accounts.address(0));
        assert_eq!(list.estimated_gas_used, 42_000);
        assert_eq!(env.tcount, 2);
    }

    #[test]
    fn test_count_limit() {
        let accounts = TestAccounts::new(1);
        let factory = MockStateFactory::default();
        let mut env = env_with(&factory, TAIKO_DEVNET.rules(1, 1));
        let mut remotes =
            supply((0..5).map(|nonce| transfer(&accounts[0], nonce, 2, 21_000)).collect());

        let (list, drained) =
            commit_l2_transactions(&mut env, &mut supply(vec![]), &mut remotes, 3, 10_000);
        assert!(!drained);
        assert_eq!(list.len(), 3);
        // The last committed transaction is not offered to the next list.
        assert_eq!(remotes.peek().map(|tx| tx.nonce()), Some(3));
    }

    #[test]
    fn test_zero_count_limit_commits_nothing() {
        let accounts = TestAccounts::new(1);
        let factory = MockStateFactory::default();
        let mut env = env_with(&factory, TAIKO_DEVNET.rules(1, 1));
        let mut remotes =
            supply((0..3).map(|nonce| transfer(&accounts[0], nonce, 2, 21_000)).collect());

        let (list, drained) =
            commit_l2_transactions(&mut env, &mut supply(vec![]), &mut remotes, 0, 10_000);
        assert!(!drained);
        assert!(list.is_empty());
        assert_eq!(env.tcount, 0);
        assert_eq!(remotes.peek().map(|tx| tx.nonce()), Some(0));
    }

    #[test]
    fn test_insufficient_balance_skips_sender() {
        let accounts = TestAccounts::new(2);
        // Covers exactly one 21k transfer at fee 10 plus its value.
        let factory =
            MockStateFactory::default().with_balance(accounts.address(0), U256::from(210_001));
        let mut env = env_with(&factory, TAIKO_DEVNET.rules(1, 1));

        let mut remotes = supply(vec![
            transfer(&accounts[0], 0, 10, 21_000),
            transfer(&accounts[0], 1, 10, 21_000),
            transfer(&accounts[0], 2, 10, 21_000),
            transfer(&accounts[1], 0, 5, 21_000),
        ]);

        let (list, drained) =
            commit_l2_transactions(&mut env, &mut supply(vec![]), &mut remotes, 10, 10_000);
        assert!(drained);
        let included: Vec<_> = list.txs.iter().map(|tx| (tx.signer(), tx.nonce())).collect();
        assert_eq!(included, vec![(accounts.address(0), 0), (accounts.address(1), 0)]);
        assert_eq!(env.gas_pool.gas(), GAS - 42_000);
    }

    #[test]
    fn test_byte_limit_is_exclusive() {
        let accounts = TestAccounts::new(1);
        let txs: Vec<_> = (0..3).map(|nonce| transfer(&accounts[0], nonce, 2, 21_000)).collect();
        let size = encoded_tx_len(&txs[0]);
        let factory = MockStateFactory::default();
        let mut env = env_with(&factory, TAIKO_DEVNET.rules(1, 1));

        // Two transactions would reach the ceiling exactly.
        let (list, drained) =
            commit_l2_transactions(&mut env, &mut supply(vec![]), &mut supply(txs), 10, size * 2);
        assert!(!drained);
        assert_eq!(list.len(), 1);
        assert!(list.bytes_length < size * 2);
    }

    #[test]
    fn test_gas_exhaustion_stops_list() {
        let accounts = TestAccounts::new(1);
        let factory = MockStateFactory::default();
        let mut env = env_with(&factory, TAIKO_DEVNET.rules(1, 1));
        env.reset_gas_limit(50_000);

        let mut remotes =
            supply((0..3).map(|nonce| transfer(&accounts[0], nonce, 2, 21_000)).collect());
        let (list, drained) =
            commit_l2_transactions(&mut env, &mut supply(vec![]), &mut remotes, 10, 10_000);
        assert!(!drained);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_nonce_faults() {
        let accounts = TestAccounts::new(3);
        let factory = MockStateFactory::default()
            .with_nonce(accounts.address(0), 1)
            .with_nonce(accounts.address(1), 0);
        let mut env = env_with(&factory, TAIKO_DEVNET.rules(1, 1));

        let mut remotes = supply(vec![
            // Stale nonce is shifted past, the next one is included.
            transfer(&accounts[0], 0, 50, 21_000),
            transfer(&accounts[0], 1, 50, 21_000),
            // Gap: the whole sender is dropped.
            transfer(&accounts[1], 2, 40, 21_000),
            transfer(&accounts[1], 3, 40, 21_000),
            transfer(&accounts[2], 0, 30, 21_000),
        ]);

        let (list, drained) =
            commit_l2_transactions(&mut env, &mut supply(vec![]), &mut remotes, 10, 10_000);
        assert!(drained);
        let included: Vec<_> = list.txs.iter().map(|tx| (tx.signer(), tx.nonce())).collect();
        assert_eq!(included, vec![(accounts.address(0), 1), (accounts.address(2), 0)]);
    }

    #[test]
    fn test_nonce_too_high_sender_returns_after_refeed() {
        let accounts = TestAccounts::new(1);
        let factory = MockStateFactory::default().with_nonce(accounts.address(0), 0);
        let gapped = vec![transfer(&accounts[0], 1, 10, 21_000)];

        let mut env = env_with(&factory, TAIKO_DEVNET.rules(1, 1));
        let (list, _) =
            commit_l2_transactions(&mut env, &mut supply(vec![]), &mut supply(gapped.clone()), 10, 10_000);
        assert!(list.is_empty());

        // The pool fills the gap and the sender is offered again.
        let mut refed = gapped;
        refed.insert(0, transfer(&accounts[0], 0, 10, 21_000));
        let mut env = env_with(&factory, TAIKO_DEVNET.rules(1, 1));
        let (list, drained) =
            commit_l2_transactions(&mut env, &mut supply(vec![]), &mut supply(refed), 10, 10_000);
        assert!(drained);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_replay_protected_before_eip155() {
        let accounts = TestAccounts::new(2);
        let rules = Rules { is_eip155: false, ..TAIKO_DEVNET.rules(1, 1) };
        let factory = MockStateFactory::default();
        let mut env = env_with(&factory, rules);

        let mut remotes = supply(vec![
            legacy(&accounts[0], 0, 50, 21_000, Some(167_001)),
            legacy(&accounts[0], 1, 50, 21_000, None),
            legacy(&accounts[1], 0, 10, 21_000, None),
        ]);

        let (list, drained) =
            commit_l2_transactions(&mut env, &mut supply(vec![]), &mut remotes, 10, 10_000);
        assert!(drained);
        assert_eq!(list.len(), 1);
        assert_eq!(list.txs[0].signer(), accounts.address(1));
    }

    #[test]
    fn test_strange_error_shifts_past_transaction() {
        let accounts = TestAccounts::new(2);
        let failing = transfer(&accounts[0], 0, 50, 21_000);
        let factory = MockStateFactory::default().with_failure(*failing.tx_hash());
        let mut env = env_with(&factory, TAIKO_DEVNET.rules(1, 1));

        let mut remotes = supply(vec![
            failing,
            // The successor then hits a nonce gap and drops the sender.
            transfer(&accounts[0], 1, 50, 21_000),
            transfer(&accounts[1], 0, 10, 21_000),
        ]);

        let (list, drained) =
            commit_l2_transactions(&mut env, &mut supply(vec![]), &mut remotes, 10, 10_000);
        assert!(drained);
        assert_eq!(list.len(), 1);
        assert_eq!(list.txs[0].signer(), accounts.address(1));
        assert_eq!(env.gas_pool.gas(), GAS - 21_000);
    }
}
