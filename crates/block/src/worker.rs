//! Proposal-facing block worker: multi-list building and sealing of proposed blocks.
use std::sync::Arc;

use alethia_l2_chainspec::spec::TaikoChainSpec;
use alethia_l2_consensus::{
    ChainHeaderReader, ConsensusError, ProviderError, TaikoConsensus, unix_now,
};
use alethia_l2_primitives::{BlockMetadata, TransactionList, decode_tx_list};
use alloy_consensus::{
    Block, Header, ReceiptEnvelope, Transaction, TxEnvelope,
    transaction::{Recovered, SignerRecoverable},
};
use alloy_eips::eip4895::Withdrawals;
use alloy_hardforks::EthereumHardforks;
use alloy_primitives::{Address, B256};
use crossbeam_channel::{bounded, never};
use tracing::{debug, info};

use crate::{
    builder::{TxListLimits, commit_l2_transactions},
    environment::ExecutionEnvironment,
    error::{BlockSealError, TxExecutionError},
    state::{ExecutionState, PendingPool, StateProviderFactory, TxAccessContext},
    tx_selection::{TransactionsByPriceAndNonce, split_locals},
};

/// Parameters of a new execution environment.
#[derive(Debug, Clone, Default)]
pub struct GenerateParams {
    /// Block timestamp.
    pub timestamp: u64,
    /// Parent block hash.
    pub parent_hash: B256,
    /// Block beneficiary.
    pub coinbase: Address,
    /// Header `mixHash`.
    pub random: B256,
    /// Base fee, applied from London on.
    pub base_fee: Option<u64>,
    /// Withdrawals of the block.
    pub withdrawals: Option<Withdrawals>,
}

/// A proposed transaction that was left out of a sealed block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedTx {
    /// Transaction hash.
    pub hash: B256,
    /// Why it was skipped.
    pub error: TxExecutionError,
}

/// A sealed block with its receipts and the proposed transactions it skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealOutcome {
    /// The sealed block.
    pub block: Block<TxEnvelope>,
    /// Receipts of the included transactions.
    pub receipts: Vec<ReceiptEnvelope>,
    /// Proposed transactions that failed and were skipped.
    pub skipped: Vec<SkippedTx>,
}

/// Builds transaction lists from the pool and seals proposed blocks.
#[derive(Debug, Clone)]
pub struct TaikoWorker<Chain, Factory, Pool> {
    /// Consensus engine.
    consensus: TaikoConsensus,
    /// Chain store.
    chain: Chain,
    /// State store.
    state_factory: Factory,
    /// Transaction pool.
    pool: Pool,
}

impl<Chain, Factory, Pool> TaikoWorker<Chain, Factory, Pool>
where
    Chain: ChainHeaderReader,
    Factory: StateProviderFactory,
    Pool: PendingPool,
{
    /// Creates a new worker.
    pub fn new(consensus: TaikoConsensus, chain: Chain, state_factory: Factory, pool: Pool) -> Self {
        Self { consensus, chain, state_factory, pool }
    }

    /// The chain spec of the consensus engine.
    pub fn chain_spec(&self) -> &Arc<TaikoChainSpec> {
        self.consensus.chain_spec()
    }

    /// The chain store.
    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    /// The transaction pool.
    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    /// Opens a fresh execution environment on top of `params.parent_hash`.
    pub fn prepare_work(
        &self,
        params: &GenerateParams,
    ) -> Result<ExecutionEnvironment<Factory::State>, ConsensusError> {
        let parent = self
            .chain
            .header_by_hash(params.parent_hash)
            .ok_or(ConsensusError::UnknownAncestor(params.parent_hash))?;
        let number = parent.number + 1;

        let mut header = Header {
            parent_hash: params.parent_hash,
            number,
            gas_limit: parent.gas_limit,
            timestamp: params.timestamp,
            beneficiary: params.coinbase,
            mix_hash: params.random,
            base_fee_per_gas: params
                .base_fee
                .filter(|_| self.chain_spec().is_london_active_at_block(number)),
            ..Default::default()
        };
        self.consensus.prepare(&self.chain, &mut header)?;

        let state = self.state_factory.state_by_block_hash(params.parent_hash)?;
        let rules = self.chain_spec().rules(number, params.timestamp);
        Ok(ExecutionEnvironment::new(header, state, rules, params.withdrawals.clone()))
    }

    /// Packs the pending pool content into at most `max_transactions_lists` lists.
    ///
    /// Transactions of `locals` are offered first. Every list is built in a fresh environment
    /// on top of the current head with `block_max_gas_limit` gas; building stops early once a
    /// list drains the pending set.
    pub fn build_transactions_lists(
        &self,
        beneficiary: Address,
        base_fee: Option<u64>,
        limits: TxListLimits,
        locals: &[Address],
        max_transactions_lists: u64,
    ) -> Result<Vec<TransactionList>, ConsensusError> {
        let head = self.chain.current_header().ok_or(ProviderError::MissingHead)?;

        let pending = self.pool.pending(false);
        if pending.is_empty() {
            return Ok(Vec::new());
        }
        let (local_txs, remote_txs) = split_locals(pending, locals);
        let mut locals = TransactionsByPriceAndNonce::new(local_txs, base_fee);
        let mut remotes = TransactionsByPriceAndNonce::new(remote_txs, base_fee);

        let params = GenerateParams {
            timestamp: unix_now(),
            parent_hash: head.hash_slow(),
            coinbase: beneficiary,
            random: head.mix_hash,
            base_fee,
            withdrawals: None,
        };

        let mut lists = Vec::new();
        for _ in 0..max_transactions_lists {
            let mut env = self.prepare_work(&params)?;
            env.reset_gas_limit(limits.block_max_gas_limit);

            let (list, all_committed) = commit_l2_transactions(
                &mut env,
                &mut locals,
                &mut remotes,
                limits.max_transactions_per_list,
                limits.max_bytes_per_tx_list,
            );
            debug!(target: "tx_selection", txs = list.len(), gas = list.estimated_gas_used, bytes = list.bytes_length, "Built transactions list");
            lists.push(list);

            if all_committed {
                break;
            }
        }

        Ok(lists)
    }

    /// Seals a block from proposed metadata, using its timestamp and withdrawals.
    pub fn seal_block(
        &self,
        parent: B256,
        metadata: &BlockMetadata,
        base_fee: Option<u64>,
    ) -> Result<SealOutcome, BlockSealError> {
        let withdrawals = Withdrawals::new(metadata.withdrawals.clone());
        self.seal_block_with(parent, metadata.timestamp, metadata, base_fee, withdrawals)
    }

    /// Replays the proposed transaction list on top of `parent` and seals the resulting block.
    ///
    /// Transactions run in the proposed order, the first one as the anchor. A transaction that
    /// fails is skipped and reported in [`SealOutcome::skipped`].
    pub fn seal_block_with(
        &self,
        parent: B256,
        timestamp: u64,
        metadata: &BlockMetadata,
        base_fee: Option<u64>,
        withdrawals: Withdrawals,
    ) -> Result<SealOutcome, BlockSealError> {
        let txs = decode_tx_list(&metadata.tx_list)?;
        if txs.is_empty() {
            return Err(BlockSealError::EmptyTxList);
        }

        let params = GenerateParams {
            timestamp,
            parent_hash: parent,
            coinbase: metadata.beneficiary,
            random: metadata.mix_hash,
            base_fee,
            withdrawals: Some(withdrawals),
        };
        let mut env = self.prepare_work(&params)?;
        env.header.extra_data = metadata.extra_data.clone();
        env.reset_gas_limit(metadata.gas_limit);

        let precompiles = env.rules.active_precompiles();
        let mut skipped = Vec::new();

        for (i, tx) in txs.into_iter().enumerate() {
            let hash = *tx.tx_hash();
            let tx = match tx.recover_signer() {
                Ok(sender) => Recovered::new_unchecked(tx, sender),
                Err(err) => {
                    info!(target: "payload_builder", %hash, %err, "Skip an invalid proposed transaction");
                    skipped.push(SkippedTx { hash, error: TxExecutionError::SenderRecovery });
                    continue;
                }
            };

            let rules = env.rules;
            env.state.prepare(&TxAccessContext {
                rules: &rules,
                sender: tx.signer(),
                coinbase: metadata.beneficiary,
                to: tx.to(),
                precompiles: &precompiles,
                access_list: tx.access_list(),
            });
            env.state.set_tx_context(hash, env.tcount);

            if let Err(error) = env.commit_transaction(&tx, i == 0) {
                info!(target: "payload_builder", %hash, reason = %error, "Skip an invalid proposed transaction");
                skipped.push(SkippedTx { hash, error });
                continue;
            }
            env.tcount += 1;
        }

        let ExecutionEnvironment { header, mut state, txs, receipts, withdrawals, .. } = env;
        let block = self.consensus.finalize_and_assemble(
            header,
            state.intermediate_root(),
            txs.into_iter().map(|tx| tx.into_inner()).collect(),
            &receipts,
            withdrawals,
        );

        let seal_hash = self.consensus.seal_hash(&block.header);
        let (results_tx, results_rx) = bounded(1);
        self.consensus.seal(block, &results_tx, &never())?;
        let block =
            results_rx.try_recv().map_err(|_| BlockSealError::SealResultMissing(seal_hash))?;

        debug!(target: "payload_builder", number = block.header.number, txs = block.body.transactions.len(), skipped = skipped.len(), "Sealed proposed block");
        Ok(SealOutcome { block, receipts, skipped })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MockPool, MockStateFactory};
    use alethia_l2_chainspec::TAIKO_DEVNET;
    use alethia_l2_consensus::test_utils::MemoryChain;
    use alethia_l2_primitives::{
        encode_tx_list,
        test_utils::{TestAccounts, call, transfer},
        withdrawals_root,
    };
    use alloy_consensus::{Signed, TxLegacy};
    use alloy_eips::eip4895::Withdrawal;
    use alloy_primitives::{Bytes, Signature, TxKind, U256};

    type TestWorker = TaikoWorker<Arc<MemoryChain>, MockStateFactory, MockPool>;

    const LIMITS: TxListLimits = TxListLimits {
        max_transactions_per_list: 1,
        block_max_gas_limit: 1_000_000,
        max_bytes_per_tx_list: 100_000,
    };

    fn genesis() -> Header {
        Header { gas_limit: 30_000_000, ..Default::default() }
    }

    fn worker(factory: MockStateFactory, pool: MockPool) -> TestWorker {
        TaikoWorker::new(
            TaikoConsensus::new(TAIKO_DEVNET.clone()),
            Arc::new(MemoryChain::new(genesis())),
            factory,
            pool,
        )
    }

    fn metadata(txs: &[TxEnvelope]) -> BlockMetadata {
        BlockMetadata {
            beneficiary: Address::repeat_byte(0xbe),
            gas_limit: 5_000_000,
            timestamp: 100,
            mix_hash: B256::repeat_byte(0x11),
            tx_list: encode_tx_list(txs).into(),
            extra_data: Bytes::from_static(b"alethia"),
            withdrawals: vec![Withdrawal {
                index: 0,
                validator_index: 0,
                address: Address::repeat_byte(0x01),
                amount: 1,
            }],
        }
    }

    #[test]
    fn test_build_lists_without_pending() {
        let worker = worker(MockStateFactory::default(), MockPool::default());
        let lists = worker.build_transactions_lists(Address::ZERO, Some(1), LIMITS, &[], 3).unwrap();
        assert!(lists.is_empty());
    }

    #[test]
    fn test_build_lists_without_head() {
        let worker = TaikoWorker::new(
            TaikoConsensus::new(TAIKO_DEVNET.clone()),
            MemoryChain::default(),
            MockStateFactory::default(),
            MockPool::default(),
        );
        assert_eq!(
            worker.build_transactions_lists(Address::ZERO, Some(1), LIMITS, &[], 3),
            Err(ConsensusError::Provider(ProviderError::MissingHead))
        );
    }

    #[test]
    fn test_build_lists_until_drained() {
        let accounts = TestAccounts::new(3);
        let pool = MockPool::new([
            transfer(&accounts[0], 0, 30, 21_000),
            transfer(&accounts[1], 0, 20, 21_000),
            transfer(&accounts[2], 0, 10, 21_000),
        ]);
        let worker = worker(MockStateFactory::default(), pool);

        let lists = worker.build_transactions_lists(Address::ZERO, Some(1), LIMITS, &[], 10).unwrap();
        // Three count-limited lists, then one that observes the drained supply.
        assert_eq!(lists.len(), 4);
        assert!(lists[3].is_empty());
        let senders: Vec<_> = lists.iter().flat_map(|l| l.txs.iter().map(|tx| tx.signer())).collect();
        assert_eq!(senders, vec![accounts.address(0), accounts.address(1), accounts.address(2)]);
        for list in &lists {
            assert!(list.len() as u64 <= LIMITS.max_transactions_per_list);
            assert!(list.bytes_length < LIMITS.max_bytes_per_tx_list);
        }

        let capped = worker.build_transactions_lists(Address::ZERO, Some(1), LIMITS, &[], 2).unwrap();
        assert_eq!(capped.len(), 2);
    }

    #[test]
    fn test_build_lists_prefers_locals() {
        let accounts = TestAccounts::new(2);
        let pool = MockPool::new([
            transfer(&accounts[0], 0, 100, 21_000),
            transfer(&accounts[1], 0, 2, 21_000),
        ]);
        let worker = worker(MockStateFactory::default(), pool);
        let limits = TxListLimits { max_transactions_per_list: 10, ..LIMITS };

        let lists = worker
            .build_transactions_lists(Address::ZERO, Some(1), limits, &[accounts.address(1)], 1)
            .unwrap();
        assert_eq!(lists.len(), 1);
        assert_eq!(lists[0].txs[0].signer(), accounts.address(1));
        assert_eq!(lists[0].txs[1].signer(), accounts.address(0));
    }

    #[test]
    fn test_lists_start_from_parent_state() {
        let accounts = TestAccounts::new(1);
        let pool = MockPool::new([
            transfer(&accounts[0], 0, 10, 21_000),
            transfer(&accounts[0], 1, 10, 21_000),
        ]);
        let worker = worker(MockStateFactory::default(), pool);

        // The second list runs against the parent state again, so nonce 1 has a gap there.
        let lists = worker.build_transactions_lists(Address::ZERO, Some(1), LIMITS, &[], 5).unwrap();
        assert_eq!(lists.len(), 2);
        assert_eq!(lists[0].len(), 1);
        assert!(lists[1].is_empty());
    }

    #[test]
    fn test_seal_rejects_bad_tx_lists() {
        let worker = worker(MockStateFactory::default(), MockPool::default());
        let parent = genesis().hash_slow();

        assert_eq!(
            worker.seal_block(parent, &metadata(&[]), None),
            Err(BlockSealError::EmptyTxList)
        );

        let malformed = BlockMetadata { tx_list: Bytes::from_static(&[0xc2, 0x01]), ..metadata(&[]) };
        assert!(matches!(
            worker.seal_block(parent, &malformed, None),
            Err(BlockSealError::TxListDecode(_))
        ));

        let accounts = TestAccounts::new(1);
        let anchor = transfer(&accounts[0], 0, 10, 21_000).into_inner();
        assert_eq!(
            worker.seal_block(B256::repeat_byte(0x99), &metadata(&[anchor]), None),
            Err(BlockSealError::Consensus(ConsensusError::UnknownAncestor(B256::repeat_byte(0x99))))
        );
    }

    #[test]
    fn test_missing_parent_state() {
        let parent = genesis().hash_slow();
        let accounts = TestAccounts::new(1);
        let pool = MockPool::new([transfer(&accounts[0], 0, 10, 21_000)]);
        let worker = worker(MockStateFactory::default().with_missing_state(parent), pool);

        let anchor = transfer(&accounts[0], 0, 10, 21_000).into_inner();
        assert_eq!(
            worker.seal_block(parent, &metadata(&[anchor]), None),
            Err(BlockSealError::Provider(ProviderError::StateUnavailable(parent)))
        );
        assert_eq!(
            worker.build_transactions_lists(Address::ZERO, Some(1), LIMITS, &[], 1),
            Err(ConsensusError::Provider(ProviderError::StateUnavailable(parent)))
        );
    }

    #[test]
    fn test_seal_block_skips_failed_transactions() {
        let accounts = TestAccounts::new(2);
        let anchor = transfer(&accounts[0], 0, 10, 100_000);
        let failing = transfer(&accounts[1], 0, 10, 21_000);
        let payload = call(&accounts[1], 0, 10, 50_000, Bytes::from_static(&[1, 2, 3]));
        let unsigned = TxEnvelope::from(Signed::new_unchecked(
            TxLegacy { nonce: 7, gas_limit: 21_000, to: TxKind::Call(Address::ZERO), ..Default::default() },
            Signature::new(U256::ZERO, U256::ZERO, false),
            B256::ZERO,
        ));
        let txs: Vec<TxEnvelope> = vec![
            anchor.clone().into_inner(),
            failing.clone().into_inner(),
            unsigned,
            payload.clone().into_inner(),
        ];

        let factory = MockStateFactory::default().with_failure(*failing.tx_hash());
        let worker = worker(factory.clone(), MockPool::default());
        let metadata = metadata(&txs);

        let outcome = worker.seal_block(genesis().hash_slow(), &metadata, Some(0)).unwrap();
        let header = &outcome.block.header;
        assert_eq!(header.number, 1);
        assert_eq!(header.timestamp, metadata.timestamp);
        assert_eq!(header.gas_limit, metadata.gas_limit);
        assert_eq!(header.extra_data, metadata.extra_data);
        assert_eq!(header.mix_hash, metadata.mix_hash);
        assert_eq!(header.beneficiary, metadata.beneficiary);
        assert_eq!(header.gas_used, 21_000 + 21_000 + 3 * 16);
        assert_eq!(header.withdrawals_root, Some(withdrawals_root(&metadata.withdrawals)));
        assert!(header.difficulty.is_zero());

        assert_eq!(
            outcome.block.body.transactions,
            vec![anchor.into_inner(), payload.into_inner()]
        );
        assert_eq!(outcome.receipts.len(), 2);
        assert_eq!(outcome.skipped.len(), 2);
        assert!(matches!(outcome.skipped[0].error, TxExecutionError::Execution(_)));
        assert_eq!(outcome.skipped[1].error, TxExecutionError::SenderRecovery);

        let records = factory.records();
        assert_eq!(records.len(), 2);
        assert!(records[0].is_anchor);
        assert_eq!(records[0].prepared_sender, Some(accounts.address(0)));
        assert_eq!((records[1].index, records[1].is_anchor), (1, false));
    }

    #[test]
    fn test_seal_replay_is_deterministic() {
        let accounts = TestAccounts::new(1);
        let txs = vec![
            transfer(&accounts[0], 0, 10, 21_000).into_inner(),
            transfer(&accounts[0], 1, 10, 21_000).into_inner(),
        ];
        let worker = worker(MockStateFactory::default(), MockPool::default());
        let metadata = metadata(&txs);
        let parent = genesis().hash_slow();

        let first = worker.seal_block(parent, &metadata, None).unwrap();
        let second = worker.seal_block(parent, &metadata, None).unwrap();
        assert_eq!(first.block, second.block);

        let later = worker
            .seal_block_with(parent, 101, &metadata, None, Withdrawals::new(metadata.withdrawals.clone()))
            .unwrap();
        assert_eq!(later.block.header.timestamp, 101);
        assert_eq!(later.block.header.state_root, first.block.header.state_root);
        assert_ne!(later.block.header.hash_slow(), first.block.header.hash_slow());
    }
}
