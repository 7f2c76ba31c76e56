//! Taiko header validation, preparation, finalization and sealing.
use std::{
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

use alloy_consensus::{
    Block, BlockBody, EMPTY_OMMER_ROOT_HASH, Header, ReceiptEnvelope, TxEnvelope, TxReceipt,
    proofs::{calculate_receipt_root, calculate_transaction_root},
};
use alloy_eips::eip4895::Withdrawals;
use alloy_hardforks::EthereumHardforks;
use alloy_primitives::{Address, B256, Bloom, U256};
use crossbeam_channel::{Receiver, Sender, TryRecvError, select};
use tracing::{debug, trace, warn};

use crate::{
    error::ConsensusError,
    ordered::{OrderedResults, default_workers, run_ordered},
    provider::ChainHeaderReader,
};
use alethia_l2_chainspec::spec::TaikoChainSpec;
use alethia_l2_primitives::withdrawals_root;

/// Taiko consensus engine.
///
/// A stateless rule set: blocks are produced by the protocol, so there is no difficulty, no
/// uncles and no sealing puzzle. The engine only carries the immutable chain spec.
#[derive(Debug, Clone)]
pub struct TaikoConsensus {
    /// Chain spec used for limits and fork dependent rules.
    chain_spec: Arc<TaikoChainSpec>,
}

impl TaikoConsensus {
    /// Create a new instance of [`TaikoConsensus`]
    pub fn new(chain_spec: Arc<TaikoChainSpec>) -> Self {
        Self { chain_spec }
    }

    /// The chain spec the engine validates against.
    pub fn chain_spec(&self) -> &Arc<TaikoChainSpec> {
        &self.chain_spec
    }

    /// Returns the address that receives the block fees.
    pub fn author(&self, header: &Header) -> Address {
        header.beneficiary
    }

    /// Verifies a header against the chain, using the local clock.
    ///
    /// Headers already known to the chain are accepted without further checks.
    pub fn verify_header<C: ChainHeaderReader>(
        &self,
        chain: &C,
        header: &Header,
        _seal: bool,
    ) -> Result<(), ConsensusError> {
        if chain.header(header.hash_slow(), header.number).is_some() {
            return Ok(());
        }
        let parent = header
            .number
            .checked_sub(1)
            .and_then(|number| chain.header(header.parent_hash, number))
            .ok_or(ConsensusError::UnknownAncestor(header.parent_hash))?;

        self.validate_header_against_parent(header, &parent, unix_now())
    }

    /// Verifies a batch of headers concurrently.
    ///
    /// The parent of the first header is read from `chain`; every later header must extend the
    /// one before it. Results are delivered in input order; see [`OrderedResults`] for abort
    /// semantics. Seals are never checked, so `seals` is accepted for interface parity only.
    pub fn verify_headers<C>(
        &self,
        chain: C,
        headers: Vec<Header>,
        _seals: Vec<bool>,
    ) -> OrderedResults<Result<(), ConsensusError>>
    where
        C: ChainHeaderReader + 'static,
    {
        let now = unix_now();
        let engine = self.clone();
        let len = headers.len();
        let headers = Arc::new(headers);

        run_ordered(len, default_workers(len), move |index| {
            let result = engine.verify_header_at(&chain, &headers, index, now);
            if let Err(err) = &result {
                debug!(target: "consensus::taiko", index, %err, "Batch header verification failed");
            }
            result
        })
    }

    /// Resolves the parent of `headers[index]` and validates the header against it.
    fn verify_header_at<C: ChainHeaderReader>(
        &self,
        chain: &C,
        headers: &[Header],
        index: usize,
        now: u64,
    ) -> Result<(), ConsensusError> {
        let header = &headers[index];
        let parent = match index {
            0 => header.number.checked_sub(1).and_then(|n| chain.header(header.parent_hash, n)),
            _ => {
                let previous = &headers[index - 1];
                (previous.hash_slow() == header.parent_hash).then(|| previous.clone())
            }
        }
        .ok_or(ConsensusError::UnknownAncestor(header.parent_hash))?;

        self.validate_header_against_parent(header, &parent, now)
    }

    /// Checks a header against its parent and the wall clock `now` (unix seconds).
    ///
    /// Rules are applied in a fixed order and the first violation is returned.
    pub fn validate_header_against_parent(
        &self,
        header: &Header,
        parent: &Header,
        now: u64,
    ) -> Result<(), ConsensusError> {
        if header.timestamp > now {
            return Err(ConsensusError::FutureBlock { timestamp: header.timestamp, now });
        }

        if header.extra_data.len() > self.chain_spec.max_extra_data_size {
            return Err(ConsensusError::ExtraDataTooLong {
                len: header.extra_data.len(),
                max: self.chain_spec.max_extra_data_size,
            });
        }

        if header.timestamp < parent.timestamp {
            return Err(ConsensusError::OlderBlockTime {
                parent_timestamp: parent.timestamp,
                timestamp: header.timestamp,
            });
        }

        if parent.number.checked_add(1) != Some(header.number) {
            return Err(ConsensusError::InvalidNumber(header.number));
        }

        if !header.difficulty.is_zero() {
            return Err(ConsensusError::InvalidDifficulty(header.difficulty));
        }

        if header.gas_limit > self.chain_spec.max_gas_limit {
            return Err(ConsensusError::InvalidGasLimit {
                gas_limit: header.gas_limit,
                max: self.chain_spec.max_gas_limit,
            });
        }

        if header.gas_used > header.gas_limit {
            return Err(ConsensusError::InvalidGasUsed {
                gas_used: header.gas_used,
                gas_limit: header.gas_limit,
            });
        }

        if header.ommers_hash != EMPTY_OMMER_ROOT_HASH {
            return Err(ConsensusError::UnclesNotEmpty);
        }

        // Fee market is not enforced after London.
        if !self.chain_spec.is_london_active_at_block(header.number) {
            if let Some(base_fee) = header.base_fee_per_gas.filter(|fee| *fee != 0) {
                return Err(ConsensusError::BaseFeeNotZero(base_fee));
            }
        }

        trace!(target: "consensus::taiko", number = header.number, "Header verified");
        Ok(())
    }

    /// Rejects any block that carries uncles.
    pub fn verify_uncles(&self, block: &Block<TxEnvelope>) -> Result<(), ConsensusError> {
        if !block.body.ommers.is_empty() {
            return Err(ConsensusError::UnclesNotEmpty);
        }
        Ok(())
    }

    /// Initializes the consensus fields of a header about to be built.
    pub fn prepare<C: ChainHeaderReader>(
        &self,
        chain: &C,
        header: &mut Header,
    ) -> Result<(), ConsensusError> {
        header
            .number
            .checked_sub(1)
            .and_then(|number| chain.header(header.parent_hash, number))
            .ok_or(ConsensusError::UnknownAncestor(header.parent_hash))?;
        header.difficulty = self.calc_difficulty(header.timestamp, None);
        Ok(())
    }

    /// Applies the post-execution header rules. There are no block rewards on L2.
    pub fn finalize(&self, header: &mut Header, state_root: B256, withdrawals: Option<&Withdrawals>) {
        header.state_root = state_root;
        header.ommers_hash = EMPTY_OMMER_ROOT_HASH;
        header.difficulty = U256::ZERO;
        if self.chain_spec.is_withdrawals_active_at_timestamp(header.timestamp) {
            header.withdrawals_root =
                Some(withdrawals_root(withdrawals.map(|w| w.as_slice()).unwrap_or_default()));
        }
    }

    /// Finalizes the header and assembles the block from its transactions and receipts.
    ///
    /// Uncles are never included.
    pub fn finalize_and_assemble(
        &self,
        mut header: Header,
        state_root: B256,
        transactions: Vec<TxEnvelope>,
        receipts: &[ReceiptEnvelope],
        withdrawals: Option<Withdrawals>,
    ) -> Block<TxEnvelope> {
        self.finalize(&mut header, state_root, withdrawals.as_ref());

        header.transactions_root = calculate_transaction_root(&transactions);
        header.receipts_root = calculate_receipt_root(receipts);
        header.logs_bloom = receipts.iter().fold(Bloom::ZERO, |mut bloom, receipt| {
            bloom.accrue_bloom(&receipt.bloom());
            bloom
        });

        let withdrawals = self
            .chain_spec
            .is_withdrawals_active_at_timestamp(header.timestamp)
            .then(|| withdrawals.unwrap_or_default());

        Block::new(header, BlockBody { transactions, ommers: Vec::new(), withdrawals })
    }

    /// Publishes the block on `results`. There is no sealing work to do.
    ///
    /// Returns immediately: when `stop` has fired the block is dropped, and when nobody can
    /// take the result the block is dropped with a warning. The genesis block cannot be sealed.
    pub fn seal(
        &self,
        block: Block<TxEnvelope>,
        results: &Sender<Block<TxEnvelope>>,
        stop: &Receiver<()>,
    ) -> Result<(), ConsensusError> {
        let number = block.header.number;
        if number == 0 {
            return Err(ConsensusError::InvalidNumber(number));
        }
        let seal_hash = self.seal_hash(&block.header);

        // A fired or closed stop signal takes priority over a free result slot.
        if !matches!(stop.try_recv(), Err(TryRecvError::Empty)) {
            trace!(target: "consensus::taiko", %seal_hash, "Sealing stopped before publishing");
            return Ok(());
        }

        select! {
            send(results, block) -> sent => {
                if sent.is_err() {
                    warn!(target: "consensus::taiko", %seal_hash, "Sealing result receiver is gone");
                }
            }
            recv(stop) -> _ => {}
            default => {
                warn!(target: "consensus::taiko", %seal_hash, "Sealing result is not read by miner");
            }
        }

        Ok(())
    }

    /// Returns the hash of a block prior to it being sealed.
    pub fn seal_hash(&self, header: &Header) -> B256 {
        header.hash_slow()
    }

    /// Difficulty is always zero on L2.
    pub fn calc_difficulty(&self, _time: u64, _parent: Option<&Header>) -> U256 {
        U256::ZERO
    }
}

/// Current unix time in seconds.
pub fn unix_now() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or_default()
}
