use alloy_consensus::{Block, ReceiptEnvelope, TxEnvelope};
use alloy_primitives::B256;
use tracing::info;

use crate::{
    error::ConsensusError,
    provider::{ChainHeaderReader, ChainWriter},
    validation::TaikoConsensus,
};

/// Verifies a block and inserts it into the chain, returning its hash.
///
/// Nothing is written when the header or the uncle check fails.
pub fn import_block<C>(
    consensus: &TaikoConsensus,
    chain: &C,
    block: Block<TxEnvelope>,
    receipts: Vec<ReceiptEnvelope>,
) -> Result<B256, ConsensusError>
where
    C: ChainHeaderReader + ChainWriter,
{
    consensus.verify_header(chain, &block.header, true)?;
    consensus.verify_uncles(&block)?;

    let number = block.header.number;
    let hash = block.header.hash_slow();
    chain.insert_block(block, receipts)?;

    info!(target: "consensus::taiko", number, %hash, "Imported block");
    Ok(hash)
}
