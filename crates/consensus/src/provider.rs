use alloy_consensus::{Block, Header, ReceiptEnvelope, TxEnvelope};
use alloy_primitives::B256;
use auto_impl::auto_impl;

/// Errors reported by the chain and state store collaborators.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// No state is available for the requested block.
    #[error("state not available for block {0}")]
    StateUnavailable(B256),
    /// The chain has no current head.
    #[error("failed to find current head")]
    MissingHead,
    /// Any other storage failure.
    #[error("storage error: {0}")]
    Storage(String),
}

/// Read access to the headers of the local chain.
#[auto_impl(&, Arc)]
pub trait ChainHeaderReader: Send + Sync {
    /// Returns the header with the given hash and number.
    fn header(&self, hash: B256, number: u64) -> Option<Header>;

    /// Returns the header with the given hash.
    fn header_by_hash(&self, hash: B256) -> Option<Header>;

    /// Returns the canonical header at the given height.
    fn header_by_number(&self, number: u64) -> Option<Header>;

    /// Returns the header of the current chain head.
    fn current_header(&self) -> Option<Header>;
}

/// Insertion of validated blocks into the local chain.
#[auto_impl(&, Arc)]
pub trait ChainWriter: Send + Sync {
    /// Stores a block and its receipts, advancing the head when it extends the chain.
    fn insert_block(
        &self,
        block: Block<TxEnvelope>,
        receipts: Vec<ReceiptEnvelope>,
    ) -> Result<(), ProviderError>;
}

/// Receipt lookups that do not require the block to be canonical.
#[auto_impl(&, Arc)]
pub trait ReceiptsReader: Send + Sync {
    /// Returns the receipts of the block with the given hash.
    fn receipts_by_block_hash(
        &self,
        hash: B256,
    ) -> Result<Option<Vec<ReceiptEnvelope>>, ProviderError>;
}
