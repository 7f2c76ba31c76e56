//! In-memory chain store.
use std::{
    collections::{BTreeMap, HashMap},
    sync::atomic::{AtomicUsize, Ordering},
};

use alloy_consensus::{Block, Header, ReceiptEnvelope, TxEnvelope};
use alloy_primitives::B256;
use parking_lot::RwLock;

use crate::provider::{ChainHeaderReader, ChainWriter, ProviderError, ReceiptsReader};

/// Headers, blocks and receipts kept in memory.
#[derive(Debug, Default)]
pub struct MemoryChain {
    /// Chain contents.
    inner: RwLock<ChainState>,
    /// Number of [`ChainHeaderReader::header`] calls served.
    header_lookups: AtomicUsize,
}

/// Contents of a [`MemoryChain`].
#[derive(Debug, Default)]
struct ChainState {
    headers: HashMap<B256, Header>,
    canonical: BTreeMap<u64, B256>,
    head: Option<B256>,
    blocks: HashMap<B256, Block<TxEnvelope>>,
    receipts: HashMap<B256, Vec<ReceiptEnvelope>>,
}

impl MemoryChain {
    /// Creates a chain holding only `genesis`.
    pub fn new(genesis: Header) -> Self {
        let chain = Self::default();
        chain.insert_header(genesis);
        chain
    }

    /// Stores a header, making it the head when it is the highest one.
    pub fn insert_header(&self, header: Header) -> B256 {
        let hash = header.hash_slow();
        let mut state = self.inner.write();
        let is_head = state
            .head
            .and_then(|head| state.headers.get(&head))
            .is_none_or(|head| header.number > head.number);

        state.canonical.insert(header.number, hash);
        state.headers.insert(hash, header);
        if is_head {
            state.head = Some(hash);
        }
        hash
    }

    /// Stores receipts for a block hash without requiring the block itself.
    pub fn insert_receipts(&self, hash: B256, receipts: Vec<ReceiptEnvelope>) {
        self.inner.write().receipts.insert(hash, receipts);
    }

    /// Returns a stored block.
    pub fn block_by_hash(&self, hash: B256) -> Option<Block<TxEnvelope>> {
        self.inner.read().blocks.get(&hash).cloned()
    }

    /// Number of parent lookups served so far.
    pub fn header_lookups(&self) -> usize {
        self.header_lookups.load(Ordering::SeqCst)
    }
}

impl ChainHeaderReader for MemoryChain {
    fn header(&self, hash: B256, number: u64) -> Option<Header> {
        self.header_lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.read().headers.get(&hash).filter(|header| header.number == number).cloned()
    }

    fn header_by_hash(&self, hash: B256) -> Option<Header> {
        self.inner.read().headers.get(&hash).cloned()
    }

    fn header_by_number(&self, number: u64) -> Option<Header> {
        let state = self.inner.read();
        state.canonical.get(&number).and_then(|hash| state.headers.get(hash)).cloned()
    }

    fn current_header(&self) -> Option<Header> {
        let state = self.inner.read();
        state.head.and_then(|hash| state.headers.get(&hash)).cloned()
    }
}

impl ChainWriter for MemoryChain {
    fn insert_block(
        &self,
        block: Block<TxEnvelope>,
        receipts: Vec<ReceiptEnvelope>,
    ) -> Result<(), ProviderError> {
        let hash = self.insert_header(block.header.clone());
        let mut state = self.inner.write();
        state.blocks.insert(hash, block);
        state.receipts.insert(hash, receipts);
        Ok(())
    }
}

impl ReceiptsReader for MemoryChain {
    fn receipts_by_block_hash(
        &self,
        hash: B256,
    ) -> Result<Option<Vec<ReceiptEnvelope>>, ProviderError> {
        Ok(self.inner.read().receipts.get(&hash).cloned())
    }
}
