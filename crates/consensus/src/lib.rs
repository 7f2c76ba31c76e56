#![cfg_attr(not(test), warn(missing_docs, clippy::missing_docs_in_private_items))]
#![cfg_attr(test, allow(missing_docs, clippy::missing_docs_in_private_items))]
//! Taiko L2 consensus rules: header validation, batch verification and block sealing.
/// Consensus error types.
pub mod error;
/// Validated block import.
pub mod import;
/// Ordered concurrent task execution.
pub mod ordered;
/// Chain store collaborator traits.
pub mod provider;
/// In-memory chain store for tests.
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
/// Header validation and the sealing engine.
pub mod validation;

pub use error::ConsensusError;
pub use import::import_block;
pub use provider::{ChainHeaderReader, ChainWriter, ProviderError, ReceiptsReader};
pub use validation::{TaikoConsensus, unix_now};
