#![cfg_attr(not(test), warn(missing_docs, clippy::missing_docs_in_private_items))]
#![cfg_attr(test, allow(missing_docs, clippy::missing_docs_in_private_items))]
//! Taiko RPC namespace extensions: origin lookups and proposal transaction lists.
/// Taiko `taiko` and `taikoAuth` namespace methods.
pub mod eth;

pub use eth::{
    auth::{TaikoAuthExt, TaikoAuthExtApiServer},
    error::TaikoApiError,
    eth::{TaikoExt, TaikoExtApiServer},
};
