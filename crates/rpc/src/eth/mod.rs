//! Taiko `taiko` and `taikoAuth` namespace RPC extensions.
/// Authenticated Taiko RPC methods: origin writes and multi-list pool content.
pub mod auth;
/// RPC error mapping.
pub mod error;
#[allow(clippy::module_inception)]
/// Public Taiko `taiko` namespace methods.
pub mod eth;
