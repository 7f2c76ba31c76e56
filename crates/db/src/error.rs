//! Origin store errors.
/// Errors returned by the origin store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DatabaseError {
    /// The requested entry does not exist.
    #[error("not found")]
    NotFound,
    /// A stored value could not be decoded.
    #[error("failed to decode stored value: {0}")]
    Codec(#[from] alloy_rlp::Error),
    /// The key-value backend failed.
    #[error("database backend error: {0}")]
    Backend(String),
}

impl DatabaseError {
    /// Whether the error only reports a missing entry.
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}
