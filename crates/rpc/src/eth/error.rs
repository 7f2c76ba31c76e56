use alethia_l2_block::SplitError;
use alethia_l2_consensus::{ConsensusError, ProviderError};
use alethia_l2_db::DatabaseError;
use jsonrpsee_types::error::{ErrorCode, ErrorObjectOwned};

/// Errors that can occur when interacting with the `taiko_` and `taikoAuth_` namespaces
#[derive(Debug, thiserror::Error)]
pub enum TaikoApiError {
    /// The requested entry does not exist.
    #[error("not found")]
    GethNotFound,
    /// A request parameter was rejected.
    #[error("{0}")]
    InvalidParams(String),
    /// The node failed to serve the request.
    #[error("{0}")]
    Internal(String),
}

impl From<DatabaseError> for TaikoApiError {
    fn from(error: DatabaseError) -> Self {
        match error {
            DatabaseError::NotFound => Self::GethNotFound,
            error => Self::Internal(error.to_string()),
        }
    }
}

impl From<ProviderError> for TaikoApiError {
    fn from(error: ProviderError) -> Self {
        Self::Internal(error.to_string())
    }
}

impl From<ConsensusError> for TaikoApiError {
    fn from(error: ConsensusError) -> Self {
        Self::Internal(error.to_string())
    }
}

impl From<SplitError> for TaikoApiError {
    fn from(error: SplitError) -> Self {
        Self::InvalidParams(error.to_string())
    }
}

impl From<TaikoApiError> for ErrorObjectOwned {
    /// Converts the TaikoApiError into the jsonrpsee ErrorObject.
    fn from(error: TaikoApiError) -> Self {
        match error {
            TaikoApiError::GethNotFound => ErrorObjectOwned::owned(
                ErrorCode::ServerError(-32004).code(),
                "not found",
                None::<()>,
            ),
            TaikoApiError::InvalidParams(message) => {
                ErrorObjectOwned::owned(ErrorCode::InvalidParams.code(), message, None::<()>)
            }
            TaikoApiError::Internal(message) => {
                ErrorObjectOwned::owned(ErrorCode::InternalError.code(), message, None::<()>)
            }
        }
    }
}
