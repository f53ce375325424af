//! Native backend error codes

use thiserror::Error;

/// Error code reported by a failed backend call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum BackendError {
    /// Handle is not (or no longer) valid. For `free_stream` this means the
    /// stream was already freed.
    #[error("invalid handle")]
    InvalidHandle,

    /// A parameter was out of range or otherwise rejected
    #[error("illegal parameter")]
    IllegalParameter,

    /// Effect or attribute type not supported by the stream
    #[error("illegal type")]
    IllegalType,

    /// Requested position is invalid (beyond the end or not decodable)
    #[error("invalid position")]
    Position,

    /// Requested data or feature is not available
    #[error("not available")]
    NotAvailable,

    /// Backend ran out of memory
    #[error("insufficient memory")]
    Memory,

    /// Any other native error code
    #[error("backend error code {0}")]
    Code(i32),
}

impl BackendError {
    /// Whether a failed `free_stream` means the stream is already gone
    pub fn is_already_freed(&self) -> bool {
        matches!(self, BackendError::InvalidHandle)
    }
}

/// Result type for backend calls
pub type BackendResult<T> = Result<T, BackendError>;
