use std::sync::Arc;

use alloy::transports::{RpcError, TransportErrorKind};
use thiserror::Error;

/// Errors that are fatal to an entire scan.
///
/// `ScanError` values are returned by [`TokenScanner::scan`](crate::TokenScanner::scan) and
/// committed as [`ScanState::Failed`](crate::ScanState::Failed) by a scan session. A failed
/// conformance probe of a single candidate contract is *not* a `ScanError`; see
/// [`ProbeFailure`].
#[derive(Error, Debug, Clone)]
pub enum ScanError {
    /// The supplied account address is malformed or fails EIP-55 checksum validation.
    ///
    /// Raised before any network access.
    #[error("invalid account address: {0}")]
    InvalidAddress(String),

    /// The underlying RPC transport returned an error during log retrieval or the
    /// head-height query.
    #[error("RPC error: {0}")]
    Rpc(Arc<RpcError<TransportErrorKind>>),

    /// A bounded per-call timeout elapsed while waiting for an RPC response.
    #[error("operation timed out")]
    Timeout,

    /// The configured maximum number of concurrent probes is invalid (must be greater
    /// than zero).
    #[error("max concurrent probes must be greater than 0")]
    InvalidMaxConcurrentProbes,

    /// The configured maximum block range per log query is invalid (must be greater
    /// than zero).
    #[error("max block range must be greater than 0")]
    InvalidMaxBlockRange,
}

impl From<RpcError<TransportErrorKind>> for ScanError {
    fn from(error: RpcError<TransportErrorKind>) -> Self {
        ScanError::Rpc(Arc::new(error))
    }
}

/// Why a single candidate contract was dropped from the result.
///
/// Probe failures are local to one candidate: the candidate is excluded from the token
/// list and the failure is never escalated to a load-level [`ScanError`].
#[derive(Error, Debug)]
pub enum ProbeFailure {
    /// A metadata call reverted, could not be transported, or returned data that failed
    /// to decode. Any of these means the contract does not conform to the token
    /// interface.
    #[error("{method}() call failed: {source}")]
    Call {
        method: &'static str,
        #[source]
        source: alloy::contract::Error,
    },

    /// A metadata call did not complete within the configured timeout.
    #[error("{method}() call timed out")]
    Timeout { method: &'static str },
}
