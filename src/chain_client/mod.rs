//! Read-only chain access used by the scan pipeline.
//!
//! The pipeline consumes the chain through the narrow [`ChainClient`] capability: one
//! head-height query per load plus filtered log retrieval. [`AlloyChainClient`] is the
//! production implementation backed by an Alloy [`RootProvider`]; tests substitute
//! scripted implementations.
//!
//! [`RootProvider`]: alloy::providers::RootProvider

mod alloy_client;

pub use alloy_client::{AlloyChainClient, DEFAULT_CALL_TIMEOUT, DEFAULT_MAX_BLOCK_RANGE};

use alloy::rpc::types::{Filter, Log};
use async_trait::async_trait;

use crate::ScanError;

/// Read-only chain capability consumed by the scanner.
///
/// Implementations must be safe for concurrent use; the scanner shares one client across
/// all concurrent operations of a load.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Returns the current chain head height.
    async fn current_height(&self) -> Result<u64, ScanError>;

    /// Returns all logs matching `filter` within `[from, to]`, ordered by block.
    ///
    /// Implementations handle any provider-side span limits internally (e.g. by
    /// chunking the range). A failure here is fatal to the whole load and is not
    /// retried.
    async fn fetch_logs(&self, filter: &Filter, from: u64, to: u64)
    -> Result<Vec<Log>, ScanError>;
}
