use std::{ops::RangeInclusive, time::Duration};

use alloy::{
    providers::{Provider, RootProvider},
    rpc::types::{Filter, Log},
    transports::{RpcError, TransportErrorKind},
};
use async_trait::async_trait;
use tokio::time::timeout;
use tracing::{debug, error, info};

use crate::{ScanError, chain_client::ChainClient};

/// Default timeout applied to every RPC call.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(60);
/// Default maximum number of blocks queried per `eth_getLogs` call.
pub const DEFAULT_MAX_BLOCK_RANGE: u64 = 1000;

/// [`ChainClient`] backed by an Alloy [`RootProvider`].
///
/// Every call is wrapped in a bounded timeout. Log queries over wide ranges are split
/// into `max_block_range`-sized batches so provider-side span limits are honored; the
/// batches are fetched sequentially and concatenated in block order. No retries are
/// performed.
#[derive(Clone, Debug)]
pub struct AlloyChainClient {
    provider: RootProvider,
    pub(crate) call_timeout: Duration,
    pub(crate) max_block_range: u64,
}

impl AlloyChainClient {
    #[must_use]
    pub fn new(provider: RootProvider) -> Self {
        Self {
            provider,
            call_timeout: DEFAULT_CALL_TIMEOUT,
            max_block_range: DEFAULT_MAX_BLOCK_RANGE,
        }
    }

    /// Sets the maximum timeout for RPC operations.
    #[must_use]
    pub fn call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    /// Sets the maximum number of blocks per `eth_getLogs` call.
    ///
    /// Must be greater than 0.
    #[must_use]
    pub fn max_block_range(mut self, max_block_range: u64) -> Self {
        self.max_block_range = max_block_range;
        self
    }

    async fn with_timeout<T>(
        &self,
        call: &'static str,
        fut: impl Future<Output = Result<T, RpcError<TransportErrorKind>>> + Send,
    ) -> Result<T, ScanError> {
        match timeout(self.call_timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => {
                error!(call, error = %err, "RPC call failed");
                Err(err.into())
            }
            Err(_) => {
                error!(call, "RPC call timed out");
                Err(ScanError::Timeout)
            }
        }
    }
}

#[async_trait]
impl ChainClient for AlloyChainClient {
    async fn current_height(&self) -> Result<u64, ScanError> {
        info!("eth_blockNumber called");
        self.with_timeout("eth_blockNumber", self.provider.get_block_number()).await
    }

    async fn fetch_logs(
        &self,
        filter: &Filter,
        from: u64,
        to: u64,
    ) -> Result<Vec<Log>, ScanError> {
        let mut logs = Vec::new();

        for range in batch_ranges(from, to, self.max_block_range) {
            let scoped = filter.clone().from_block(*range.start()).to_block(*range.end());
            let batch =
                self.with_timeout("eth_getLogs", self.provider.get_logs(&scoped)).await?;

            debug!(
                batch_start = *range.start(),
                batch_end = *range.end(),
                log_count = batch.len(),
                "fetched log batch"
            );
            logs.extend(batch);
        }

        Ok(logs)
    }
}

/// Splits `[from, to]` into consecutive batches of at most `span` blocks.
fn batch_ranges(from: u64, to: u64, span: u64) -> impl Iterator<Item = RangeInclusive<u64>> {
    let mut batch_start = from;
    let mut done = from > to;

    std::iter::from_fn(move || {
        if done {
            return None;
        }
        let batch_end = batch_start.saturating_add(span.saturating_sub(1)).min(to);
        let range = batch_start..=batch_end;
        if batch_end == to {
            done = true;
        } else {
            batch_start = batch_end + 1;
        }
        Some(range)
    })
}
