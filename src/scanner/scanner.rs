use std::sync::Arc;

use alloy::{primitives::Address, rpc::types::Log};
use tokio::{sync::Semaphore, task::JoinSet};
use tracing::{debug, info};

use crate::{
    EventKind, ScanError,
    chain_client::ChainClient,
    events::parse_account,
    scanner::{
        IconResolver, ProxyRegistry, TokenList, TokenProber, TokenRecord,
        candidates::unique_contracts,
    },
};

/// Result of one completed scan.
#[derive(Debug, Clone, Default)]
pub struct ScanOutcome {
    /// Token records sorted ascending by symbol.
    pub tokens: TokenList,
    /// The account's marketplace delegate, if one is registered. Per-load, not
    /// per-record.
    pub proxy_address: Option<Address>,
}

/// The discovery-and-aggregation pipeline.
///
/// One `scan` resolves the historical block range, fetches the three event streams,
/// deduplicates candidate contracts, probes each candidate concurrently (bounded by
/// `max_concurrent_probes`), and assembles the deterministically ordered token list.
///
/// Built via [`TokenScannerBuilder`](crate::TokenScannerBuilder).
pub struct TokenScanner<C, P, I, X> {
    pub(crate) chain: Arc<C>,
    pub(crate) prober: Arc<P>,
    pub(crate) icons: Arc<I>,
    pub(crate) proxy: Arc<X>,
    pub(crate) max_concurrent_probes: usize,
}

impl<C, P, I, X> TokenScanner<C, P, I, X>
where
    C: ChainClient + 'static,
    P: TokenProber + 'static,
    I: IconResolver + 'static,
    X: ProxyRegistry + 'static,
{
    /// Runs one full scan for `account`.
    ///
    /// The whole history `[0, head]` is rescanned on every call; nothing is cached
    /// across loads.
    ///
    /// # Errors
    ///
    /// * [`ScanError::InvalidAddress`] - if `account` fails validation (checked before
    ///   any network access).
    /// * [`ScanError::Rpc`] / [`ScanError::Timeout`] - if the head-height query or any
    ///   of the three log fetches fails. Fatal to the load; individual probe failures
    ///   are not.
    pub async fn scan(&self, account: &str) -> Result<ScanOutcome, ScanError> {
        let owner = parse_account(account)?;

        info!(%owner, "starting approval scan");
        let head = self.chain.current_height().await?;

        let approval_filter = EventKind::Approval.account_filter(owner);
        let approval_for_all_filter = EventKind::ApprovalForAll.account_filter(owner);
        let transfer_filter = EventKind::Transfer.account_filter(owner);
        let (approvals, approvals_for_all, transfers) = tokio::try_join!(
            self.chain.fetch_logs(&approval_filter, 0, head),
            self.chain.fetch_logs(&approval_for_all_filter, 0, head),
            self.chain.fetch_logs(&transfer_filter, 0, head),
        )?;

        let candidates = unique_contracts([
            approvals.as_slice(),
            approvals_for_all.as_slice(),
            transfers.as_slice(),
        ]);
        info!(
            head,
            candidate_count = candidates.len(),
            approval_logs = approvals.len(),
            approval_for_all_logs = approvals_for_all.len(),
            transfer_logs = transfers.len(),
            "candidate contracts discovered"
        );

        let probes =
            self.spawn_probes(owner, candidates, Arc::new(approvals), Arc::new(approvals_for_all));

        // The delegate lookup is independent of the fan-out; run them concurrently.
        let (proxy_address, outcomes) =
            tokio::join!(self.proxy.delegate_for(owner), probes.join_all());

        let tokens = TokenList::assemble(outcomes.into_iter().flatten().collect());
        info!(token_count = tokens.len(), "scan complete");

        Ok(ScanOutcome { tokens, proxy_address })
    }

    /// Fans out one probe task per candidate, gated by the probe semaphore.
    ///
    /// Each task carries the candidate's first-occurrence index so completion order
    /// cannot leak into the assembled list.
    fn spawn_probes(
        &self,
        owner: Address,
        candidates: Vec<Address>,
        approvals: Arc<Vec<Log>>,
        approvals_for_all: Arc<Vec<Log>>,
    ) -> JoinSet<Option<(usize, TokenRecord)>> {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent_probes));
        let mut probes = JoinSet::new();

        for (index, contract) in candidates.into_iter().enumerate() {
            let semaphore = Arc::clone(&semaphore);
            let prober = Arc::clone(&self.prober);
            let icons = Arc::clone(&self.icons);
            let approvals = Arc::clone(&approvals);
            let approvals_for_all = Arc::clone(&approvals_for_all);

            probes.spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return None;
                };

                let approvals = contract_subset(&approvals, contract);
                let approvals_for_all = contract_subset(&approvals_for_all, contract);
                let icon = icons.resolve(contract).await;

                match prober.probe(contract, owner).await {
                    Ok(metadata) => Some((
                        index,
                        TokenRecord {
                            contract_address: contract,
                            symbol: metadata.symbol,
                            name: metadata.name,
                            balance: metadata.balance,
                            icon,
                            // Registration checks are skipped for this asset class.
                            registered: true,
                            approvals,
                            approvals_for_all,
                        },
                    )),
                    Err(failure) => {
                        debug!(%contract, error = %failure, "candidate failed conformance probe");
                        None
                    }
                }
            });
        }

        probes
    }
}

/// Pure in-memory subset of the merged logs belonging to one contract.
fn contract_subset(logs: &[Log], contract: Address) -> Vec<Log> {
    logs.iter().filter(|log| log.address() == contract).cloned().collect()
}
