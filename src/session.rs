//! Load state machine for repeated, possibly overlapping scans.
//!
//! A [`ScanSession`] owns a [`TokenScanner`] and publishes [`ScanState`] transitions
//! over a watch channel. Each [`trigger`](ScanSession::trigger) starts a new load;
//! in-flight loads are not cancelled, but every load carries a monotonically
//! increasing generation and a completed load commits its result only if its
//! generation is still current. A superseded load is discarded at commit time, so a
//! slow old scan can never overwrite a newer result.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tracing::{debug, info, warn};

use crate::{
    ScanError,
    chain_client::ChainClient,
    scanner::{IconResolver, ProxyRegistry, ScanOutcome, TokenProber, TokenScanner},
};

/// Observable state of the scan session.
#[derive(Debug, Clone, Default)]
pub enum ScanState {
    /// No load has been triggered yet.
    #[default]
    Idle,
    /// A load is in flight.
    Loading,
    /// The most recent load completed.
    Settled(ScanOutcome),
    /// The most recent load failed at the fetch layer.
    Failed(ScanError),
}

impl ScanState {
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, ScanState::Loading)
    }

    #[must_use]
    pub fn is_settled(&self) -> bool {
        matches!(self, ScanState::Settled(_))
    }
}

/// Drives repeated scans and publishes their state.
pub struct ScanSession<C, P, I, X> {
    scanner: TokenScanner<C, P, I, X>,
    state: watch::Sender<ScanState>,
    generation: AtomicU64,
}

impl<C, P, I, X> ScanSession<C, P, I, X>
where
    C: ChainClient + 'static,
    P: TokenProber + 'static,
    I: IconResolver + 'static,
    X: ProxyRegistry + 'static,
{
    #[must_use]
    pub fn new(scanner: TokenScanner<C, P, I, X>) -> Arc<Self> {
        let (state, _) = watch::channel(ScanState::Idle);
        Arc::new(Self { scanner, state, generation: AtomicU64::new(0) })
    }

    /// Subscribe to state transitions.
    ///
    /// The receiver always observes the latest state; intermediate transitions may be
    /// skipped if the consumer lags.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ScanState> {
        self.state.subscribe()
    }

    /// Subscribe to state transitions as a stream.
    #[must_use]
    pub fn state_stream(&self) -> WatchStream<ScanState> {
        WatchStream::new(self.state.subscribe())
    }

    /// Starts a new load for `account`.
    ///
    /// Returns immediately; the state moves to [`ScanState::Loading`] synchronously and
    /// settles asynchronously. Triggering while a load is in flight supersedes it: the
    /// older load keeps running but its result is discarded when it completes.
    pub fn trigger(self: &Arc<Self>, account: impl Into<String>) {
        let account = account.into();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        info!(generation, account = %account, "load triggered");

        self.state.send_replace(ScanState::Loading);

        let session = Arc::clone(self);
        tokio::spawn(async move {
            let outcome = session.scanner.scan(&account).await;
            session.commit(generation, outcome);
        });
    }

    /// Commits a completed load unless a newer one has been triggered since.
    ///
    /// The generation check runs inside the watch commit so a stale load can never
    /// race a fresh one into the visible state.
    fn commit(&self, generation: u64, outcome: Result<ScanOutcome, ScanError>) {
        let mut committed = false;
        let mut outcome = Some(outcome);

        self.state.send_if_modified(|state| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }

            *state = match outcome.take() {
                Some(Ok(result)) => ScanState::Settled(result),
                Some(Err(error)) => {
                    warn!(generation, error = %error, "load failed");
                    ScanState::Failed(error)
                }
                None => return false,
            };
            committed = true;
            true
        });

        if committed {
            info!(generation, "load committed");
        } else {
            debug!(generation, "stale load discarded");
        }
    }
}
