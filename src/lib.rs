//! approval-scanner discovers every ERC-721-like token contract that an account has
//! interacted with and aggregates its approval state, so stale token approvals can be
//! audited and later revoked.
//!
//! The main entry point is [`TokenScanner`], built via [`TokenScannerBuilder`]. One
//! [`scan`](TokenScanner::scan) resolves the full historical block range, fetches the
//! `Approval`, `ApprovalForAll` and incoming-`Transfer` event streams for the account,
//! deduplicates the contracts they reference, probes each candidate for ERC-721
//! conformance concurrently, and assembles a [`TokenList`] sorted ascending by symbol.
//!
//! # Ordering
//!
//! The final list order is a pure function of token symbols and candidate
//! first-occurrence order. Probe completion order never affects it.
//!
//! # Probe failures
//!
//! A candidate whose conformance probe reverts, times out, or fails to decode is
//! silently excluded from the result. Only fetch-layer failures (log retrieval, head
//! height) fail a load; see [`ScanError`].
//!
//! # Sessions
//!
//! For callers that re-trigger scans on input changes, [`ScanSession`] wraps a scanner
//! in an explicit state machine ([`ScanState`]) published over a watch channel, with a
//! per-load generation counter so a superseded load can never overwrite a newer
//! result.
//!
//! # Collaborators
//!
//! Chain access, conformance probing, icon resolution and proxy-delegate resolution
//! are consumed through read-only traits ([`ChainClient`], [`TokenProber`],
//! [`IconResolver`], [`ProxyRegistry`]) with Alloy-backed implementations provided.
//!
//! [`ChainClient`]: chain_client::ChainClient

pub mod chain_client;
pub mod mapping;
pub mod scanner;
pub mod session;

mod error;
mod events;

pub use error::{ProbeFailure, ScanError};
pub use events::{EventKind, parse_account};
pub use mapping::{TokenMapping, TokenOverride};
pub use scanner::{
    AlloyTokenScanner, DEFAULT_MAX_CONCURRENT_PROBES, Erc721Prober, IconResolver,
    OpenSeaProxyResolver, ProxyRegistry, ScanOutcome, TokenList, TokenListFilter, TokenMetadata,
    TokenProber, TokenRecord, TokenScanner, TokenScannerBuilder, TrustWalletIcons,
};
pub use session::{ScanSession, ScanState};
