use std::{sync::Arc, time::Duration};

use alloy::providers::RootProvider;

use crate::{
    ScanError,
    chain_client::{AlloyChainClient, ChainClient},
    mapping::TokenMapping,
    scanner::{
        Erc721Prober, IconResolver, OpenSeaProxyResolver, ProxyRegistry, TokenProber,
        TokenScanner, TrustWalletIcons,
    },
};

/// Default bound on concurrent conformance probes.
pub const DEFAULT_MAX_CONCURRENT_PROBES: usize = 24;

/// A [`TokenScanner`] wired to the Alloy-backed collaborators.
pub type AlloyTokenScanner =
    TokenScanner<AlloyChainClient, Erc721Prober, TrustWalletIcons, OpenSeaProxyResolver>;

/// Builder for [`TokenScanner`].
///
/// Combinators are last-call-wins; configuration is validated when the scanner is
/// built.
pub struct TokenScannerBuilder<C, P, I, X> {
    pub(crate) chain: C,
    pub(crate) prober: P,
    pub(crate) icons: I,
    pub(crate) proxy: X,
    pub(crate) max_concurrent_probes: usize,
}

impl<C, P, I, X> TokenScannerBuilder<C, P, I, X>
where
    C: ChainClient,
    P: TokenProber,
    I: IconResolver,
    X: ProxyRegistry,
{
    /// Creates a builder from explicit collaborators.
    ///
    /// Use [`TokenScannerBuilder::from_provider`] for the Alloy-backed defaults.
    #[must_use]
    pub fn new(chain: C, prober: P, icons: I, proxy: X) -> Self {
        Self {
            chain,
            prober,
            icons,
            proxy,
            max_concurrent_probes: DEFAULT_MAX_CONCURRENT_PROBES,
        }
    }

    /// Sets the bound on concurrent conformance probes.
    ///
    /// Candidate count is unbounded and proportional to historical activity, so the
    /// fan-out must be capped to respect provider rate limits. Must be greater than 0.
    #[must_use]
    pub fn max_concurrent_probes(mut self, max_concurrent_probes: usize) -> Self {
        self.max_concurrent_probes = max_concurrent_probes;
        self
    }

    /// Builds the scanner.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::InvalidMaxConcurrentProbes`] if the probe bound is zero.
    pub fn build(self) -> Result<TokenScanner<C, P, I, X>, ScanError> {
        if self.max_concurrent_probes == 0 {
            return Err(ScanError::InvalidMaxConcurrentProbes);
        }

        Ok(TokenScanner {
            chain: Arc::new(self.chain),
            prober: Arc::new(self.prober),
            icons: Arc::new(self.icons),
            proxy: Arc::new(self.proxy),
            max_concurrent_probes: self.max_concurrent_probes,
        })
    }
}

impl TokenScannerBuilder<AlloyChainClient, Erc721Prober, TrustWalletIcons, OpenSeaProxyResolver> {
    /// Creates a builder wired to the Alloy-backed collaborators for `chain_id`.
    #[must_use]
    pub fn from_provider(provider: RootProvider, chain_id: u64) -> Self {
        Self::new(
            AlloyChainClient::new(provider.clone()),
            Erc721Prober::new(provider.clone()),
            TrustWalletIcons::new(chain_id),
            OpenSeaProxyResolver::new(provider, chain_id),
        )
    }

    /// Sets the maximum number of blocks per log query batch.
    ///
    /// Must be greater than 0.
    #[must_use]
    pub fn max_block_range(mut self, max_block_range: u64) -> Self {
        self.chain = self.chain.max_block_range(max_block_range);
        self
    }

    /// Sets the per-call timeout applied to every RPC operation.
    #[must_use]
    pub fn call_timeout(mut self, timeout: Duration) -> Self {
        self.chain = self.chain.call_timeout(timeout);
        self.prober = self.prober.call_timeout(timeout);
        self.proxy = self.proxy.call_timeout(timeout);
        self
    }

    /// Supplies the address-keyed metadata override mapping.
    #[must_use]
    pub fn token_mapping(mut self, mapping: TokenMapping) -> Self {
        self.prober = self.prober.token_mapping(mapping.clone());
        self.icons = self.icons.token_mapping(mapping);
        self
    }

    /// Builds the scanner with Alloy-specific validation.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// * The probe bound is zero
    /// * The max block range is zero
    pub fn connect(self) -> Result<AlloyTokenScanner, ScanError> {
        if self.chain.max_block_range == 0 {
            return Err(ScanError::InvalidMaxBlockRange);
        }
        self.build()
    }
}
