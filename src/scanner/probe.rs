//! Conformance probing of candidate contracts.

use std::{future::IntoFuture, time::Duration};

use alloy::{primitives::Address, providers::RootProvider, sol};
use async_trait::async_trait;
use tokio::time::timeout;

use crate::{ProbeFailure, chain_client::DEFAULT_CALL_TIMEOUT, mapping::TokenMapping};

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    contract IErc721Metadata {
        function symbol() external view returns (string);
        function name() external view returns (string);
        function balanceOf(address owner) external view returns (uint256);
    }
}

/// Metadata returned by a successful conformance probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMetadata {
    pub symbol: String,
    pub name: String,
    /// Textual decimal rendering of the owner's balance.
    pub balance: String,
}

/// Validates a candidate contract against the token interface and fetches its metadata.
///
/// A probe is a two-way outcome: success carries the fields needed to build a token
/// record; failure means the candidate is dropped from the scan, never escalated.
#[async_trait]
pub trait TokenProber: Send + Sync {
    async fn probe(&self, contract: Address, owner: Address)
    -> Result<TokenMetadata, ProbeFailure>;
}

/// [`TokenProber`] that performs the on-chain `symbol()`, `name()` and
/// `balanceOf(owner)` calls through a typed contract instance.
///
/// All three calls must succeed for the contract to count as conformant. An override
/// mapping entry supplies the symbol without an on-chain call; the remaining calls
/// still gate conformance.
#[derive(Clone, Debug)]
pub struct Erc721Prober {
    provider: RootProvider,
    pub(crate) call_timeout: Duration,
    pub(crate) mapping: Option<TokenMapping>,
}

impl Erc721Prober {
    #[must_use]
    pub fn new(provider: RootProvider) -> Self {
        Self { provider, call_timeout: DEFAULT_CALL_TIMEOUT, mapping: None }
    }

    #[must_use]
    pub fn call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    #[must_use]
    pub fn token_mapping(mut self, mapping: TokenMapping) -> Self {
        self.mapping = Some(mapping);
        self
    }

    async fn bounded<T>(
        &self,
        method: &'static str,
        call: impl Future<Output = Result<T, alloy::contract::Error>> + Send,
    ) -> Result<T, ProbeFailure> {
        match timeout(self.call_timeout, call).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(source)) => Err(ProbeFailure::Call { method, source }),
            Err(_) => Err(ProbeFailure::Timeout { method }),
        }
    }

    fn symbol_override(&self, contract: Address) -> Option<String> {
        self.mapping.as_ref()?.get(&contract)?.symbol.clone()
    }
}

#[async_trait]
impl TokenProber for Erc721Prober {
    async fn probe(
        &self,
        contract: Address,
        owner: Address,
    ) -> Result<TokenMetadata, ProbeFailure> {
        let token = IErc721Metadata::new(contract, self.provider.clone());

        let balance = self.bounded("balanceOf", token.balanceOf(owner).call().into_future()).await?;
        let name = self.bounded("name", token.name().call().into_future()).await?;
        let symbol = match self.symbol_override(contract) {
            Some(symbol) => symbol,
            None => self.bounded("symbol", token.symbol().call().into_future()).await?,
        };

        Ok(TokenMetadata { symbol, name, balance: balance.to_string() })
    }
}
