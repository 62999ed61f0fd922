//! Marketplace proxy delegate resolution.

use std::time::Duration;

use alloy::{
    primitives::{Address, address},
    providers::RootProvider,
    sol,
};
use async_trait::async_trait;
use tokio::time::timeout;
use tracing::debug;

use crate::chain_client::DEFAULT_CALL_TIMEOUT;

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    contract IProxyRegistry {
        function proxies(address owner) external view returns (address);
    }
}

/// OpenSea's wyvern proxy registry on Ethereum mainnet.
pub const OPENSEA_PROXY_REGISTRY: Address =
    address!("0xa5409ec958C83C3f309868babACA7c86DCB077c1");

/// Resolves the account's marketplace delegate address, once per load.
///
/// Resolution is best-effort: chains without a registry, reverting calls, and the zero
/// address all yield `None`. Never fails a scan.
#[async_trait]
pub trait ProxyRegistry: Send + Sync {
    async fn delegate_for(&self, owner: Address) -> Option<Address>;
}

/// [`ProxyRegistry`] backed by the on-chain OpenSea registry contract.
#[derive(Clone, Debug)]
pub struct OpenSeaProxyResolver {
    provider: RootProvider,
    registry: Option<Address>,
    pub(crate) call_timeout: Duration,
}

impl OpenSeaProxyResolver {
    /// Creates a resolver for the given chain; chains without a known registry resolve
    /// every account to `None`.
    #[must_use]
    pub fn new(provider: RootProvider, chain_id: u64) -> Self {
        Self {
            provider,
            registry: registry_for_chain(chain_id),
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    #[must_use]
    pub fn call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }
}

#[async_trait]
impl ProxyRegistry for OpenSeaProxyResolver {
    async fn delegate_for(&self, owner: Address) -> Option<Address> {
        let registry = IProxyRegistry::new(self.registry?, self.provider.clone());

        match timeout(self.call_timeout, registry.proxies(owner).call()).await {
            Ok(Ok(proxy)) if !proxy.is_zero() => Some(proxy),
            Ok(Ok(_)) => None,
            Ok(Err(err)) => {
                debug!(%owner, error = %err, "proxy registry lookup failed");
                None
            }
            Err(_) => {
                debug!(%owner, "proxy registry lookup timed out");
                None
            }
        }
    }
}

/// Known proxy registry deployments by chain id.
#[must_use]
pub fn registry_for_chain(chain_id: u64) -> Option<Address> {
    (chain_id == 1).then_some(OPENSEA_PROXY_REGISTRY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mainnet_has_a_registry() {
        assert_eq!(registry_for_chain(1), Some(OPENSEA_PROXY_REGISTRY));
    }

    #[test]
    fn other_chains_have_none() {
        assert_eq!(registry_for_chain(10), None);
        assert_eq!(registry_for_chain(137), None);
    }
}
