//! Display icon resolution for token records.

use alloy::primitives::Address;
use async_trait::async_trait;

use crate::mapping::TokenMapping;

const MAINNET_CHAIN_ID: u64 = 1;

/// Resolves a display icon URL for a token contract. Read-only, never fails a scan.
#[async_trait]
pub trait IconResolver: Send + Sync {
    async fn resolve(&self, contract: Address) -> Option<String>;
}

/// Default [`IconResolver`]: consults the override mapping first, then falls back to
/// the Trust Wallet assets URL keyed by the EIP-55 checksummed address.
///
/// The asset repository only covers Ethereum mainnet; other chains resolve to `None`
/// unless the mapping supplies a logo. No network access is performed.
#[derive(Clone, Debug)]
pub struct TrustWalletIcons {
    chain_id: u64,
    pub(crate) mapping: Option<TokenMapping>,
}

impl TrustWalletIcons {
    #[must_use]
    pub fn new(chain_id: u64) -> Self {
        Self { chain_id, mapping: None }
    }

    #[must_use]
    pub fn token_mapping(mut self, mapping: TokenMapping) -> Self {
        self.mapping = Some(mapping);
        self
    }
}

#[async_trait]
impl IconResolver for TrustWalletIcons {
    async fn resolve(&self, contract: Address) -> Option<String> {
        if let Some(logo) =
            self.mapping.as_ref().and_then(|m| m.get(&contract)).and_then(|o| o.logo_uri.clone())
        {
            return Some(logo);
        }

        (self.chain_id == MAINNET_CHAIN_ID).then(|| {
            format!(
                "https://raw.githubusercontent.com/trustwallet/assets/master/blockchains/ethereum/assets/{}/logo.png",
                contract.to_checksum(None)
            )
        })
    }
}
