//! Optional address-keyed metadata overrides supplied by the caller.

use std::collections::HashMap;

use alloy::primitives::Address;

/// Caller-supplied metadata overrides, keyed by contract address.
///
/// Consulted by the prober (symbol) and the icon resolver (logo) before falling back to
/// on-chain data or derived asset URLs.
pub type TokenMapping = HashMap<Address, TokenOverride>;

/// Override entry for a single token contract.
#[derive(Debug, Clone, Default)]
pub struct TokenOverride {
    pub symbol: Option<String>,
    pub logo_uri: Option<String>,
}
