mod builder;
mod candidates;
mod icon;
mod probe;
mod proxy;
mod records;
#[allow(clippy::module_inception)]
mod scanner;

pub use builder::{AlloyTokenScanner, DEFAULT_MAX_CONCURRENT_PROBES, TokenScannerBuilder};
pub use icon::{IconResolver, TrustWalletIcons};
pub use probe::{Erc721Prober, TokenMetadata, TokenProber};
pub use proxy::{OPENSEA_PROXY_REGISTRY, OpenSeaProxyResolver, ProxyRegistry, registry_for_chain};
pub use records::{TokenList, TokenListFilter, TokenRecord};
pub use scanner::{ScanOutcome, TokenScanner};
