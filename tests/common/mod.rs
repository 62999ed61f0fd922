#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use alloy::{
    primitives::{Address, B256, Bytes, LogData, U256, address},
    rpc::types::{Filter, Log},
    transports::RpcError,
};
use approval_scanner::{
    EventKind, ProbeFailure, ScanError, TokenMetadata, TokenProber, TokenScanner,
    TokenScannerBuilder, chain_client::ChainClient, scanner::{IconResolver, ProxyRegistry},
};
use async_trait::async_trait;

pub const OWNER: Address = address!("0xd8dA6BF26964af9d7eed9e03e53415d37aa96045");
pub const OTHER_ACCOUNT: Address = address!("0xAb5801a7D398351b8bE11C439e05C5B3259aeC9B");
pub const SPENDER: Address = address!("0x00000000006c3852cbEf3e08E8dF289169EdE581");

pub const CONTRACT_A: Address = address!("0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");
pub const CONTRACT_B: Address = address!("0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb");
pub const CONTRACT_C: Address = address!("0xcccccccccccccccccccccccccccccccccccccccc");
pub const CONTRACT_D: Address = address!("0xdddddddddddddddddddddddddddddddddddddddd");

fn log_with_topics(contract: Address, topics: Vec<B256>, block: u64) -> Log {
    let mut log = Log::default();
    log.inner.address = contract;
    log.inner.data = LogData::new_unchecked(topics, Bytes::new());
    log.block_number = Some(block);
    log
}

pub fn approval_log(contract: Address, owner: Address, block: u64) -> Log {
    log_with_topics(
        contract,
        vec![
            EventKind::Approval.signature_hash(),
            owner.into_word(),
            SPENDER.into_word(),
            B256::from(U256::from(1u64)),
        ],
        block,
    )
}

pub fn approval_for_all_log(contract: Address, owner: Address, block: u64) -> Log {
    log_with_topics(
        contract,
        vec![
            EventKind::ApprovalForAll.signature_hash(),
            owner.into_word(),
            SPENDER.into_word(),
        ],
        block,
    )
}

pub fn transfer_log(contract: Address, to: Address, block: u64) -> Log {
    log_with_topics(
        contract,
        vec![
            EventKind::Transfer.signature_hash(),
            SPENDER.into_word(),
            to.into_word(),
            B256::from(U256::from(1u64)),
        ],
        block,
    )
}

/// Scripted [`ChainClient`] serving logs out of memory with real topic matching.
#[derive(Clone, Default)]
pub struct MockChain {
    pub height: u64,
    pub logs: Vec<Log>,
    /// Fail the head-height query and every log fetch.
    pub fail: bool,
    /// Delay every fetch whose filter is scoped to this account topic word.
    pub slow_account: Option<(B256, Duration)>,
    pub height_calls: Arc<AtomicUsize>,
    pub fetch_calls: Arc<AtomicUsize>,
}

impl MockChain {
    pub fn with_logs(height: u64, logs: Vec<Log>) -> Self {
        Self { height, logs, ..Default::default() }
    }
}

fn filter_matches(filter: &Filter, log: &Log) -> bool {
    filter.topics.iter().enumerate().all(|(position, set)| {
        set.is_empty() || log.topics().get(position).is_some_and(|topic| set.matches(topic))
    })
}

fn filter_concerns(filter: &Filter, account_word: &B256) -> bool {
    filter.topics.iter().any(|set| set.matches(account_word) && !set.is_empty())
}

#[async_trait]
impl ChainClient for MockChain {
    async fn current_height(&self) -> Result<u64, ScanError> {
        self.height_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ScanError::Timeout);
        }
        Ok(self.height)
    }

    async fn fetch_logs(
        &self,
        filter: &Filter,
        from: u64,
        to: u64,
    ) -> Result<Vec<Log>, ScanError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ScanError::Timeout);
        }
        if let Some((account_word, delay)) = &self.slow_account {
            if filter_concerns(filter, account_word) {
                tokio::time::sleep(*delay).await;
            }
        }

        Ok(self
            .logs
            .iter()
            .filter(|log| {
                let block = log.block_number.unwrap_or_default();
                from <= block && block <= to && filter_matches(filter, log)
            })
            .cloned()
            .collect())
    }
}

/// Per-contract probe script.
#[derive(Clone)]
pub enum ProbeScript {
    Token { symbol: &'static str, balance: &'static str },
    Revert,
}

/// Scripted [`TokenProber`] that records its own concurrency high-water mark.
#[derive(Clone, Default)]
pub struct MockProber {
    pub scripts: HashMap<Address, ProbeScript>,
    pub delays: HashMap<Address, Duration>,
    pub in_flight: Arc<AtomicUsize>,
    pub max_in_flight: Arc<AtomicUsize>,
}

impl MockProber {
    pub fn token(mut self, contract: Address, symbol: &'static str, balance: &'static str) -> Self {
        self.scripts.insert(contract, ProbeScript::Token { symbol, balance });
        self
    }

    pub fn reverting(mut self, contract: Address) -> Self {
        self.scripts.insert(contract, ProbeScript::Revert);
        self
    }

    pub fn delayed(mut self, contract: Address, delay: Duration) -> Self {
        self.delays.insert(contract, delay);
        self
    }
}

fn reverted(method: &'static str) -> ProbeFailure {
    ProbeFailure::Call {
        method,
        source: alloy::contract::Error::TransportError(RpcError::local_usage_str(
            "execution reverted",
        )),
    }
}

#[async_trait]
impl TokenProber for MockProber {
    async fn probe(
        &self,
        contract: Address,
        _owner: Address,
    ) -> Result<TokenMetadata, ProbeFailure> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        if let Some(delay) = self.delays.get(&contract) {
            tokio::time::sleep(*delay).await;
        }

        let outcome = match self.scripts.get(&contract) {
            Some(ProbeScript::Token { symbol, balance }) => Ok(TokenMetadata {
                symbol: (*symbol).to_owned(),
                name: format!("{symbol} Token"),
                balance: (*balance).to_owned(),
            }),
            Some(ProbeScript::Revert) | None => Err(reverted("symbol")),
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        outcome
    }
}

/// Icon resolver that never finds an icon.
#[derive(Clone, Copy, Default)]
pub struct NoIcons;

#[async_trait]
impl IconResolver for NoIcons {
    async fn resolve(&self, _contract: Address) -> Option<String> {
        None
    }
}

/// Proxy registry answering with a fixed delegate.
#[derive(Clone, Copy, Default)]
pub struct StaticProxy(pub Option<Address>);

#[async_trait]
impl ProxyRegistry for StaticProxy {
    async fn delegate_for(&self, _owner: Address) -> Option<Address> {
        self.0
    }
}

pub type MockScanner = TokenScanner<MockChain, MockProber, NoIcons, StaticProxy>;

pub fn scanner_with(chain: MockChain, prober: MockProber) -> MockScanner {
    TokenScannerBuilder::new(chain, prober, NoIcons, StaticProxy(None))
        .build()
        .expect("valid default configuration")
}
