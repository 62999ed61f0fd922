//! Token records, the assembled token list, and the display filter pipeline.

use std::cmp::Ordering;

use alloy::{primitives::Address, rpc::types::Log};

/// A validated token contract the account has interacted with, annotated with its
/// approval events.
///
/// Created only after a successful conformance probe; candidates whose probe fails
/// never produce a record.
#[derive(Debug, Clone)]
pub struct TokenRecord {
    pub contract_address: Address,
    pub symbol: String,
    pub name: String,
    /// Textual decimal rendering of the account's on-chain balance.
    pub balance: String,
    pub icon: Option<String>,
    /// Always `true` for this asset class today; kept for the registered-only display
    /// filter.
    pub registered: bool,
    /// Approval events emitted by this contract for the account, in log order.
    pub approvals: Vec<Log>,
    /// ApprovalForAll events emitted by this contract for the account, in log order.
    pub approvals_for_all: Vec<Log>,
}

/// Display filters applied to an assembled [`TokenList`].
///
/// The two predicates are AND-combined and never alter sort order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenListFilter {
    /// Keep only records with `registered == true`.
    pub registered_only: bool,
    /// Drop records whose balance is the textual zero value.
    pub non_zero_balance_only: bool,
}

impl TokenListFilter {
    #[must_use]
    pub fn matches(&self, record: &TokenRecord) -> bool {
        (!self.registered_only || record.registered)
            && (!self.non_zero_balance_only || record.balance != "0")
    }
}

/// The assembled scan result: token records sorted ascending by symbol, stable with
/// respect to candidate first-occurrence order on ties.
#[derive(Debug, Clone, Default)]
pub struct TokenList {
    records: Vec<TokenRecord>,
}

impl TokenList {
    /// Sorts successful probe outcomes into the final deterministic order.
    ///
    /// Each entry carries the candidate's first-occurrence index, making the sort key
    /// total: probe completion order has no effect on the result.
    pub(crate) fn assemble(mut entries: Vec<(usize, TokenRecord)>) -> Self {
        entries.sort_by(|(left_idx, left), (right_idx, right)| {
            symbol_order(&left.symbol, &right.symbol).then(left_idx.cmp(right_idx))
        });

        Self { records: entries.into_iter().map(|(_, record)| record).collect() }
    }

    #[must_use]
    pub fn records(&self) -> &[TokenRecord] {
        &self.records
    }

    /// Borrowed view of the list with display filters applied, preserving sort order.
    pub fn filtered(&self, filter: TokenListFilter) -> impl Iterator<Item = &TokenRecord> {
        self.records.iter().filter(move |record| filter.matches(record))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TokenRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a TokenList {
    type Item = &'a TokenRecord;
    type IntoIter = std::slice::Iter<'a, TokenRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Ascending symbol comparison: case-insensitive ASCII folding with a case-sensitive
/// tiebreak. Stands in for locale-aware collation while staying total and
/// deterministic.
fn symbol_order(left: &str, right: &str) -> Ordering {
    let folded = left
        .bytes()
        .map(|b| b.to_ascii_lowercase())
        .cmp(right.bytes().map(|b| b.to_ascii_lowercase()));
    folded.then_with(|| left.cmp(right))
}
