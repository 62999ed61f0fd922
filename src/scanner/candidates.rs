//! Merging the three event streams and extracting unique candidate contracts.

use std::collections::HashSet;

use alloy::{primitives::Address, rpc::types::Log};

/// Extracts the unique set of contract addresses from the merged event streams,
/// preserving first-occurrence order.
///
/// The streams must be supplied in the fixed merge order (Approval, ApprovalForAll,
/// Transfer) so candidate ordering is deterministic. Addresses decoded from logs are
/// 20-byte values, so equality is already case-normalized.
pub(crate) fn unique_contracts<'a>(
    streams: impl IntoIterator<Item = &'a [Log]>,
) -> Vec<Address> {
    let mut seen = HashSet::new();
    let mut candidates = Vec::new();

    for log in streams.into_iter().flatten() {
        let address = log.address();
        if seen.insert(address) {
            candidates.push(address);
        }
    }

    candidates
}
