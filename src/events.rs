//! Event signatures and topic filter construction for the three scanned event kinds.
//!
//! Topic layout follows the ERC-721 wire encoding: topic 0 is the keccak-256 hash of the
//! canonical event signature, and indexed address parameters are 32-byte words with the
//! 20-byte address right-aligned (left-zero-padded).

use alloy::{
    primitives::{Address, B256},
    rpc::types::Filter,
    sol,
    sol_types::SolEvent,
};

use crate::ScanError;

sol! {
    #[derive(Debug)]
    event Approval(address indexed owner, address indexed approved, uint256 indexed tokenId);

    #[derive(Debug)]
    event ApprovalForAll(address indexed owner, address indexed operator, bool approved);

    #[derive(Debug)]
    event Transfer(address indexed from, address indexed to, uint256 indexed tokenId);
}

/// The three event kinds whose logs feed candidate discovery.
///
/// Kept in the fixed merge order used by the pipeline: `Approval`, `ApprovalForAll`,
/// `Transfer`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EventKind {
    Approval,
    ApprovalForAll,
    Transfer,
}

impl EventKind {
    /// keccak-256 of the canonical event signature, used as topic 0.
    #[must_use]
    pub const fn signature_hash(self) -> B256 {
        match self {
            EventKind::Approval => Approval::SIGNATURE_HASH,
            EventKind::ApprovalForAll => ApprovalForAll::SIGNATURE_HASH,
            EventKind::Transfer => Transfer::SIGNATURE_HASH,
        }
    }

    /// Builds the topic filter matching events of this kind that concern `account`.
    ///
    /// For `Approval` and `ApprovalForAll` the account is the indexed owner (topic 1).
    /// For `Transfer` the account is the indexed recipient (topic 2), with the sender
    /// topic wildcarded.
    #[must_use]
    pub fn account_filter(self, account: Address) -> Filter {
        let account_word: B256 = account.into_word();
        let filter = Filter::new().event_signature(self.signature_hash());

        match self {
            EventKind::Approval | EventKind::ApprovalForAll => filter.topic1(account_word),
            EventKind::Transfer => filter.topic2(account_word),
        }
    }
}

/// Parses and validates an account address supplied by the caller.
///
/// Uniform-case inputs (all-lowercase or all-uppercase hex) are accepted as-is;
/// mixed-case inputs must carry a valid EIP-55 checksum. Validation happens before any
/// network access.
///
/// # Errors
///
/// Returns [`ScanError::InvalidAddress`] if the input is not 20 bytes of hex or fails
/// the checksum.
pub fn parse_account(input: &str) -> Result<Address, ScanError> {
    let invalid = || ScanError::InvalidAddress(input.to_owned());

    let trimmed = input.trim();
    let hex = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    if hex.len() != 40 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let has_upper = hex.bytes().any(|b| b.is_ascii_uppercase());
    let has_lower = hex.bytes().any(|b| b.is_ascii_lowercase());
    if has_upper && has_lower {
        Address::parse_checksummed(format!("0x{hex}"), None).map_err(|_| invalid())
    } else {
        hex.parse().map_err(|_| invalid())
    }
}

#[cfg(test)]
mod tests {
    use alloy::primitives::{address, keccak256};

    use super::*;

    const OWNER: Address = address!("0xd8dA6BF26964af9d7eed9e03e53415d37aa96045");

    #[test]
    fn signature_hashes_match_canonical_signatures() {
        assert_eq!(
            EventKind::Approval.signature_hash(),
            keccak256("Approval(address,address,uint256)")
        );
        assert_eq!(
            EventKind::ApprovalForAll.signature_hash(),
            keccak256("ApprovalForAll(address,address,bool)")
        );
        assert_eq!(
            EventKind::Transfer.signature_hash(),
            keccak256("Transfer(address,address,uint256)")
        );
    }

    #[test]
    fn approval_filters_place_account_in_topic_1() {
        for kind in [EventKind::Approval, EventKind::ApprovalForAll] {
            let filter = kind.account_filter(OWNER);

            assert!(filter.topics[0].matches(&kind.signature_hash()));
            assert!(filter.topics[1].matches(&OWNER.into_word()));
            assert!(filter.topics[2].is_empty());
        }
    }

    #[test]
    fn transfer_filter_wildcards_sender_and_places_account_in_topic_2() {
        let filter = EventKind::Transfer.account_filter(OWNER);

        assert!(filter.topics[0].matches(&EventKind::Transfer.signature_hash()));
        assert!(filter.topics[1].is_empty());
        assert!(filter.topics[2].matches(&OWNER.into_word()));
    }

    #[test]
    fn account_topic_is_left_zero_padded() {
        let word = OWNER.into_word();

        assert_eq!(&word[..12], &[0u8; 12]);
        assert_eq!(&word[12..], OWNER.as_slice());
    }

    #[test]
    fn parse_account_accepts_lowercase() {
        let parsed = parse_account("0xd8da6bf26964af9d7eed9e03e53415d37aa96045").unwrap();
        assert_eq!(parsed, OWNER);
    }

    #[test]
    fn parse_account_accepts_valid_checksum() {
        let parsed = parse_account("0xd8dA6BF26964af9d7eed9e03e53415d37aa96045").unwrap();
        assert_eq!(parsed, OWNER);
    }

    #[test]
    fn parse_account_accepts_missing_prefix() {
        let parsed = parse_account("d8da6bf26964af9d7eed9e03e53415d37aa96045").unwrap();
        assert_eq!(parsed, OWNER);
    }

    #[test]
    fn parse_account_rejects_bad_checksum() {
        // Same address with two case flips.
        let result = parse_account("0xD8dA6BF26964af9d7eed9e03e53415d37aa96045");
        assert!(matches!(result, Err(ScanError::InvalidAddress(_))));
    }

    #[test]
    fn parse_account_rejects_wrong_length() {
        assert!(matches!(parse_account("0x1234"), Err(ScanError::InvalidAddress(_))));
        assert!(matches!(
            parse_account("0xd8da6bf26964af9d7eed9e03e53415d37aa9604512"),
            Err(ScanError::InvalidAddress(_))
        ));
    }

    #[test]
    fn parse_account_rejects_non_hex() {
        let result = parse_account("0xzzda6bf26964af9d7eed9e03e53415d37aa96045");
        assert!(matches!(result, Err(ScanError::InvalidAddress(_))));
    }
}
