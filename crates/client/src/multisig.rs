//! Single-key vs committee authorization.
//!
//! A resource's controlling authority address either IS the permitted
//! signer, or it holds a committee record whose members may act. The
//! split is resolved once per read by attempting the committee decode;
//! anything that does not decode as a committee falls back to single-key.
//!
//! This layer reports membership only. Threshold satisfaction is enforced
//! by the program when a committee transaction executes; treating a
//! client-side membership check as sufficient authorization is a UI
//! convenience, never a security boundary.

use crate::accounts::{decode_committee, CommitteeRecord};
use crate::address::{format_address, Address};
use crate::error::ClientError;

/// How an authority address is governed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authority {
    /// A plain key: only that exact key passes.
    SingleKey(Address),
    /// A committee account: any listed member passes.
    Committee {
        address: Address,
        record: CommitteeRecord,
    },
}

impl Authority {
    /// Classify an authority from a point-in-time snapshot of its account
    /// bytes. `None` (account absent) or bytes that fail the committee
    /// decode both mean single-key — the explicit default branch, not an
    /// error path.
    ///
    /// Resolution is not cached: membership can change between reads, so
    /// callers doing repeated checks re-fetch and re-resolve.
    pub fn resolve(authority: Address, account_bytes: Option<&[u8]>) -> Authority {
        if let Some(bytes) = account_bytes {
            if let Ok(record) = decode_committee(bytes) {
                return Authority::Committee {
                    address: authority,
                    record,
                };
            }
        }
        Authority::SingleKey(authority)
    }

    /// The on-chain address this authority lives at.
    pub fn address(&self) -> &Address {
        match self {
            Authority::SingleKey(address) => address,
            Authority::Committee { address, .. } => address,
        }
    }

    pub fn is_committee(&self) -> bool {
        matches!(self, Authority::Committee { .. })
    }

    /// Whether `candidate` satisfies this authority: exact equality for a
    /// single key, membership for a committee. Threshold is deliberately
    /// ignored here.
    pub fn allows(&self, candidate: &Address) -> bool {
        match self {
            Authority::SingleKey(key) => key == candidate,
            Authority::Committee { record, .. } => {
                record.members.iter().any(|member| member == candidate)
            }
        }
    }

    /// [`Authority::allows`] as a `?`-friendly check. The error is
    /// informational — the program performs its own authoritative check
    /// on execution.
    pub fn ensure(&self, candidate: &Address) -> Result<(), ClientError> {
        if self.allows(candidate) {
            Ok(())
        } else {
            Err(ClientError::NotAuthorized {
                authority: format_address(self.address()),
                candidate: format_address(candidate),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::encode_committee;

    const KEY_A: Address = [0xA1u8; 32];
    const KEY_B: Address = [0xB2u8; 32];
    const KEY_C: Address = [0xC3u8; 32];
    const KEY_D: Address = [0xD4u8; 32];

    fn committee_bytes(threshold: u8) -> Vec<u8> {
        encode_committee(&CommitteeRecord {
            threshold,
            bump: 255,
            members: vec![KEY_A, KEY_B, KEY_C],
        })
        .unwrap()
    }

    #[test]
    fn absent_account_resolves_to_single_key() {
        let authority = Authority::resolve(KEY_A, None);
        assert_eq!(authority, Authority::SingleKey(KEY_A));
        assert!(!authority.is_committee());
    }

    #[test]
    fn non_committee_bytes_resolve_to_single_key() {
        let authority = Authority::resolve(KEY_A, Some(&[0u8; 64][..]));
        assert_eq!(authority, Authority::SingleKey(KEY_A));
    }

    #[test]
    fn single_key_allows_only_itself() {
        let authority = Authority::resolve(KEY_A, None);
        assert!(authority.allows(&KEY_A));
        assert!(!authority.allows(&KEY_B));
    }

    #[test]
    fn committee_allows_each_member_and_denies_outsiders() {
        let bytes = committee_bytes(2);
        let authority = Authority::resolve([0x99u8; 32], Some(&bytes[..]));
        assert!(authority.is_committee());
        for member in [KEY_A, KEY_B, KEY_C] {
            assert!(authority.allows(&member));
        }
        assert!(!authority.allows(&KEY_D));
    }

    #[test]
    fn membership_is_independent_of_threshold() {
        for threshold in 1..=3u8 {
            let bytes = committee_bytes(threshold);
            let authority = Authority::resolve([0x99u8; 32], Some(&bytes[..]));
            assert!(authority.allows(&KEY_B), "threshold {threshold}");
            assert!(!authority.allows(&KEY_D), "threshold {threshold}");
        }
    }

    #[test]
    fn committee_address_is_not_a_member_by_default() {
        // The committee account's own address grants nothing.
        let committee_addr = [0x99u8; 32];
        let bytes = committee_bytes(2);
        let authority = Authority::resolve(committee_addr, Some(&bytes[..]));
        assert!(!authority.allows(&committee_addr));
    }

    #[test]
    fn ensure_reports_both_parties() {
        let authority = Authority::resolve(KEY_A, None);
        assert!(authority.ensure(&KEY_A).is_ok());
        let err = authority.ensure(&KEY_B).unwrap_err();
        match err {
            ClientError::NotAuthorized {
                authority,
                candidate,
            } => {
                assert_eq!(authority, format_address(&KEY_A));
                assert_eq!(candidate, format_address(&KEY_B));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn corrupt_committee_record_degrades_to_single_key() {
        let mut bytes = committee_bytes(2);
        bytes[9] = 0; // invalid threshold
        let authority = Authority::resolve(KEY_A, Some(&bytes[..]));
        assert_eq!(authority, Authority::SingleKey(KEY_A));
    }
}
