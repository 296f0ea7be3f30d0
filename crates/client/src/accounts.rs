//! Decoders for Burr program accounts.
//!
//! Account bytes come from an untrusted remote store: a buggy or
//! malicious deployment can return anything. Every decoder here returns a
//! typed [`WireError`] for malformed input and never a partially
//! populated record. Encoders for the same records exist for fixtures and
//! local mocks; on a live deployment only the program writes them.

use burr_wire::{registry, Reader, WireError, Writer};

use crate::address::Address;

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// Snapshot of a market's oracle price account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceRecord {
    pub halted: bool,
    pub price_e6: u64,
    pub conf_e6: u64,
    pub publish_time: i64,
    pub slot: u64,
}

/// A market's registry parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarketParamsRecord {
    pub bump: u8,
    pub paused: bool,
    pub authority: Address,
    pub collateral_mint: Address,
    pub price_feed: Address,
    pub fee_bps: u16,
    pub unit_scale: u32,
    pub min_order_units: u64,
}

/// A committee account: member identities plus execution threshold.
///
/// A point-in-time snapshot — membership can change between reads, and
/// there is no staleness guarantee beyond "accurate as of the read".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitteeRecord {
    pub threshold: u8,
    pub bump: u8,
    pub members: Vec<Address>,
}

// ---------------------------------------------------------------------------
// Decoders
// ---------------------------------------------------------------------------

pub fn decode_price(bytes: &[u8]) -> Result<PriceRecord, WireError> {
    let mut r = Reader::new(registry::price_record(), bytes)?;
    Ok(PriceRecord {
        halted: r.get_bool("halted")?,
        price_e6: r.get_u64("price_e6")?,
        conf_e6: r.get_u64("conf_e6")?,
        publish_time: r.get_i64("publish_time")?,
        slot: r.get_u64("slot")?,
    })
}

pub fn decode_market_params(bytes: &[u8]) -> Result<MarketParamsRecord, WireError> {
    let mut r = Reader::new(registry::market_params(), bytes)?;
    let record = MarketParamsRecord {
        bump: r.get_u8("bump")?,
        paused: r.get_bool("paused")?,
        authority: r.get_array("authority")?,
        collateral_mint: r.get_array("collateral_mint")?,
        price_feed: r.get_array("price_feed")?,
        fee_bps: r.get_u16("fee_bps")?,
        unit_scale: r.get_u32("unit_scale")?,
        min_order_units: r.get_u64("min_order_units")?,
    };
    if record.fee_bps > registry::MAX_FEE_BPS {
        return Err(WireError::FieldOutOfRange {
            layout: "MarketParamsRecord",
            field: "fee_bps",
            detail: format!("{} exceeds {}", record.fee_bps, registry::MAX_FEE_BPS),
        });
    }
    Ok(record)
}

pub fn decode_committee(bytes: &[u8]) -> Result<CommitteeRecord, WireError> {
    let mut r = Reader::new(registry::committee_record(), bytes)?;
    let threshold = r.get_u8("threshold")?;
    let member_count = r.get_u8("member_count")? as usize;
    let bump = r.get_u8("bump")?;
    let member_bytes = r.get_bytes("members")?;

    if member_count > registry::MAX_COMMITTEE_MEMBERS {
        return Err(WireError::FieldOutOfRange {
            layout: "CommitteeRecord",
            field: "member_count",
            detail: format!(
                "{member_count} exceeds {}",
                registry::MAX_COMMITTEE_MEMBERS
            ),
        });
    }
    if threshold == 0 || threshold as usize > member_count {
        return Err(WireError::FieldOutOfRange {
            layout: "CommitteeRecord",
            field: "threshold",
            detail: format!("threshold {threshold} outside 1..={member_count}"),
        });
    }

    let mut members = Vec::with_capacity(member_count);
    for i in 0..member_count {
        let mut member = [0u8; 32];
        member.copy_from_slice(&member_bytes[i * 32..(i + 1) * 32]);
        members.push(member);
    }

    Ok(CommitteeRecord {
        threshold,
        bump,
        members,
    })
}

// ---------------------------------------------------------------------------
// Encoders (fixtures and local mocks)
// ---------------------------------------------------------------------------

pub fn encode_price(record: &PriceRecord) -> Result<Vec<u8>, WireError> {
    let mut w = Writer::new(registry::price_record());
    w.put_bool("halted", record.halted)?;
    w.put_u64("price_e6", record.price_e6)?;
    w.put_u64("conf_e6", record.conf_e6)?;
    w.put_i64("publish_time", record.publish_time)?;
    w.put_u64("slot", record.slot)?;
    w.finish()
}

pub fn encode_market_params(record: &MarketParamsRecord) -> Result<Vec<u8>, WireError> {
    let mut w = Writer::new(registry::market_params());
    w.put_u8("bump", record.bump)?;
    w.put_bool("paused", record.paused)?;
    w.put_bytes("authority", &record.authority)?;
    w.put_bytes("collateral_mint", &record.collateral_mint)?;
    w.put_bytes("price_feed", &record.price_feed)?;
    w.put_u16("fee_bps", record.fee_bps)?;
    w.put_u32("unit_scale", record.unit_scale)?;
    w.put_u64("min_order_units", record.min_order_units)?;
    w.finish()
}

pub fn encode_committee(record: &CommitteeRecord) -> Result<Vec<u8>, WireError> {
    let mut w = Writer::new(registry::committee_record());
    w.put_u8("threshold", record.threshold)?;
    w.put_u8("member_count", record.members.len() as u8)?;
    w.put_u8("bump", record.bump)?;
    let mut member_bytes = Vec::with_capacity(record.members.len() * 32);
    for member in &record.members {
        member_bytes.extend_from_slice(member);
    }
    // put_bytes zero-pads the unused trailing slots.
    w.put_bytes("members", &member_bytes)?;
    w.finish()
}

// ---------------------------------------------------------------------------
// Batch decoding
// ---------------------------------------------------------------------------

/// Result of decoding a batch of accounts of one kind.
///
/// Failures are isolated per item: a bad record lands in `errors` with
/// its address and reason, and never removes or corrupts its siblings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchDecode<T> {
    pub records: Vec<(Address, T)>,
    pub errors: Vec<(Address, WireError)>,
}

/// Decode a collection of `(address, bytes)` pairs independently.
///
/// `expected_len` pre-filters obviously wrong blobs: anything with a
/// different byte length is recorded as `TooShort` without running the
/// decoder. Each remaining item decodes on its own.
pub fn decode_batch<T, F>(
    accounts: &[(Address, Vec<u8>)],
    expected_len: usize,
    decode: F,
) -> BatchDecode<T>
where
    F: Fn(&[u8]) -> Result<T, WireError>,
{
    let mut out = BatchDecode {
        records: Vec::new(),
        errors: Vec::new(),
    };
    for (address, bytes) in accounts {
        if bytes.len() != expected_len {
            out.errors.push((
                *address,
                WireError::TooShort {
                    layout: "batch",
                    need: expected_len,
                    got: bytes.len(),
                },
            ));
            continue;
        }
        match decode(bytes) {
            Ok(record) => out.records.push((*address, record)),
            Err(err) => out.errors.push((*address, err)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use burr_wire::registry::{COMMITTEE_RECORD_LEN, MARKET_PARAMS_LEN, PRICE_RECORD_LEN};

    fn price_fixture() -> PriceRecord {
        PriceRecord {
            halted: false,
            price_e6: 42_000_000,
            conf_e6: 12_500,
            publish_time: 1_700_000_000,
            slot: 250_000_000,
        }
    }

    fn market_fixture() -> MarketParamsRecord {
        MarketParamsRecord {
            bump: 254,
            paused: false,
            authority: [1u8; 32],
            collateral_mint: [2u8; 32],
            price_feed: [3u8; 32],
            fee_bps: 30,
            unit_scale: 1_000,
            min_order_units: 10,
        }
    }

    fn committee_fixture() -> CommitteeRecord {
        CommitteeRecord {
            threshold: 2,
            bump: 255,
            members: vec![[0xAAu8; 32], [0xBBu8; 32], [0xCCu8; 32]],
        }
    }

    #[test]
    fn price_round_trip() {
        let record = price_fixture();
        let bytes = encode_price(&record).unwrap();
        assert_eq!(bytes.len(), PRICE_RECORD_LEN);
        assert_eq!(decode_price(&bytes).unwrap(), record);
    }

    #[test]
    fn market_params_round_trip() {
        let record = market_fixture();
        let bytes = encode_market_params(&record).unwrap();
        assert_eq!(bytes.len(), MARKET_PARAMS_LEN);
        assert_eq!(decode_market_params(&bytes).unwrap(), record);
    }

    #[test]
    fn committee_round_trip() {
        let record = committee_fixture();
        let bytes = encode_committee(&record).unwrap();
        assert_eq!(bytes.len(), COMMITTEE_RECORD_LEN);
        assert_eq!(decode_committee(&bytes).unwrap(), record);
    }

    #[test]
    fn flipped_magic_rejects_whole_record() {
        let mut bytes = encode_price(&price_fixture()).unwrap();
        bytes[3] ^= 0x01;
        let err = decode_price(&bytes).unwrap_err();
        assert!(matches!(err, WireError::BadMagic { .. }));
    }

    #[test]
    fn unsupported_version_rejected() {
        let mut bytes = encode_committee(&committee_fixture()).unwrap();
        bytes[8] = 99;
        let err = decode_committee(&bytes).unwrap_err();
        assert_eq!(
            err,
            WireError::UnsupportedVersion {
                layout: "CommitteeRecord",
                version: 99
            }
        );
    }

    #[test]
    fn short_buffer_rejected() {
        let bytes = encode_price(&price_fixture()).unwrap();
        let err = decode_price(&bytes[..20]).unwrap_err();
        assert_eq!(
            err,
            WireError::TooShort {
                layout: "PriceRecord",
                need: PRICE_RECORD_LEN,
                got: 20
            }
        );
    }

    #[test]
    fn excessive_fee_bps_rejected() {
        let mut record = market_fixture();
        record.fee_bps = 10_001;
        let bytes = encode_market_params(&record).unwrap();
        let err = decode_market_params(&bytes).unwrap_err();
        assert!(matches!(
            err,
            WireError::FieldOutOfRange { field: "fee_bps", .. }
        ));
    }

    #[test]
    fn committee_zero_threshold_rejected() {
        let mut bytes = encode_committee(&committee_fixture()).unwrap();
        bytes[9] = 0;
        let err = decode_committee(&bytes).unwrap_err();
        assert!(matches!(
            err,
            WireError::FieldOutOfRange {
                field: "threshold",
                ..
            }
        ));
    }

    #[test]
    fn committee_threshold_above_member_count_rejected() {
        let mut bytes = encode_committee(&committee_fixture()).unwrap();
        bytes[9] = 4; // three members
        let err = decode_committee(&bytes).unwrap_err();
        assert!(matches!(
            err,
            WireError::FieldOutOfRange {
                field: "threshold",
                ..
            }
        ));
    }

    #[test]
    fn committee_member_count_over_capacity_rejected() {
        let mut bytes = encode_committee(&committee_fixture()).unwrap();
        bytes[10] = 17;
        let err = decode_committee(&bytes).unwrap_err();
        assert!(matches!(
            err,
            WireError::FieldOutOfRange {
                field: "member_count",
                ..
            }
        ));
    }

    #[test]
    fn batch_decode_isolates_the_bad_record() {
        let good = encode_price(&price_fixture()).unwrap();
        let mut corrupted = good.clone();
        corrupted[0] ^= 0xFF; // break the magic

        let accounts = vec![
            ([1u8; 32], good.clone()),
            ([2u8; 32], corrupted),
            ([3u8; 32], good),
        ];
        let out = decode_batch(&accounts, PRICE_RECORD_LEN, decode_price);

        assert_eq!(out.records.len(), 2);
        assert_eq!(out.records[0].0, [1u8; 32]);
        assert_eq!(out.records[1].0, [3u8; 32]);
        assert_eq!(out.records[0].1, price_fixture());

        assert_eq!(out.errors.len(), 1);
        assert_eq!(out.errors[0].0, [2u8; 32]);
        assert!(matches!(out.errors[0].1, WireError::BadMagic { .. }));
    }

    #[test]
    fn batch_decode_length_filter() {
        let good = encode_price(&price_fixture()).unwrap();
        let accounts = vec![([1u8; 32], good), ([2u8; 32], vec![0u8; 5])];
        let out = decode_batch(&accounts, PRICE_RECORD_LEN, decode_price);
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.errors.len(), 1);
        assert!(matches!(out.errors[0].1, WireError::TooShort { .. }));
    }
}
