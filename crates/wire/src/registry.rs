//! Static layout registry for every Burr record and instruction payload.
//!
//! Pure data: each descriptor is constructed once behind a `OnceLock`,
//! validated, and shared for the life of the process. An inconsistent
//! descriptor is a bug in this file and trips immediately on first use,
//! before any caller data is touched.
//!
//! Offsets and widths here are the wire contract with the on-chain Burr
//! program. They match it bit for bit and are never renumbered.

use std::sync::OnceLock;

use crate::layout::{Field, FieldKind, Layout, Magic, Version};

// ---------------------------------------------------------------------------
// Wire constants
// ---------------------------------------------------------------------------

/// Eight-byte magic stamped at offset 0 of every Burr program account.
pub const RECORD_MAGIC: [u8; 8] = *b"BURRGRND";

/// Record version this build writes.
pub const RECORD_VERSION: u8 = 1;

/// Record versions this build accepts on decode.
pub const SUPPORTED_VERSIONS: &[u8] = &[1];

/// Fixed-point scale shared by every price and quantity field: six implied
/// decimal digits. Applied identically on encode and decode.
pub const PRICE_SCALE: u64 = 1_000_000;

/// Member slots in a committee record. Slots past `member_count` are zero.
pub const MAX_COMMITTEE_MEMBERS: usize = 16;

/// Split slots in a cross-match payload. Slots past `split_count` are zero.
pub const MAX_ORDER_SPLITS: usize = 4;

/// Highest fee the market params record may carry, in basis points.
pub const MAX_FEE_BPS: u16 = 10_000;

pub const PRICE_RECORD_LEN: usize = 48;
pub const MARKET_PARAMS_LEN: usize = 128;
pub const COMMITTEE_RECORD_LEN: usize = 528;

pub const INIT_MARKET_PAYLOAD_LEN: usize = 111;
pub const DEPOSIT_PAYLOAD_LEN: usize = 9;
pub const WITHDRAW_PAYLOAD_LEN: usize = 9;
pub const RESERVE_PAYLOAD_LEN: usize = 11;
pub const RELEASE_PAYLOAD_LEN: usize = 11;
pub const CROSS_MATCH_PAYLOAD_LEN: usize = 85;
pub const LIQUIDATE_PAYLOAD_LEN: usize = 33;
pub const UPDATE_PRICE_PAYLOAD_LEN: usize = 25;

fn record_magic() -> Magic {
    Magic {
        offset: 0,
        bytes: RECORD_MAGIC,
    }
}

fn record_version() -> Version {
    Version {
        offset: 8,
        current: RECORD_VERSION,
        supported: SUPPORTED_VERSIONS,
    }
}

// ---------------------------------------------------------------------------
// Account records
// ---------------------------------------------------------------------------

/// Oracle price account: the market's current index price snapshot.
pub fn price_record() -> &'static Layout {
    static LAYOUT: OnceLock<Layout> = OnceLock::new();
    LAYOUT.get_or_init(|| {
        Layout::new(
            "PriceRecord",
            PRICE_RECORD_LEN,
            Some(record_magic()),
            Some(record_version()),
            vec![
                Field::new("halted", 9, FieldKind::Bool),
                Field::new("price_e6", 16, FieldKind::U64),
                Field::new("conf_e6", 24, FieldKind::U64),
                Field::new("publish_time", 32, FieldKind::I64),
                Field::new("slot", 40, FieldKind::U64),
            ],
        )
        .expect("price record layout is internally inconsistent")
    })
}

/// Market registry account: per-market parameters and authorities.
pub fn market_params() -> &'static Layout {
    static LAYOUT: OnceLock<Layout> = OnceLock::new();
    LAYOUT.get_or_init(|| {
        Layout::new(
            "MarketParamsRecord",
            MARKET_PARAMS_LEN,
            Some(record_magic()),
            Some(record_version()),
            vec![
                Field::new("bump", 9, FieldKind::U8),
                Field::new("paused", 10, FieldKind::Bool),
                Field::new("authority", 16, FieldKind::Bytes(32)),
                Field::new("collateral_mint", 48, FieldKind::Bytes(32)),
                Field::new("price_feed", 80, FieldKind::Bytes(32)),
                Field::new("fee_bps", 112, FieldKind::U16),
                Field::new("unit_scale", 116, FieldKind::U32),
                Field::new("min_order_units", 120, FieldKind::U64),
            ],
        )
        .expect("market params layout is internally inconsistent")
    })
}

/// Committee account: member list plus execution threshold.
pub fn committee_record() -> &'static Layout {
    static LAYOUT: OnceLock<Layout> = OnceLock::new();
    LAYOUT.get_or_init(|| {
        Layout::new(
            "CommitteeRecord",
            COMMITTEE_RECORD_LEN,
            Some(record_magic()),
            Some(record_version()),
            vec![
                Field::new("threshold", 9, FieldKind::U8),
                Field::new("member_count", 10, FieldKind::U8),
                Field::new("bump", 11, FieldKind::U8),
                Field::new("members", 16, FieldKind::Bytes(32 * MAX_COMMITTEE_MEMBERS)),
            ],
        )
        .expect("committee record layout is internally inconsistent")
    })
}

// ---------------------------------------------------------------------------
// Instruction payloads
// ---------------------------------------------------------------------------
// Payloads carry no magic or version: the discriminator byte at offset 0 is
// the selector, and its numeric value per operation is frozen.

pub fn init_market_payload() -> &'static Layout {
    static LAYOUT: OnceLock<Layout> = OnceLock::new();
    LAYOUT.get_or_init(|| {
        Layout::new(
            "InitMarketPayload",
            INIT_MARKET_PAYLOAD_LEN,
            None,
            None,
            vec![
                Field::new("discriminator", 0, FieldKind::U8),
                Field::new("authority", 1, FieldKind::Bytes(32)),
                Field::new("collateral_mint", 33, FieldKind::Bytes(32)),
                Field::new("price_feed", 65, FieldKind::Bytes(32)),
                Field::new("fee_bps", 97, FieldKind::U16),
                Field::new("unit_scale", 99, FieldKind::U32),
                Field::new("min_order_units", 103, FieldKind::U64),
            ],
        )
        .expect("init-market payload layout is internally inconsistent")
    })
}

pub fn deposit_payload() -> &'static Layout {
    static LAYOUT: OnceLock<Layout> = OnceLock::new();
    LAYOUT.get_or_init(|| {
        Layout::new(
            "DepositPayload",
            DEPOSIT_PAYLOAD_LEN,
            None,
            None,
            vec![
                Field::new("discriminator", 0, FieldKind::U8),
                Field::new("amount_e6", 1, FieldKind::U64),
            ],
        )
        .expect("deposit payload layout is internally inconsistent")
    })
}

pub fn withdraw_payload() -> &'static Layout {
    static LAYOUT: OnceLock<Layout> = OnceLock::new();
    LAYOUT.get_or_init(|| {
        Layout::new(
            "WithdrawPayload",
            WITHDRAW_PAYLOAD_LEN,
            None,
            None,
            vec![
                Field::new("discriminator", 0, FieldKind::U8),
                Field::new("amount_e6", 1, FieldKind::U64),
            ],
        )
        .expect("withdraw payload layout is internally inconsistent")
    })
}

pub fn reserve_payload() -> &'static Layout {
    static LAYOUT: OnceLock<Layout> = OnceLock::new();
    LAYOUT.get_or_init(|| {
        Layout::new(
            "ReservePayload",
            RESERVE_PAYLOAD_LEN,
            None,
            None,
            vec![
                Field::new("discriminator", 0, FieldKind::U8),
                Field::new("context_id", 1, FieldKind::U16),
                Field::new("amount_e6", 3, FieldKind::U64),
            ],
        )
        .expect("reserve payload layout is internally inconsistent")
    })
}

pub fn release_payload() -> &'static Layout {
    static LAYOUT: OnceLock<Layout> = OnceLock::new();
    LAYOUT.get_or_init(|| {
        Layout::new(
            "ReleasePayload",
            RELEASE_PAYLOAD_LEN,
            None,
            None,
            vec![
                Field::new("discriminator", 0, FieldKind::U8),
                Field::new("context_id", 1, FieldKind::U16),
                Field::new("amount_e6", 3, FieldKind::U64),
            ],
        )
        .expect("release payload layout is internally inconsistent")
    })
}

pub fn cross_match_payload() -> &'static Layout {
    static LAYOUT: OnceLock<Layout> = OnceLock::new();
    LAYOUT.get_or_init(|| {
        Layout::new(
            "CrossMatchPayload",
            CROSS_MATCH_PAYLOAD_LEN,
            None,
            None,
            vec![
                Field::new("discriminator", 0, FieldKind::U8),
                Field::new("context_id", 1, FieldKind::U16),
                Field::new("side", 3, FieldKind::U8),
                Field::new("limit_price_e6", 4, FieldKind::U64),
                Field::new("quantity_e6", 12, FieldKind::U64),
                Field::new("split_count", 20, FieldKind::U8),
                Field::new("split0_price_e6", 21, FieldKind::U64),
                Field::new("split0_quantity_e6", 29, FieldKind::U64),
                Field::new("split1_price_e6", 37, FieldKind::U64),
                Field::new("split1_quantity_e6", 45, FieldKind::U64),
                Field::new("split2_price_e6", 53, FieldKind::U64),
                Field::new("split2_quantity_e6", 61, FieldKind::U64),
                Field::new("split3_price_e6", 69, FieldKind::U64),
                Field::new("split3_quantity_e6", 77, FieldKind::U64),
            ],
        )
        .expect("cross-match payload layout is internally inconsistent")
    })
}

pub fn liquidate_payload() -> &'static Layout {
    static LAYOUT: OnceLock<Layout> = OnceLock::new();
    LAYOUT.get_or_init(|| {
        Layout::new(
            "LiquidatePayload",
            LIQUIDATE_PAYLOAD_LEN,
            None,
            None,
            vec![
                Field::new("discriminator", 0, FieldKind::U8),
                Field::new("target", 1, FieldKind::Bytes(32)),
            ],
        )
        .expect("liquidate payload layout is internally inconsistent")
    })
}

pub fn update_price_payload() -> &'static Layout {
    static LAYOUT: OnceLock<Layout> = OnceLock::new();
    LAYOUT.get_or_init(|| {
        Layout::new(
            "UpdatePricePayload",
            UPDATE_PRICE_PAYLOAD_LEN,
            None,
            None,
            vec![
                Field::new("discriminator", 0, FieldKind::U8),
                Field::new("price_e6", 1, FieldKind::U64),
                Field::new("conf_e6", 9, FieldKind::U64),
                Field::new("publish_time", 17, FieldKind::I64),
            ],
        )
        .expect("update-price payload layout is internally inconsistent")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every registry entry must construct. A failure here is the
    /// fail-fast programming-error branch firing.
    #[test]
    fn all_layouts_construct() {
        for layout in [
            price_record(),
            market_params(),
            committee_record(),
            init_market_payload(),
            deposit_payload(),
            withdraw_payload(),
            reserve_payload(),
            release_payload(),
            cross_match_payload(),
            liquidate_payload(),
            update_price_payload(),
        ] {
            assert!(!layout.is_empty(), "{}", layout.name());
        }
    }

    #[test]
    fn declared_lengths_match_last_field() {
        assert_eq!(price_record().len(), PRICE_RECORD_LEN);
        assert_eq!(market_params().len(), MARKET_PARAMS_LEN);
        assert_eq!(committee_record().len(), COMMITTEE_RECORD_LEN);
        assert_eq!(cross_match_payload().len(), CROSS_MATCH_PAYLOAD_LEN);

        // The cross-match payload is fully packed: its last field ends at
        // the declared length.
        let last = cross_match_payload().fields().last().unwrap();
        assert_eq!(last.end(), CROSS_MATCH_PAYLOAD_LEN);
    }

    #[test]
    fn records_share_the_magic_and_version_offsets() {
        for layout in [price_record(), market_params(), committee_record()] {
            let magic = layout.magic().unwrap();
            assert_eq!(magic.offset, 0);
            assert_eq!(magic.bytes, RECORD_MAGIC);
            let version = layout.version().unwrap();
            assert_eq!(version.offset, 8);
            assert_eq!(version.current, RECORD_VERSION);
        }
    }

    #[test]
    fn payloads_have_no_magic() {
        for layout in [
            init_market_payload(),
            deposit_payload(),
            cross_match_payload(),
        ] {
            assert!(layout.magic().is_none());
            assert!(layout.version().is_none());
            assert_eq!(layout.fields()[0].name, "discriminator");
            assert_eq!(layout.fields()[0].offset, 0);
        }
    }

    #[test]
    fn committee_members_region_holds_sixteen_slots() {
        let members = committee_record()
            .fields()
            .iter()
            .find(|f| f.name == "members")
            .unwrap();
        assert_eq!(members.kind.width(), 32 * MAX_COMMITTEE_MEMBERS);
        assert_eq!(members.end(), COMMITTEE_RECORD_LEN);
    }
}
