//! Instruction builders for every Burr operation.
//!
//! A builder turns a logical operation into the exact positional account
//! list and byte payload the on-chain program expects. The program
//! indexes accounts by position, not by name, so the order and the
//! signer/writable flags here are part of the wire contract. Builders are
//! pure: no network, no mutation of caller parameters, identical inputs
//! always produce identical instructions.

use burr_wire::{registry, Reader, WireError, Writer};

use crate::address::Address;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::pda::{
    margin_address, market_address, price_address, reservation_address, vault_address,
};

// ---------------------------------------------------------------------------
// Instruction data structures
// ---------------------------------------------------------------------------

/// A single account reference, tagged with the roles the program expects
/// at that position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountMeta {
    pub address: Address,
    pub is_signer: bool,
    pub is_writable: bool,
}

impl AccountMeta {
    pub fn writable_signer(address: Address) -> Self {
        AccountMeta {
            address,
            is_signer: true,
            is_writable: true,
        }
    }

    pub fn readonly_signer(address: Address) -> Self {
        AccountMeta {
            address,
            is_signer: true,
            is_writable: false,
        }
    }

    pub fn writable(address: Address) -> Self {
        AccountMeta {
            address,
            is_signer: false,
            is_writable: true,
        }
    }

    pub fn readonly(address: Address) -> Self {
        AccountMeta {
            address,
            is_signer: false,
            is_writable: false,
        }
    }
}

/// A built instruction: positional account references plus an opaque
/// payload whose first byte selects the operation. Immutable once built;
/// the transport collaborator submits it unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub program_id: Address,
    pub accounts: Vec<AccountMeta>,
    pub data: Vec<u8>,
}

/// Operation discriminators.
///
/// Values are stable forever: the program keys dispatch on this exact
/// byte and deployed payloads never get renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Op {
    InitMarket = 0,
    Deposit = 1,
    Withdraw = 2,
    Reserve = 3,
    Release = 4,
    CrossMatch = 5,
    Liquidate = 6,
    UpdatePrice = 7,
}

impl Op {
    pub const fn discriminator(self) -> u8 {
        self as u8
    }

    pub fn from_discriminator(byte: u8) -> Option<Op> {
        match byte {
            0 => Some(Op::InitMarket),
            1 => Some(Op::Deposit),
            2 => Some(Op::Withdraw),
            3 => Some(Op::Reserve),
            4 => Some(Op::Release),
            5 => Some(Op::CrossMatch),
            6 => Some(Op::Liquidate),
            7 => Some(Op::UpdatePrice),
            _ => None,
        }
    }
}

/// Order side for a cross-match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Side {
    Bid = 0,
    Ask = 1,
}

impl Side {
    fn from_byte(byte: u8, layout: &'static str) -> Result<Side, WireError> {
        match byte {
            0 => Ok(Side::Bid),
            1 => Ok(Side::Ask),
            other => Err(WireError::FieldOutOfRange {
                layout,
                field: "side",
                detail: format!("side byte is {other}"),
            }),
        }
    }
}

/// One maker fill inside a cross-match. Prices and quantities are
/// six-decimal fixed point like everything else on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderSplit {
    pub price_e6: u64,
    pub quantity_e6: u64,
}

/// Parameters for [`build_init_market`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitMarketParams {
    pub authority: Address,
    pub collateral_mint: Address,
    pub price_feed: Address,
    pub fee_bps: u16,
    pub unit_scale: u32,
    pub min_order_units: u64,
}

/// Parameters for [`build_cross_match`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossMatchParams {
    pub context_id: u16,
    pub side: Side,
    pub limit_price_e6: u64,
    pub quantity_e6: u64,
    /// Maker fills, at most [`registry::MAX_ORDER_SPLITS`]. Unused slots
    /// are serialized as zeroes.
    pub splits: Vec<OrderSplit>,
}

// Field names for the four fixed split slots, in wire order.
const SPLIT_PRICE_FIELDS: [&str; registry::MAX_ORDER_SPLITS] = [
    "split0_price_e6",
    "split1_price_e6",
    "split2_price_e6",
    "split3_price_e6",
];
const SPLIT_QUANTITY_FIELDS: [&str; registry::MAX_ORDER_SPLITS] = [
    "split0_quantity_e6",
    "split1_quantity_e6",
    "split2_quantity_e6",
    "split3_quantity_e6",
];

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Create a new market for `params.collateral_mint`.
///
/// Accounts: payer (signer, writable), market PDA (writable), vault PDA
/// (writable).
pub fn build_init_market(
    config: &ClientConfig,
    payer: &Address,
    params: &InitMarketParams,
) -> Result<Instruction, ClientError> {
    if params.fee_bps > registry::MAX_FEE_BPS {
        return Err(WireError::FieldOutOfRange {
            layout: "InitMarketPayload",
            field: "fee_bps",
            detail: format!("{} exceeds {}", params.fee_bps, registry::MAX_FEE_BPS),
        }
        .into());
    }

    let (market, _) = market_address(&config.program_id, &params.collateral_mint)?;
    let (vault, _) = vault_address(&config.program_id, &market)?;

    let mut w = Writer::new(registry::init_market_payload());
    w.put_u8("discriminator", Op::InitMarket.discriminator())?;
    w.put_bytes("authority", &params.authority)?;
    w.put_bytes("collateral_mint", &params.collateral_mint)?;
    w.put_bytes("price_feed", &params.price_feed)?;
    w.put_u16("fee_bps", params.fee_bps)?;
    w.put_u32("unit_scale", params.unit_scale)?;
    w.put_u64("min_order_units", params.min_order_units)?;

    Ok(Instruction {
        program_id: config.program_id,
        accounts: vec![
            AccountMeta::writable_signer(*payer),
            AccountMeta::writable(market),
            AccountMeta::writable(vault),
        ],
        data: w.finish()?,
    })
}

/// Deposit collateral into the caller's margin account.
///
/// Accounts: user (signer, writable), market (writable), margin PDA
/// (writable), vault PDA (writable).
pub fn build_deposit(
    config: &ClientConfig,
    user: &Address,
    market: &Address,
    amount_e6: u64,
) -> Result<Instruction, ClientError> {
    let (margin, _) = margin_address(&config.program_id, market, user)?;
    let (vault, _) = vault_address(&config.program_id, market)?;

    let mut w = Writer::new(registry::deposit_payload());
    w.put_u8("discriminator", Op::Deposit.discriminator())?;
    w.put_u64("amount_e6", amount_e6)?;

    Ok(Instruction {
        program_id: config.program_id,
        accounts: vec![
            AccountMeta::writable_signer(*user),
            AccountMeta::writable(*market),
            AccountMeta::writable(margin),
            AccountMeta::writable(vault),
        ],
        data: w.finish()?,
    })
}

/// Withdraw free collateral from the caller's margin account.
///
/// Same account shape as [`build_deposit`].
pub fn build_withdraw(
    config: &ClientConfig,
    user: &Address,
    market: &Address,
    amount_e6: u64,
) -> Result<Instruction, ClientError> {
    let (margin, _) = margin_address(&config.program_id, market, user)?;
    let (vault, _) = vault_address(&config.program_id, market)?;

    let mut w = Writer::new(registry::withdraw_payload());
    w.put_u8("discriminator", Op::Withdraw.discriminator())?;
    w.put_u64("amount_e6", amount_e6)?;

    Ok(Instruction {
        program_id: config.program_id,
        accounts: vec![
            AccountMeta::writable_signer(*user),
            AccountMeta::writable(*market),
            AccountMeta::writable(margin),
            AccountMeta::writable(vault),
        ],
        data: w.finish()?,
    })
}

/// Reserve margin under a caller-chosen context id.
///
/// The same `context_id` is embedded in both the payload and the
/// reservation PDA seeds (through one serialization helper), which is
/// what lets one owner hold several concurrent reservations.
///
/// Accounts: user (signer), market (writable), margin PDA (writable),
/// reservation PDA (writable).
pub fn build_reserve(
    config: &ClientConfig,
    user: &Address,
    market: &Address,
    context_id: u16,
    amount_e6: u64,
) -> Result<Instruction, ClientError> {
    scoped_margin_op(
        config,
        user,
        market,
        context_id,
        amount_e6,
        Op::Reserve,
        registry::reserve_payload(),
    )
}

/// Release a previously reserved amount back to free margin.
///
/// Same account shape as [`build_reserve`].
pub fn build_release(
    config: &ClientConfig,
    user: &Address,
    market: &Address,
    context_id: u16,
    amount_e6: u64,
) -> Result<Instruction, ClientError> {
    scoped_margin_op(
        config,
        user,
        market,
        context_id,
        amount_e6,
        Op::Release,
        registry::release_payload(),
    )
}

// Reserve and release share payload shape and account order.
fn scoped_margin_op(
    config: &ClientConfig,
    user: &Address,
    market: &Address,
    context_id: u16,
    amount_e6: u64,
    op: Op,
    layout: &'static burr_wire::Layout,
) -> Result<Instruction, ClientError> {
    let (margin, _) = margin_address(&config.program_id, market, user)?;
    let (reservation, _) = reservation_address(&config.program_id, market, user, context_id)?;

    let mut w = Writer::new(layout);
    w.put_u8("discriminator", op.discriminator())?;
    w.put_u16("context_id", context_id)?;
    w.put_u64("amount_e6", amount_e6)?;

    Ok(Instruction {
        program_id: config.program_id,
        accounts: vec![
            AccountMeta::readonly_signer(*user),
            AccountMeta::writable(*market),
            AccountMeta::writable(margin),
            AccountMeta::writable(reservation),
        ],
        data: w.finish()?,
    })
}

/// Cross a taker order against up to four maker fills.
///
/// Accounts: user (signer), market (writable), margin PDA (writable),
/// reservation PDA (writable), price PDA (read-only).
pub fn build_cross_match(
    config: &ClientConfig,
    user: &Address,
    market: &Address,
    params: &CrossMatchParams,
) -> Result<Instruction, ClientError> {
    if params.splits.len() > registry::MAX_ORDER_SPLITS {
        return Err(WireError::FieldOutOfRange {
            layout: "CrossMatchPayload",
            field: "split_count",
            detail: format!(
                "{} splits exceed {}",
                params.splits.len(),
                registry::MAX_ORDER_SPLITS
            ),
        }
        .into());
    }

    let (margin, _) = margin_address(&config.program_id, market, user)?;
    let (reservation, _) =
        reservation_address(&config.program_id, market, user, params.context_id)?;
    let (price, _) = price_address(&config.program_id, market)?;

    let mut w = Writer::new(registry::cross_match_payload());
    w.put_u8("discriminator", Op::CrossMatch.discriminator())?;
    w.put_u16("context_id", params.context_id)?;
    w.put_u8("side", params.side as u8)?;
    w.put_u64("limit_price_e6", params.limit_price_e6)?;
    w.put_u64("quantity_e6", params.quantity_e6)?;
    w.put_u8("split_count", params.splits.len() as u8)?;
    for i in 0..registry::MAX_ORDER_SPLITS {
        let split = params.splits.get(i).copied().unwrap_or_default();
        w.put_u64(SPLIT_PRICE_FIELDS[i], split.price_e6)?;
        w.put_u64(SPLIT_QUANTITY_FIELDS[i], split.quantity_e6)?;
    }

    Ok(Instruction {
        program_id: config.program_id,
        accounts: vec![
            AccountMeta::readonly_signer(*user),
            AccountMeta::writable(*market),
            AccountMeta::writable(margin),
            AccountMeta::writable(reservation),
            AccountMeta::readonly(price),
        ],
        data: w.finish()?,
    })
}

/// Liquidate an under-margined account at the oracle price.
///
/// Accounts: liquidator (signer, writable), market (writable), target
/// margin PDA (writable), vault PDA (writable), price PDA (read-only).
pub fn build_liquidate(
    config: &ClientConfig,
    liquidator: &Address,
    market: &Address,
    target: &Address,
) -> Result<Instruction, ClientError> {
    let (target_margin, _) = margin_address(&config.program_id, market, target)?;
    let (vault, _) = vault_address(&config.program_id, market)?;
    let (price, _) = price_address(&config.program_id, market)?;

    let mut w = Writer::new(registry::liquidate_payload());
    w.put_u8("discriminator", Op::Liquidate.discriminator())?;
    w.put_bytes("target", target)?;

    Ok(Instruction {
        program_id: config.program_id,
        accounts: vec![
            AccountMeta::writable_signer(*liquidator),
            AccountMeta::writable(*market),
            AccountMeta::writable(target_margin),
            AccountMeta::writable(vault),
            AccountMeta::readonly(price),
        ],
        data: w.finish()?,
    })
}

/// Push a new oracle price. Signed by the configured price authority.
///
/// Accounts: price authority (signer), market (read-only), price PDA
/// (writable).
pub fn build_update_price(
    config: &ClientConfig,
    market: &Address,
    price_e6: u64,
    conf_e6: u64,
    publish_time: i64,
) -> Result<Instruction, ClientError> {
    let (price, _) = price_address(&config.program_id, market)?;

    let mut w = Writer::new(registry::update_price_payload());
    w.put_u8("discriminator", Op::UpdatePrice.discriminator())?;
    w.put_u64("price_e6", price_e6)?;
    w.put_u64("conf_e6", conf_e6)?;
    w.put_i64("publish_time", publish_time)?;

    Ok(Instruction {
        program_id: config.program_id,
        accounts: vec![
            AccountMeta::readonly_signer(config.price_authority),
            AccountMeta::readonly(*market),
            AccountMeta::writable(price),
        ],
        data: w.finish()?,
    })
}

// ---------------------------------------------------------------------------
// Payload decoding
// ---------------------------------------------------------------------------

/// A parsed instruction payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BurrInstruction {
    InitMarket(InitMarketParams),
    Deposit { amount_e6: u64 },
    Withdraw { amount_e6: u64 },
    Reserve { context_id: u16, amount_e6: u64 },
    Release { context_id: u16, amount_e6: u64 },
    CrossMatch(CrossMatchParams),
    Liquidate { target: Address },
    UpdatePrice {
        price_e6: u64,
        conf_e6: u64,
        publish_time: i64,
    },
}

/// Parse an instruction payload back into its typed operation.
///
/// The inverse of the builders above, for off-chain inspection of queued
/// or historical transactions. Unknown discriminators and malformed
/// payloads come back as typed errors, never panics.
pub fn decode_instruction(data: &[u8]) -> Result<BurrInstruction, ClientError> {
    let disc = *data.first().ok_or(WireError::TooShort {
        layout: "InstructionPayload",
        need: 1,
        got: 0,
    })?;
    let op = Op::from_discriminator(disc).ok_or_else(|| WireError::FieldOutOfRange {
        layout: "InstructionPayload",
        field: "discriminator",
        detail: format!("unknown discriminator {disc}"),
    })?;

    match op {
        Op::InitMarket => {
            let mut r = Reader::new(registry::init_market_payload(), data)?;
            r.get_u8("discriminator")?;
            Ok(BurrInstruction::InitMarket(InitMarketParams {
                authority: r.get_array("authority")?,
                collateral_mint: r.get_array("collateral_mint")?,
                price_feed: r.get_array("price_feed")?,
                fee_bps: r.get_u16("fee_bps")?,
                unit_scale: r.get_u32("unit_scale")?,
                min_order_units: r.get_u64("min_order_units")?,
            }))
        }
        Op::Deposit => {
            let mut r = Reader::new(registry::deposit_payload(), data)?;
            r.get_u8("discriminator")?;
            Ok(BurrInstruction::Deposit {
                amount_e6: r.get_u64("amount_e6")?,
            })
        }
        Op::Withdraw => {
            let mut r = Reader::new(registry::withdraw_payload(), data)?;
            r.get_u8("discriminator")?;
            Ok(BurrInstruction::Withdraw {
                amount_e6: r.get_u64("amount_e6")?,
            })
        }
        Op::Reserve => {
            let mut r = Reader::new(registry::reserve_payload(), data)?;
            r.get_u8("discriminator")?;
            Ok(BurrInstruction::Reserve {
                context_id: r.get_u16("context_id")?,
                amount_e6: r.get_u64("amount_e6")?,
            })
        }
        Op::Release => {
            let mut r = Reader::new(registry::release_payload(), data)?;
            r.get_u8("discriminator")?;
            Ok(BurrInstruction::Release {
                context_id: r.get_u16("context_id")?,
                amount_e6: r.get_u64("amount_e6")?,
            })
        }
        Op::CrossMatch => {
            let mut r = Reader::new(registry::cross_match_payload(), data)?;
            r.get_u8("discriminator")?;
            let context_id = r.get_u16("context_id")?;
            let side = Side::from_byte(r.get_u8("side")?, "CrossMatchPayload")?;
            let limit_price_e6 = r.get_u64("limit_price_e6")?;
            let quantity_e6 = r.get_u64("quantity_e6")?;
            let split_count = r.get_u8("split_count")? as usize;
            if split_count > registry::MAX_ORDER_SPLITS {
                return Err(WireError::FieldOutOfRange {
                    layout: "CrossMatchPayload",
                    field: "split_count",
                    detail: format!(
                        "{split_count} splits exceed {}",
                        registry::MAX_ORDER_SPLITS
                    ),
                }
                .into());
            }

            let mut splits = Vec::with_capacity(split_count);
            for i in 0..registry::MAX_ORDER_SPLITS {
                let split = OrderSplit {
                    price_e6: r.get_u64(SPLIT_PRICE_FIELDS[i])?,
                    quantity_e6: r.get_u64(SPLIT_QUANTITY_FIELDS[i])?,
                };
                if i < split_count {
                    splits.push(split);
                } else if split != OrderSplit::default() {
                    // Dead slots must be zero or the payload was tampered.
                    return Err(WireError::FieldOutOfRange {
                        layout: "CrossMatchPayload",
                        field: "split_count",
                        detail: format!("split slot {i} is past split_count but non-zero"),
                    }
                    .into());
                }
            }

            Ok(BurrInstruction::CrossMatch(CrossMatchParams {
                context_id,
                side,
                limit_price_e6,
                quantity_e6,
                splits,
            }))
        }
        Op::Liquidate => {
            let mut r = Reader::new(registry::liquidate_payload(), data)?;
            r.get_u8("discriminator")?;
            Ok(BurrInstruction::Liquidate {
                target: r.get_array("target")?,
            })
        }
        Op::UpdatePrice => {
            let mut r = Reader::new(registry::update_price_payload(), data)?;
            r.get_u8("discriminator")?;
            Ok(BurrInstruction::UpdatePrice {
                price_e6: r.get_u64("price_e6")?,
                conf_e6: r.get_u64("conf_e6")?,
                publish_time: r.get_i64("publish_time")?,
            })
        }
    }
}
