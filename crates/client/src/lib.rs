//! Off-chain client for the Burr perpetual-futures market program.
//!
//! This crate builds instructions and interprets accounts for a remote
//! Burr deployment without pulling in `solana-sdk`: derived addresses are
//! computed with `sha2` + `curve25519-dalek`, payloads and account
//! records go through the fixed-layout codec in `burr-wire`, and Base58
//! address text uses `bs58`.
//!
//! Everything here is synchronous and pure. Fetching account bytes and
//! submitting built instructions belong to a transport collaborator; this
//! crate only produces and consumes the data those calls need, so any
//! number of builds, derivations, and decodes can run in parallel with no
//! shared state.

pub mod accounts;
pub mod address;
pub mod config;
pub mod error;
pub mod instruction;
pub mod multisig;
pub mod pda;

// Re-export key public types for ergonomic imports.
pub use accounts::{
    decode_batch, decode_committee, decode_market_params, decode_price, BatchDecode,
    CommitteeRecord, MarketParamsRecord, PriceRecord,
};
pub use address::{format_address, parse_address, validate_address, Address};
pub use config::ClientConfig;
pub use error::ClientError;
pub use instruction::{
    build_cross_match, build_deposit, build_init_market, build_liquidate, build_release,
    build_reserve, build_update_price, build_withdraw, decode_instruction, AccountMeta,
    BurrInstruction, CrossMatchParams, InitMarketParams, Instruction, Op, OrderSplit, Side,
};
pub use multisig::Authority;
pub use pda::{
    context_id_bytes, create_program_address, create_with_seed, find_program_address,
    margin_address, market_address, price_address, reservation_address, vault_address,
};
