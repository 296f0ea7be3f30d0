//! Derived-address search and caller-creatable address derivation.
//!
//! The Burr program never holds a private key for its own accounts: each
//! one lives at a program-derived address (PDA), a SHA-256 digest of the
//! account's seed components that is guaranteed NOT to be a valid Ed25519
//! point. The derivation searches a one-byte bump from 255 down to 0 and
//! stops at the first off-curve digest; that bump is canonical and
//! verifiers must reject any other.
//!
//! Seed component order is part of the contract — reordering seeds
//! derives a different address.

use sha2::{Digest, Sha256};

use crate::address::Address;
use crate::error::ClientError;

/// The string appended to every PDA preimage.
const PDA_MARKER: &[u8] = b"ProgramDerivedAddress";

/// Platform limit on one seed component's byte length.
pub const MAX_SEED_LEN: usize = 32;

/// Platform limit on the number of seed components.
pub const MAX_SEEDS: usize = 16;

// ---------------------------------------------------------------------------
// Seed tags
// ---------------------------------------------------------------------------
// Frozen domain separators. Changing any of these changes every address
// already derived from it, so they never change for a deployed program.

pub const MARKET_SEED: &[u8] = b"market";
pub const VAULT_SEED: &[u8] = b"vault";
pub const MARGIN_SEED: &[u8] = b"margin";
pub const RESERVATION_SEED: &[u8] = b"reservation";
pub const PRICE_SEED: &[u8] = b"price";

/// Serialize a reservation context id for use as a seed component.
///
/// This is the single definition of the context id's width and
/// endianness. The instruction payload encodes the same id through the
/// wire codec's little-endian `u16` field, and the two must always agree:
/// a mismatch silently derives an address the program will never find.
pub fn context_id_bytes(context_id: u16) -> [u8; 2] {
    context_id.to_le_bytes()
}

// ---------------------------------------------------------------------------
// Core derivation
// ---------------------------------------------------------------------------

fn check_seeds(seeds: &[&[u8]]) -> Result<(), ClientError> {
    if seeds.len() > MAX_SEEDS {
        return Err(ClientError::TooManySeeds {
            count: seeds.len(),
            max: MAX_SEEDS,
        });
    }
    for seed in seeds {
        if seed.len() > MAX_SEED_LEN {
            return Err(ClientError::SeedTooLong {
                len: seed.len(),
                max: MAX_SEED_LEN,
            });
        }
    }
    Ok(())
}

/// Attempt one derivation:
/// `SHA-256(seed_0 || .. || seed_n || [bump] || program_id || "ProgramDerivedAddress")`.
///
/// Returns `None` when the digest falls ON the Ed25519 curve, which would
/// make the address directly signable.
fn derive_candidate(seeds: &[&[u8]], bump: u8, program_id: &Address) -> Option<Address> {
    let mut hasher = Sha256::new();
    for seed in seeds {
        hasher.update(seed);
    }
    hasher.update([bump]);
    hasher.update(program_id);
    hasher.update(PDA_MARKER);
    let digest: Address = hasher.finalize().into();

    if is_on_curve(&digest) {
        return None;
    }
    Some(digest)
}

/// Find the canonical derived address for `seeds` under `program_id`.
///
/// Bumps are tried from 255 down to 0; the first off-curve digest wins,
/// together with the bump that produced it. Seed limits are checked
/// before any hashing. Exhausting all 256 bumps is practically
/// unreachable but still a distinct, reported error.
pub fn find_program_address(
    seeds: &[&[u8]],
    program_id: &Address,
) -> Result<(Address, u8), ClientError> {
    check_seeds(seeds)?;
    for bump in (0u8..=255).rev() {
        if let Some(address) = derive_candidate(seeds, bump, program_id) {
            return Ok((address, bump));
        }
    }
    Err(ClientError::BumpSeedExhausted)
}

/// Re-derive an address from a known bump.
///
/// Used by verifiers re-checking a claimed bump: an on-curve result means
/// the bump is not valid for these seeds.
pub fn create_program_address(
    seeds: &[&[u8]],
    bump: u8,
    program_id: &Address,
) -> Result<Address, ClientError> {
    check_seeds(seeds)?;
    derive_candidate(seeds, bump, program_id).ok_or(ClientError::OnCurve)
}

/// Derive an address the caller can create directly with its own
/// signature: `SHA-256(base || seed || owner)`.
///
/// No bump search and no off-curve requirement — this always succeeds for
/// a seed within the platform limit, unless the owner's trailing bytes
/// spell the PDA marker (which would let a caller forge a program-derived
/// preimage).
pub fn create_with_seed(
    base: &Address,
    seed: &str,
    owner: &Address,
) -> Result<Address, ClientError> {
    if seed.len() > MAX_SEED_LEN {
        return Err(ClientError::SeedTooLong {
            len: seed.len(),
            max: MAX_SEED_LEN,
        });
    }
    if owner.ends_with(PDA_MARKER) {
        return Err(ClientError::IllegalOwner);
    }

    let mut hasher = Sha256::new();
    hasher.update(base);
    hasher.update(seed.as_bytes());
    hasher.update(owner);
    Ok(hasher.finalize().into())
}

/// Check whether 32 bytes decompress to a valid Ed25519 curve point.
fn is_on_curve(bytes: &Address) -> bool {
    curve25519_dalek::edwards::CompressedEdwardsY(*bytes)
        .decompress()
        .is_some()
}

// ---------------------------------------------------------------------------
// Burr account recipes
// ---------------------------------------------------------------------------
// One function per seed-tag recipe, so the seed order for each account
// kind is written down exactly once.

/// Market account: `["market", collateral_mint]`.
pub fn market_address(
    program_id: &Address,
    collateral_mint: &Address,
) -> Result<(Address, u8), ClientError> {
    find_program_address(&[MARKET_SEED, collateral_mint], program_id)
}

/// Collateral vault for a market: `["vault", market]`.
pub fn vault_address(program_id: &Address, market: &Address) -> Result<(Address, u8), ClientError> {
    find_program_address(&[VAULT_SEED, market], program_id)
}

/// A user's margin account in a market: `["margin", market, owner]`.
pub fn margin_address(
    program_id: &Address,
    market: &Address,
    owner: &Address,
) -> Result<(Address, u8), ClientError> {
    find_program_address(&[MARGIN_SEED, market, owner], program_id)
}

/// A scoped reservation: `["reservation", market, owner, context_id_le]`.
///
/// The context id lets one owner hold several concurrent reservations of
/// the same kind.
pub fn reservation_address(
    program_id: &Address,
    market: &Address,
    owner: &Address,
    context_id: u16,
) -> Result<(Address, u8), ClientError> {
    let id = context_id_bytes(context_id);
    find_program_address(&[RESERVATION_SEED, market, owner, &id], program_id)
}

/// Oracle price account for a market: `["price", market]`.
pub fn price_address(program_id: &Address, market: &Address) -> Result<(Address, u8), ClientError> {
    find_program_address(&[PRICE_SEED, market], program_id)
}
