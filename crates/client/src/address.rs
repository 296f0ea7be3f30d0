//! Address text form.
//!
//! On the wire an address is a raw 32-byte identity; in configuration and
//! diagnostics it is the Base58 encoding of those bytes, with no hashing
//! or checksum step. The canonical alphabet is the standard Bitcoin
//! Base58 alphabet used by the `bs58` crate.

use crate::error::ClientError;

/// A 32-byte on-chain identity (account, program, or signer key).
pub type Address = [u8; 32];

/// Parse a Base58 address string into its 32-byte form.
pub fn parse_address(address: &str) -> Result<Address, ClientError> {
    let bytes = bs58::decode(address)
        .into_vec()
        .map_err(|e| ClientError::InvalidAddress(format!("base58 decode failed: {e}")))?;

    bytes.try_into().map_err(|v: Vec<u8>| {
        ClientError::InvalidAddress(format!("expected 32 bytes, got {}", v.len()))
    })
}

/// Encode 32 bytes as a Base58 address string.
pub fn format_address(bytes: &Address) -> String {
    bs58::encode(bytes).into_string()
}

/// Check that a string is a well-formed Base58 address.
pub fn validate_address(address: &str) -> Result<(), ClientError> {
    parse_address(address).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 32 zero bytes encode to a run of Base58 ones.
    #[test]
    fn zero_address_text_form() {
        let zeros = [0u8; 32];
        assert_eq!(format_address(&zeros), "11111111111111111111111111111111");
    }

    #[test]
    fn roundtrip_known_address() {
        let address = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";
        let bytes = parse_address(address).unwrap();
        assert_eq!(format_address(&bytes), address);
    }

    #[test]
    fn parse_garbage_fails() {
        assert!(parse_address("not-a-valid-address!!!").is_err());
    }

    #[test]
    fn parse_wrong_length_fails() {
        // "1" decodes to a single zero byte.
        let err = parse_address("1").unwrap_err();
        assert!(matches!(err, ClientError::InvalidAddress(_)));
    }

    #[test]
    fn validate_accepts_well_formed() {
        assert!(validate_address("11111111111111111111111111111111").is_ok());
    }

    #[test]
    fn format_is_deterministic() {
        let bytes = [0xffu8; 32];
        assert_eq!(format_address(&bytes), format_address(&bytes));
    }
}
