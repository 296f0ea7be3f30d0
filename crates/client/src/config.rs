//! Client configuration.
//!
//! The program identity and well-known authority addresses are an explicit
//! value handed to every builder and resolver call — never ambient process
//! state — so the whole client can run against arbitrary fixtures in
//! tests and against different deployments without re-linking.

use serde::Deserialize;

use crate::address::{parse_address, Address};
use crate::error::ClientError;

/// Identities the client needs to talk to one Burr deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientConfig {
    /// The Burr program itself. Every derived account is owned by it.
    pub program_id: Address,
    /// Signer allowed to push oracle prices.
    pub price_authority: Address,
    /// Market administration authority: a single key, or the address of a
    /// committee account.
    pub admin_authority: Address,
}

/// JSON shape of a deployment file, with Base58 address fields.
#[derive(Debug, Deserialize)]
struct RawConfig {
    program_id: String,
    price_authority: String,
    admin_authority: String,
}

impl ClientConfig {
    /// Parse a deployment config from JSON.
    pub fn from_json(json: &str) -> Result<Self, ClientError> {
        let raw: RawConfig = serde_json::from_str(json)
            .map_err(|e| ClientError::InvalidConfig(e.to_string()))?;
        Ok(ClientConfig {
            program_id: parse_address(&raw.program_id)?,
            price_authority: parse_address(&raw.price_authority)?,
            admin_authority: parse_address(&raw.admin_authority)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::format_address;

    #[test]
    fn parses_well_formed_json() {
        let json = format!(
            r#"{{
                "program_id": "{}",
                "price_authority": "{}",
                "admin_authority": "{}"
            }}"#,
            format_address(&[1u8; 32]),
            format_address(&[2u8; 32]),
            format_address(&[3u8; 32]),
        );
        let config = ClientConfig::from_json(&json).unwrap();
        assert_eq!(config.program_id, [1u8; 32]);
        assert_eq!(config.price_authority, [2u8; 32]);
        assert_eq!(config.admin_authority, [3u8; 32]);
    }

    #[test]
    fn rejects_malformed_json() {
        let err = ClientConfig::from_json("{").unwrap_err();
        assert!(matches!(err, ClientError::InvalidConfig(_)));
    }

    #[test]
    fn rejects_bad_address_field() {
        let json = r#"{
            "program_id": "not base58 at all!!",
            "price_authority": "11111111111111111111111111111111",
            "admin_authority": "11111111111111111111111111111111"
        }"#;
        let err = ClientConfig::from_json(json).unwrap_err();
        assert!(matches!(err, ClientError::InvalidAddress(_)));
    }

    #[test]
    fn rejects_missing_field() {
        let json = r#"{ "program_id": "11111111111111111111111111111111" }"#;
        assert!(ClientConfig::from_json(json).is_err());
    }
}
