//! Solana addresses.
//!
//! An address is 32 raw bytes: either an Ed25519 public key (on the curve,
//! has a private key) or a program-derived address (off the curve, signed
//! for only by its program). Text form is Base58 with the Bitcoin alphabet.

use crate::error::SolError;

/// Raw 32-byte account address.
pub type Pubkey = [u8; 32];

/// System Program: 32 zero bytes, `11111111111111111111111111111111`.
pub const SYSTEM_PROGRAM_ID: Pubkey = [0u8; 32];

/// Rent sysvar: `SysvarRent111111111111111111111111111111111`.
pub const RENT_SYSVAR_ID: Pubkey = [
    0x06, 0xa7, 0xd5, 0x17, 0x19, 0x2c, 0x5c, 0x51, 0x21, 0x8c, 0xc9, 0x4c, 0x3d, 0x4a, 0xf1,
    0x7f, 0x58, 0xda, 0xee, 0x08, 0x9b, 0xa1, 0xfd, 0x44, 0xe3, 0xdb, 0xd9, 0x8a, 0x00, 0x00,
    0x00, 0x00,
];

/// Encode an address as Base58.
pub fn encode_address(address: &Pubkey) -> String {
    bs58::encode(address).into_string()
}

/// Decode a Base58 address, requiring exactly 32 bytes.
pub fn decode_address(text: &str) -> Result<Pubkey, SolError> {
    let bytes = bs58::decode(text.trim())
        .into_vec()
        .map_err(|e| SolError::InvalidAddress(format!("base58 decode failed: {e}")))?;

    bytes.try_into().map_err(|v: Vec<u8>| {
        SolError::InvalidAddress(format!("expected 32 bytes, got {}", v.len()))
    })
}

/// Whether 32 bytes decompress to an Ed25519 point.
///
/// Wallet keys are on the curve. Program-derived addresses never are.
pub fn is_on_curve(bytes: &Pubkey) -> bool {
    curve25519_dalek::edwards::CompressedEdwardsY(*bytes)
        .decompress()
        .is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_program_encodes_to_ones() {
        assert_eq!(
            encode_address(&SYSTEM_PROGRAM_ID),
            "11111111111111111111111111111111"
        );
    }

    #[test]
    fn rent_sysvar_matches_base58() {
        assert_eq!(
            encode_address(&RENT_SYSVAR_ID),
            "SysvarRent111111111111111111111111111111111"
        );
    }

    #[test]
    fn decode_trims_whitespace() {
        let bytes = decode_address("  TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA\n").unwrap();
        assert_eq!(
            encode_address(&bytes),
            "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA"
        );
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(decode_address("not-a-valid-address!!!").is_err());
    }

    #[test]
    fn decode_rejects_short_input() {
        // "1" decodes to a single zero byte.
        let err = decode_address("1").unwrap_err();
        assert!(err.to_string().contains("expected 32 bytes, got 1"));
    }

    #[test]
    fn basepoint_is_on_curve() {
        let mut basepoint = [0x66u8; 32];
        basepoint[0] = 0x58;
        assert!(is_on_curve(&basepoint));
    }

    #[test]
    fn arbitrary_bytes_can_be_off_curve() {
        // y = 0x0202..02 has no matching x coordinate.
        assert!(!is_on_curve(&[0x02; 32]));
    }

    #[test]
    fn ed25519_public_key_is_on_curve() {
        let signing = ed25519_dalek::SigningKey::from_bytes(&[0x42u8; 32]);
        assert!(is_on_curve(&signing.verifying_key().to_bytes()));
    }
}
