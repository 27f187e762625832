//! Solana address encoding and validation.
//!
//! Solana addresses are Base58-encoded 32-byte public keys. Program-derived
//! addresses use the same encoding even though they have no private key.

use crate::error::SolError;

/// Decode a Solana address string to its 32-byte representation.
///
/// Surrounding whitespace is ignored, since addresses are usually pasted
/// into form fields. Returns an error if the address is not valid Base58 or
/// does not decode to exactly 32 bytes.
pub fn address_to_bytes(address: &str) -> Result<[u8; 32], SolError> {
    let trimmed = address.trim();
    if trimmed.is_empty() {
        return Err(SolError::InvalidAddress("address is empty".into()));
    }

    let bytes = bs58::decode(trimmed)
        .into_vec()
        .map_err(|e| SolError::InvalidAddress(format!("base58 decode failed: {e}")))?;

    let arr: [u8; 32] = bytes.try_into().map_err(|v: Vec<u8>| {
        SolError::InvalidAddress(format!("expected 32 bytes, got {}", v.len()))
    })?;

    Ok(arr)
}

/// Encode 32 bytes as a Solana address (Base58 string).
pub fn bytes_to_address(bytes: &[u8; 32]) -> String {
    bs58::encode(bytes).into_string()
}

/// Validate a Solana address string.
pub fn validate_address(address: &str) -> Result<(), SolError> {
    address_to_bytes(address).map(|_| ())
}

/// Form-field helper: the decoded address, or `None` when the text is not
/// a valid address.
pub fn parse_address(address: &str) -> Option<[u8; 32]> {
    address_to_bytes(address).ok()
}
