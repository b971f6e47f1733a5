//! Lowercase hex encoding for every value that crosses the API.

use hex::FromHexError;

use crate::error::{CryptoError, Result};

/// Encode bytes as lowercase hex, two digits per byte, no separators.
pub fn encode(bytes: impl AsRef<[u8]>) -> String {
    hex::encode(bytes)
}

/// Decode a hex string into bytes.
///
/// Fails on odd length or any non-hex character. Uppercase digits are accepted.
/// The offending character is not echoed, since the input may be a private key.
pub fn decode(hex_str: &str) -> Result<Vec<u8>> {
    hex::decode(hex_str).map_err(|e| {
        CryptoError::InvalidEncoding(match e {
            FromHexError::InvalidHexCharacter { index, .. } => {
                format!("non-hex character at index {index}")
            }
            FromHexError::OddLength => "odd number of hex digits".to_string(),
            FromHexError::InvalidStringLength => "invalid hex string length".to_string(),
        })
    })
}
