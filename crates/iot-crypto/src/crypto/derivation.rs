//! Cipher key derivation from shared-secret text.
//!
//! The AES key is the first 16 bytes of SHA-256 over the key material
//! exactly as the caller passes it. For a key-agreement result that is the
//! 64-character hex text, not the 32 raw secret bytes. Peers running the
//! established wire format derive keys this way, so the text form is kept.

use sha2::{Digest, Sha256};
use zeroize::{Zeroize, Zeroizing};

use crate::crypto::encryption::KEY_SIZE;

/// Size of a SHA-256 digest in bytes.
pub const DIGEST_SIZE: usize = 32;

/// Compute SHA-256 over arbitrary bytes.
pub fn digest(data: &[u8]) -> [u8; DIGEST_SIZE] {
    Sha256::digest(data).into()
}

/// Derive the 16-byte AES-128 key for a key-material string.
///
/// The text is hashed byte-for-byte: no case folding, no hex validation.
pub fn derive_cipher_key(key_material: &str) -> Zeroizing<[u8; KEY_SIZE]> {
    let mut full = digest(key_material.as_bytes());
    let mut key = Zeroizing::new([0u8; KEY_SIZE]);
    key.copy_from_slice(&full[..KEY_SIZE]);
    full.zeroize();
    key
}
