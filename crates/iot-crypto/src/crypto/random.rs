//! Secure random number generation.
//!
//! Uses the thread-local generator from `rand`, which is seeded and
//! periodically reseeded from the operating system. Each thread owns its
//! own instance, so concurrent callers never share generator state.

use rand_core::RngCore;

use crate::crypto::encryption::NONCE_SIZE;

/// Fill a buffer with cryptographically secure random bytes.
pub fn try_fill_random(buf: &mut [u8]) -> Result<(), rand::Error> {
    rand::thread_rng().try_fill_bytes(buf)
}

/// Generate a fixed-size array of cryptographically secure random bytes.
pub fn random_bytes<const N: usize>() -> Result<[u8; N], rand::Error> {
    let mut buf = [0u8; N];
    try_fill_random(&mut buf)?;
    Ok(buf)
}

/// Generate a random 12-byte nonce (for AES-CCM).
pub fn random_nonce_12() -> Result<[u8; NONCE_SIZE], rand::Error> {
    random_bytes()
}
