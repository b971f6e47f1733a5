//! ECDH key agreement over P-256.
//!
//! The shared secret is the X coordinate of `own · Peer`, 32 bytes
//! big-endian. Both parties obtain the same bytes.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::keys::{PrivateKey, PublicKey};
use crate::crypto::SCALAR_SIZE;
use crate::encoding;
use crate::error::Result;

/// The X coordinate of an ECDH shared point.
///
/// Zeroized on drop and never printed by `Debug`.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SharedSecret {
    bytes: [u8; SCALAR_SIZE],
}

impl SharedSecret {
    pub fn as_bytes(&self) -> &[u8; SCALAR_SIZE] {
        &self.bytes
    }

    /// Return the secret as 64 lowercase hex characters.
    pub fn to_hex(&self) -> String {
        encoding::encode(self.bytes)
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedSecret([REDACTED])")
    }
}

/// Compute the shared secret between our private key and a peer's public key.
pub fn agree_with(own: &PrivateKey, peer: &PublicKey) -> SharedSecret {
    let shared =
        p256::ecdh::diffie_hellman(own.secret().to_nonzero_scalar(), peer.point().as_affine());
    let mut bytes = [0u8; SCALAR_SIZE];
    bytes.copy_from_slice(shared.raw_secret_bytes());
    SharedSecret { bytes }
}

/// Derive the hex shared secret from a hex private key and a hex peer public key.
///
/// Symmetric: `agree(a, B) == agree(b, A)`.
pub fn agree(own_private_key_hex: &str, peer_public_key_hex: &str) -> Result<String> {
    let own = PrivateKey::from_hex(own_private_key_hex)?;
    let peer = PublicKey::from_hex(peer_public_key_hex)?;
    let secret = agree_with(&own, &peer);
    log::debug!("derived ECDH shared secret");
    Ok(secret.to_hex())
}
