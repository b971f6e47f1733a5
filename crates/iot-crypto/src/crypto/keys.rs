//! P-256 key pair generation and public key derivation.
//!
//! Private keys are 32-byte big-endian scalars in `[1, n-1]`, exchanged as
//! 64 hex characters. Public keys are SEC1 uncompressed points
//! (`0x04 ‖ X ‖ Y`), exchanged as 130 hex characters.

use std::fmt;

use p256::elliptic_curve::sec1::ToEncodedPoint;
use p256::{FieldBytes, SecretKey};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, Zeroizing};

use crate::crypto::random::try_fill_random;
use crate::crypto::{SCALAR_SIZE, UNCOMPRESSED_POINT_SIZE};
use crate::encoding;
use crate::error::{CryptoError, Result};

/// Upper bound on rejection-sampling draws. A uniform 256-bit draw falls
/// outside `[1, n-1]` with probability below 2^-32.
const MAX_KEYGEN_ATTEMPTS: usize = 64;

/// A P-256 private scalar.
///
/// The scalar is zeroized on drop and never printed by `Debug`.
#[derive(Clone)]
pub struct PrivateKey {
    secret: SecretKey,
}

impl PrivateKey {
    /// Draw a uniformly random scalar in `[1, n-1]`.
    pub fn generate() -> Result<Self> {
        let mut candidate = Zeroizing::new([0u8; SCALAR_SIZE]);
        for _ in 0..MAX_KEYGEN_ATTEMPTS {
            try_fill_random(&mut candidate[..])
                .map_err(|e| CryptoError::KeyGenerationFailed(format!("random source: {e}")))?;
            if let Ok(secret) = SecretKey::from_bytes(FieldBytes::from_slice(&candidate[..])) {
                return Ok(Self { secret });
            }
        }
        Err(CryptoError::KeyGenerationFailed(format!(
            "no valid scalar after {MAX_KEYGEN_ATTEMPTS} draws"
        )))
    }

    /// Parse a 32-byte big-endian scalar.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != SCALAR_SIZE {
            return Err(CryptoError::InvalidKey(format!(
                "private key must be {SCALAR_SIZE} bytes, got {}",
                bytes.len()
            )));
        }
        SecretKey::from_bytes(FieldBytes::from_slice(bytes))
            .map(|secret| Self { secret })
            .map_err(|_| {
                CryptoError::InvalidKey("private key is zero or not below the curve order".into())
            })
    }

    /// Parse a 64-character hex scalar.
    pub fn from_hex(private_key_hex: &str) -> Result<Self> {
        let bytes = Zeroizing::new(
            encoding::decode(private_key_hex)
                .map_err(|e| CryptoError::InvalidKey(format!("private key: {e}")))?,
        );
        Self::from_bytes(&bytes)
    }

    /// Return the scalar as 32 big-endian bytes.
    pub fn to_bytes(&self) -> Zeroizing<[u8; SCALAR_SIZE]> {
        let mut field = self.secret.to_bytes();
        let mut out = Zeroizing::new([0u8; SCALAR_SIZE]);
        out.copy_from_slice(&field);
        field.as_mut_slice().zeroize();
        out
    }

    /// Return the scalar as 64 lowercase hex characters.
    pub fn to_hex(&self) -> String {
        encoding::encode(&self.to_bytes()[..])
    }

    /// Compute `scalar · G`.
    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            point: self.secret.public_key(),
        }
    }

    pub(crate) fn secret(&self) -> &SecretKey {
        &self.secret
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey([REDACTED])")
    }
}

/// A validated P-256 public point.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey {
    point: p256::PublicKey,
}

impl PublicKey {
    /// Parse an SEC1 encoded point (uncompressed or compressed).
    ///
    /// Rejects the identity and any point not on the curve.
    pub fn from_sec1_bytes(bytes: &[u8]) -> Result<Self> {
        p256::PublicKey::from_sec1_bytes(bytes)
            .map(|point| Self { point })
            .map_err(|_| CryptoError::InvalidKey("public key is not a valid P-256 point".into()))
    }

    /// Parse a hex-encoded SEC1 point.
    pub fn from_hex(public_key_hex: &str) -> Result<Self> {
        let bytes = encoding::decode(public_key_hex)
            .map_err(|e| CryptoError::InvalidKey(format!("public key: {e}")))?;
        Self::from_sec1_bytes(&bytes)
    }

    /// Return the 65-byte uncompressed encoding.
    pub fn to_uncompressed_bytes(&self) -> [u8; UNCOMPRESSED_POINT_SIZE] {
        let encoded = self.point.to_encoded_point(false);
        let mut out = [0u8; UNCOMPRESSED_POINT_SIZE];
        out.copy_from_slice(encoded.as_bytes());
        out
    }

    /// Return the uncompressed encoding as 130 hex characters (leading `04`).
    pub fn to_hex(&self) -> String {
        encoding::encode(self.to_uncompressed_bytes())
    }

    /// Return the 33-byte compressed encoding as hex.
    pub fn to_compressed_hex(&self) -> String {
        encoding::encode(self.point.to_encoded_point(true).as_bytes())
    }

    pub(crate) fn point(&self) -> &p256::PublicKey {
        &self.point
    }
}

/// A private key together with its public point.
#[derive(Clone, Debug)]
pub struct KeyPair {
    private_key: PrivateKey,
    public_key: PublicKey,
}

impl KeyPair {
    /// Generate a new random key pair.
    pub fn generate() -> Result<Self> {
        Ok(Self::from_private_key(PrivateKey::generate()?))
    }

    /// Build a key pair from an existing private key.
    pub fn from_private_key(private_key: PrivateKey) -> Self {
        let public_key = private_key.public_key();
        Self {
            private_key,
            public_key,
        }
    }

    /// Reconstruct a key pair from a hex private key.
    pub fn from_private_key_hex(private_key_hex: &str) -> Result<Self> {
        Ok(Self::from_private_key(PrivateKey::from_hex(private_key_hex)?))
    }

    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn private_key_hex(&self) -> String {
        self.private_key.to_hex()
    }

    pub fn public_key_hex(&self) -> String {
        self.public_key.to_hex()
    }

    /// Return the hex view suitable for JSON channels.
    pub fn to_hex_pair(&self) -> KeyPairHex {
        KeyPairHex {
            private_key: self.private_key_hex(),
            public_key: self.public_key_hex(),
        }
    }
}

/// Hex view of a key pair.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPairHex {
    pub private_key: String,
    pub public_key: String,
}

impl KeyPairHex {
    /// Parse both halves and check that the public key belongs to the private key.
    pub fn into_key_pair(self) -> Result<KeyPair> {
        let pair = KeyPair::from_private_key_hex(&self.private_key)?;
        let claimed = PublicKey::from_hex(&self.public_key)?;
        if claimed != pair.public_key {
            return Err(CryptoError::InvalidKey(
                "public key does not match private key".into(),
            ));
        }
        Ok(pair)
    }
}

impl fmt::Debug for KeyPairHex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPairHex")
            .field("private_key", &"[REDACTED]")
            .field("public_key", &self.public_key)
            .finish()
    }
}

impl Drop for KeyPairHex {
    fn drop(&mut self) {
        self.private_key.zeroize();
    }
}

/// Generate a private key as 64 lowercase hex characters.
pub fn generate_private_key() -> Result<String> {
    let key = PrivateKey::generate()?;
    log::debug!("generated P-256 private key");
    Ok(key.to_hex())
}

/// Derive the uncompressed public key (130 hex characters) for a private key.
///
/// Deterministic: the same private key always yields the same encoding.
pub fn derive_public_key(private_key_hex: &str) -> Result<String> {
    let private_key = PrivateKey::from_hex(private_key_hex)?;
    Ok(private_key.public_key().to_hex())
}

/// Check that a hex string encodes a point on the curve.
pub fn validate_public_key(public_key_hex: &str) -> Result<()> {
    PublicKey::from_hex(public_key_hex).map(|_| ())
}
