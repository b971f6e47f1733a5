//! AES-128-CCM authenticated encryption with a fixed wire frame.
//!
//! Frame layout: `nonce (12) ‖ ciphertext (len(plaintext)) ‖ tag (16)`,
//! hex-encoded for transport. An empty plaintext still yields a 28-byte
//! frame. The cipher key comes from [`derive_cipher_key`].
//!
//! # Nonce contract
//!
//! Every call to [`encrypt`] draws a fresh random 96-bit nonce. A
//! `(key, nonce)` pair must never repeat, which random nonces only
//! guarantee probabilistically: callers encrypting at high volume under one
//! key must rotate it well before 2^32 messages. Callers that need a
//! counter-based scheme can build frames with [`seal`] and [`open`].

use aes::Aes128;
use ccm::aead::generic_array::GenericArray;
use ccm::aead::{Aead, KeyInit};
use ccm::consts::{U12, U16};
use ccm::Ccm;

use crate::crypto::derivation::derive_cipher_key;
use crate::crypto::random::random_nonce_12;
use crate::encoding;
use crate::error::{CryptoError, Result};

/// Size of the AES-128 key in bytes.
pub const KEY_SIZE: usize = 16;

/// Size of the CCM nonce in bytes.
pub const NONCE_SIZE: usize = 12;

/// Size of the authentication tag in bytes.
pub const TAG_SIZE: usize = 16;

/// Smallest valid frame: nonce plus tag around an empty ciphertext.
pub const MIN_FRAME_SIZE: usize = NONCE_SIZE + TAG_SIZE;

/// Largest plaintext CCM accepts with a 12-byte nonce (3-byte length field).
pub const MAX_PLAINTEXT_SIZE: usize = (1 << 24) - 1;

type Aes128Ccm = Ccm<Aes128, U16, U12>;

/// A parsed `nonce ‖ ciphertext ‖ tag` frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncryptedPayload {
    pub nonce: [u8; NONCE_SIZE],
    pub ciphertext: Vec<u8>,
    pub tag: [u8; TAG_SIZE],
}

impl EncryptedPayload {
    /// Split a raw frame at the fixed offsets.
    pub fn from_bytes(frame: &[u8]) -> Result<Self> {
        if frame.len() < MIN_FRAME_SIZE {
            return Err(CryptoError::InvalidFrame {
                len: frame.len(),
                min: MIN_FRAME_SIZE,
            });
        }
        let tag_start = frame.len() - TAG_SIZE;
        let mut nonce = [0u8; NONCE_SIZE];
        nonce.copy_from_slice(&frame[..NONCE_SIZE]);
        let mut tag = [0u8; TAG_SIZE];
        tag.copy_from_slice(&frame[tag_start..]);
        Ok(Self {
            nonce,
            ciphertext: frame[NONCE_SIZE..tag_start].to_vec(),
            tag,
        })
    }

    /// Decode hex, then split the frame.
    pub fn from_hex(encrypted_hex: &str) -> Result<Self> {
        Self::from_bytes(&encoding::decode(encrypted_hex)?)
    }

    /// Reassemble the raw frame.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut frame = Vec::with_capacity(self.frame_len());
        frame.extend_from_slice(&self.nonce);
        frame.extend_from_slice(&self.ciphertext);
        frame.extend_from_slice(&self.tag);
        frame
    }

    pub fn to_hex(&self) -> String {
        encoding::encode(self.to_bytes())
    }

    /// Total frame length in bytes.
    pub fn frame_len(&self) -> usize {
        MIN_FRAME_SIZE + self.ciphertext.len()
    }
}

/// Encrypt under a raw AES-128 key with a fresh random nonce.
pub fn seal(key: &[u8; KEY_SIZE], plaintext: &[u8]) -> Result<EncryptedPayload> {
    if plaintext.len() > MAX_PLAINTEXT_SIZE {
        return Err(CryptoError::EncryptionFailed(format!(
            "plaintext of {} bytes exceeds CCM limit of {MAX_PLAINTEXT_SIZE}",
            plaintext.len()
        )));
    }
    let nonce = random_nonce_12()
        .map_err(|e| CryptoError::EncryptionFailed(format!("nonce generation: {e}")))?;
    let cipher = Aes128Ccm::new(GenericArray::from_slice(key));
    let mut sealed = cipher
        .encrypt(GenericArray::from_slice(&nonce), plaintext)
        .map_err(|e| CryptoError::EncryptionFailed(format!("encrypt: {e}")))?;

    let tag_start = sealed.len() - TAG_SIZE;
    let mut tag = [0u8; TAG_SIZE];
    tag.copy_from_slice(&sealed[tag_start..]);
    sealed.truncate(tag_start);
    Ok(EncryptedPayload {
        nonce,
        ciphertext: sealed,
        tag,
    })
}

/// Verify the tag and decrypt under a raw AES-128 key.
///
/// No plaintext is returned unless the tag verifies.
pub fn open(key: &[u8; KEY_SIZE], payload: &EncryptedPayload) -> Result<Vec<u8>> {
    let cipher = Aes128Ccm::new(GenericArray::from_slice(key));
    let mut sealed = Vec::with_capacity(payload.ciphertext.len() + TAG_SIZE);
    sealed.extend_from_slice(&payload.ciphertext);
    sealed.extend_from_slice(&payload.tag);
    cipher
        .decrypt(GenericArray::from_slice(&payload.nonce), sealed.as_slice())
        .map_err(|_| {
            log::warn!(
                "rejected {} byte frame: authentication tag did not verify",
                payload.frame_len()
            );
            CryptoError::AuthenticationFailed
        })
}

/// Encrypt a plaintext under key material and return the hex frame.
///
/// See the module docs for the nonce contract.
pub fn encrypt(key_material: &str, plaintext: impl AsRef<[u8]>) -> Result<String> {
    let key = derive_cipher_key(key_material);
    let payload = seal(&key, plaintext.as_ref())?;
    log::debug!("encrypted {} byte frame", payload.frame_len());
    Ok(payload.to_hex())
}

/// Decrypt a hex frame under key material.
///
/// Fails with `InvalidEncoding` on bad hex, `InvalidFrame` below 28 bytes,
/// and `AuthenticationFailed` when the tag does not verify.
pub fn decrypt(key_material: &str, encrypted_hex: &str) -> Result<Vec<u8>> {
    let payload = EncryptedPayload::from_hex(encrypted_hex)?;
    let key = derive_cipher_key(key_material);
    open(&key, &payload)
}

/// Decrypt a hex frame and interpret the plaintext as UTF-8.
pub fn decrypt_to_string(key_material: &str, encrypted_hex: &str) -> Result<String> {
    String::from_utf8(decrypt(key_material, encrypted_hex)?).map_err(|e| {
        CryptoError::InvalidEncoding(format!("plaintext is not UTF-8: {}", e.utf8_error()))
    })
}
