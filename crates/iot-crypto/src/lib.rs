//! IoT Crypto — P-256 primitives over hex strings.
//!
//! Provides key pair generation and derivation, ECDSA signing and
//! verification, ECDH key agreement, and AES-128-CCM authenticated
//! encryption with a fixed `nonce ‖ ciphertext ‖ tag` frame. Every
//! value crossing the public API is a lowercase hex string so it can be
//! embedded in logs, config fields, or JSON without further escaping.
//!
//! All operations are stateless and safe to call from any thread.

pub mod crypto;
pub mod encoding;
pub mod error;

pub use error::{CryptoError, Result};

pub use crypto::agreement::{agree, SharedSecret};
pub use crypto::encryption::{decrypt, decrypt_to_string, encrypt, EncryptedPayload};
pub use crypto::keys::{
    derive_public_key, generate_private_key, validate_public_key, KeyPair, KeyPairHex, PrivateKey,
    PublicKey,
};
pub use crypto::signing::{sign, verify};
