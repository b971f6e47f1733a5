//! Error types for IoT Crypto.
//!
//! Every fallible operation returns one of these kinds; nothing panics.
//! Private key material is never included in error messages.

/// Error kinds covering all operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CryptoError {
    #[error("Invalid hex encoding: {0}")]
    InvalidEncoding(String),

    #[error("Key generation failed: {0}")]
    KeyGenerationFailed(String),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Signing failed: {0}")]
    SigningFailed(String),

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Invalid encrypted frame: {len} bytes, need at least {min}")]
    InvalidFrame { len: usize, min: usize },

    #[error("Authentication failed: ciphertext, tag, nonce or key mismatch")]
    AuthenticationFailed,
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, CryptoError>;
