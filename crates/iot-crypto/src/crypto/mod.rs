//! Cryptographic primitives for IoT Crypto.
//!
//! This module provides:
//! - P-256 key generation and public key derivation
//! - ECDSA-SHA256 signing and verification (DER signatures)
//! - ECDH key agreement (X coordinate of the shared point)
//! - Cipher key derivation from shared-secret text
//! - AES-128-CCM authenticated encryption with a fixed frame
//! - Cryptographically secure random number generation

pub mod agreement;
pub mod derivation;
pub mod encryption;
pub mod keys;
pub mod random;
pub mod signing;

/// Size of a P-256 scalar or field element in bytes.
pub const SCALAR_SIZE: usize = 32;

/// Size of an SEC1 uncompressed P-256 point (`0x04 ‖ X ‖ Y`).
pub const UNCOMPRESSED_POINT_SIZE: usize = 65;
