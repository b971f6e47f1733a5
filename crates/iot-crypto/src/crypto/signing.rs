//! ECDSA-SHA256 signing and verification over P-256.
//!
//! Signatures are ASN.1 DER `SEQUENCE { r, s }`, hex-encoded. Signing draws
//! fresh randomness per call, so two signatures over the same message
//! differ; verification accepts any of them.
//!
//! `verify` answers with a plain `bool`. A malformed signature or public
//! key is reported as `false` rather than as an error, so callers handle a
//! single outcome for every input they cannot trust.

use p256::ecdsa::signature::{DigestVerifier, RandomizedDigestSigner};
use p256::ecdsa::{Signature, SigningKey, VerifyingKey};
use sha2::{Digest, Sha256};

use crate::crypto::keys::{PrivateKey, PublicKey};
use crate::encoding;
use crate::error::{CryptoError, Result};

/// Sign a message, returning the DER-encoded signature bytes.
pub fn sign_with(private_key: &PrivateKey, message: &[u8]) -> Result<Vec<u8>> {
    let signing_key = SigningKey::from(private_key.secret());
    let signature: Signature = signing_key
        .try_sign_digest_with_rng(&mut rand::thread_rng(), Sha256::new_with_prefix(message))
        .map_err(|e| CryptoError::SigningFailed(e.to_string()))?;
    Ok(signature.to_der().as_bytes().to_vec())
}

/// Verify DER signature bytes against a public key and message.
pub fn verify_with(public_key: &PublicKey, message: &[u8], signature_der: &[u8]) -> bool {
    let signature = match Signature::from_der(signature_der) {
        Ok(signature) => signature,
        Err(_) => {
            log::debug!("signature rejected: not a DER (r, s) pair");
            return false;
        }
    };
    let verifying_key = VerifyingKey::from(public_key.point());
    verifying_key
        .verify_digest(Sha256::new_with_prefix(message), &signature)
        .is_ok()
}

/// Sign a message with a hex private key and return the hex DER signature.
pub fn sign(message: impl AsRef<[u8]>, private_key_hex: &str) -> Result<String> {
    let message = message.as_ref();
    let private_key = PrivateKey::from_hex(private_key_hex)?;
    let der = sign_with(&private_key, message)?;
    log::debug!(
        "signed {} byte message, {} byte signature",
        message.len(),
        der.len()
    );
    Ok(encoding::encode(der))
}

/// Verify a hex DER signature against a message and hex public key.
///
/// Returns `false` for invalid signatures and for any malformed input.
pub fn verify(signature_hex: &str, message: impl AsRef<[u8]>, public_key_hex: &str) -> bool {
    let Ok(signature_der) = encoding::decode(signature_hex) else {
        log::debug!("signature rejected: malformed hex");
        return false;
    };
    let Ok(public_key) = PublicKey::from_hex(public_key_hex) else {
        log::debug!("signature rejected: invalid public key");
        return false;
    };
    verify_with(&public_key, message.as_ref(), &signature_der)
}
