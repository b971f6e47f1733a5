//! IoT Crypto C FFI bindings.
//!
//! Provides a C-compatible API over the hex-string operations: key
//! generation and derivation, signing and verification, key agreement,
//! and frame encryption.
//!
//! # Memory contract
//!
//! - All `*mut c_char` output strings are heap-allocated via [`CString`] and
//!   **must** be freed by the caller using [`iotc_free_string`].
//! - Byte buffers written by [`iotc_decrypt`] **must** be freed with
//!   [`iotc_free_bytes`], passing back the length that was reported.
//! - Both free functions wipe the memory before releasing it.
//! - The static string returned by [`iotc_version`] must **not** be freed.
//!
//! Messages and plaintexts are passed as `(pointer, length)` pairs so they
//! may contain NUL bytes. A zero length accepts a null pointer.
//!
//! # Error codes
//!
//! | Constant                   | Value | Meaning                               |
//! |----------------------------|-------|---------------------------------------|
//! | `IOTC_OK`                  | 0     | Success                               |
//! | `IOTC_ERR_NULL_PTR`        | -1    | A required pointer was null           |
//! | `IOTC_ERR_INVALID_UTF8`    | -2    | A string was not valid UTF-8          |
//! | `IOTC_ERR_ENCODING`        | -3    | Malformed hex                         |
//! | `IOTC_ERR_KEY_GENERATION`  | -4    | Random source or key generation failed|
//! | `IOTC_ERR_INVALID_KEY`     | -5    | Unparseable or off-curve key          |
//! | `IOTC_ERR_SIGNING`         | -6    | Signing primitive failed              |
//! | `IOTC_ERR_ENCRYPTION`      | -7    | Cipher rejected its parameters        |
//! | `IOTC_ERR_FRAME`           | -8    | Encrypted frame shorter than 28 bytes |
//! | `IOTC_ERR_AUTHENTICATION`  | -9    | Authentication tag did not verify     |

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use libc::size_t;
use zeroize::Zeroize;

use iot_crypto::{
    agree, decrypt, derive_public_key, encrypt, generate_private_key, sign, verify, CryptoError,
};

// ── Error codes ───────────────────────────────────────────────────────────────

/// Success.
pub const IOTC_OK: i32 = 0;
/// A required pointer argument was null.
pub const IOTC_ERR_NULL_PTR: i32 = -1;
/// A string argument contained invalid UTF-8.
pub const IOTC_ERR_INVALID_UTF8: i32 = -2;
/// A hex argument was malformed.
pub const IOTC_ERR_ENCODING: i32 = -3;
/// Key generation failed.
pub const IOTC_ERR_KEY_GENERATION: i32 = -4;
/// A key was unparseable, out of range, or off the curve.
pub const IOTC_ERR_INVALID_KEY: i32 = -5;
/// The signing primitive failed.
pub const IOTC_ERR_SIGNING: i32 = -6;
/// The cipher rejected its parameters.
pub const IOTC_ERR_ENCRYPTION: i32 = -7;
/// The encrypted frame was shorter than nonce plus tag.
pub const IOTC_ERR_FRAME: i32 = -8;
/// The authentication tag did not verify.
pub const IOTC_ERR_AUTHENTICATION: i32 = -9;

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Convert a `*const c_char` to a `&str`, returning an error code on failure.
///
/// # Safety
///
/// `ptr` must either be null (handled gracefully) or point to a valid,
/// null-terminated C string that remains valid for the duration of `'a`.
unsafe fn cstr_to_str<'a>(ptr: *const c_char) -> Result<&'a str, i32> {
    if ptr.is_null() {
        return Err(IOTC_ERR_NULL_PTR);
    }
    CStr::from_ptr(ptr)
        .to_str()
        .map_err(|_| IOTC_ERR_INVALID_UTF8)
}

/// Borrow a `(pointer, length)` byte buffer.
///
/// # Safety
///
/// When `len > 0`, `ptr` must point to `len` readable bytes valid for `'a`.
unsafe fn bytes_from_raw<'a>(ptr: *const u8, len: size_t) -> Result<&'a [u8], i32> {
    if len == 0 {
        return Ok(&[]);
    }
    if ptr.is_null() {
        return Err(IOTC_ERR_NULL_PTR);
    }
    Ok(std::slice::from_raw_parts(ptr, len))
}

/// Allocate a `CString` and write it into `*out`.
///
/// # Safety
///
/// `out` must be null (rejected) or valid for writes.
unsafe fn write_string_out(s: String, out: *mut *mut c_char) -> i32 {
    if out.is_null() {
        return IOTC_ERR_NULL_PTR;
    }
    // Hex output never contains interior NUL bytes.
    match CString::new(s) {
        Ok(cs) => {
            *out = cs.into_raw();
            IOTC_OK
        }
        Err(_) => IOTC_ERR_ENCODING,
    }
}

/// Map a [`CryptoError`] to one of the `IOTC_ERR_*` constants.
fn map_error(e: &CryptoError) -> i32 {
    match e {
        CryptoError::InvalidEncoding(_) => IOTC_ERR_ENCODING,
        CryptoError::KeyGenerationFailed(_) => IOTC_ERR_KEY_GENERATION,
        CryptoError::InvalidKey(_) => IOTC_ERR_INVALID_KEY,
        CryptoError::SigningFailed(_) => IOTC_ERR_SIGNING,
        CryptoError::EncryptionFailed(_) => IOTC_ERR_ENCRYPTION,
        CryptoError::InvalidFrame { .. } => IOTC_ERR_FRAME,
        CryptoError::AuthenticationFailed => IOTC_ERR_AUTHENTICATION,
    }
}

/// Write a successful string result into `*out`, or map the error.
///
/// # Safety
///
/// Same contract as [`write_string_out`].
unsafe fn string_result(result: iot_crypto::Result<String>, out: *mut *mut c_char) -> i32 {
    match result {
        Ok(s) => write_string_out(s, out),
        Err(e) => map_error(&e),
    }
}

// ── Version ───────────────────────────────────────────────────────────────────

/// Return the library version string as a null-terminated C string.
///
/// The caller **must not** free this pointer.
#[no_mangle]
pub extern "C" fn iotc_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}

// ── Keys ──────────────────────────────────────────────────────────────────────

/// Generate a private key and write its 64-char hex into `*private_key_out`.
///
/// # Safety
///
/// `private_key_out` must be non-null and valid for writes.
#[no_mangle]
pub unsafe extern "C" fn iotc_generate_private_key(private_key_out: *mut *mut c_char) -> i32 {
    if private_key_out.is_null() {
        return IOTC_ERR_NULL_PTR;
    }
    string_result(generate_private_key(), private_key_out)
}

/// Derive the 130-char uncompressed public key for a hex private key.
///
/// # Safety
///
/// `private_key` must be a valid C string; `public_key_out` must be non-null.
#[no_mangle]
pub unsafe extern "C" fn iotc_derive_public_key(
    private_key: *const c_char,
    public_key_out: *mut *mut c_char,
) -> i32 {
    let private_key = match cstr_to_str(private_key) {
        Ok(s) => s,
        Err(e) => return e,
    };
    if public_key_out.is_null() {
        return IOTC_ERR_NULL_PTR;
    }
    string_result(derive_public_key(private_key), public_key_out)
}

// ── Signatures ────────────────────────────────────────────────────────────────

/// Sign `message[..message_len]` and write the hex DER signature.
///
/// # Safety
///
/// `message` must point to `message_len` readable bytes (or be null when the
/// length is zero); `private_key` must be a valid C string;
/// `signature_out` must be non-null.
#[no_mangle]
pub unsafe extern "C" fn iotc_sign(
    message: *const u8,
    message_len: size_t,
    private_key: *const c_char,
    signature_out: *mut *mut c_char,
) -> i32 {
    let message = match bytes_from_raw(message, message_len) {
        Ok(m) => m,
        Err(e) => return e,
    };
    let private_key = match cstr_to_str(private_key) {
        Ok(s) => s,
        Err(e) => return e,
    };
    if signature_out.is_null() {
        return IOTC_ERR_NULL_PTR;
    }
    string_result(sign(message, private_key), signature_out)
}

/// Verify a hex signature. Returns 1 when valid, 0 otherwise.
///
/// Malformed or null arguments also return 0.
///
/// # Safety
///
/// Non-null pointers must be valid C strings / readable buffers.
#[no_mangle]
pub unsafe extern "C" fn iotc_verify(
    signature: *const c_char,
    message: *const u8,
    message_len: size_t,
    public_key: *const c_char,
) -> i32 {
    let (Ok(signature), Ok(message), Ok(public_key)) = (
        cstr_to_str(signature),
        bytes_from_raw(message, message_len),
        cstr_to_str(public_key),
    ) else {
        return 0;
    };
    i32::from(verify(signature, message, public_key))
}

// ── Key agreement ─────────────────────────────────────────────────────────────

/// Derive the 64-char hex ECDH shared secret.
///
/// # Safety
///
/// Both key pointers must be valid C strings; `shared_out` must be non-null.
#[no_mangle]
pub unsafe extern "C" fn iotc_agree(
    own_private_key: *const c_char,
    peer_public_key: *const c_char,
    shared_out: *mut *mut c_char,
) -> i32 {
    let own = match cstr_to_str(own_private_key) {
        Ok(s) => s,
        Err(e) => return e,
    };
    let peer = match cstr_to_str(peer_public_key) {
        Ok(s) => s,
        Err(e) => return e,
    };
    if shared_out.is_null() {
        return IOTC_ERR_NULL_PTR;
    }
    string_result(agree(own, peer), shared_out)
}

// ── Encryption ────────────────────────────────────────────────────────────────

/// Encrypt `plaintext[..plaintext_len]` and write the hex frame.
///
/// # Safety
///
/// `key` must be a valid C string; `plaintext` must point to
/// `plaintext_len` readable bytes (or be null when zero); `encrypted_out`
/// must be non-null.
#[no_mangle]
pub unsafe extern "C" fn iotc_encrypt(
    key: *const c_char,
    plaintext: *const u8,
    plaintext_len: size_t,
    encrypted_out: *mut *mut c_char,
) -> i32 {
    let key = match cstr_to_str(key) {
        Ok(s) => s,
        Err(e) => return e,
    };
    let plaintext = match bytes_from_raw(plaintext, plaintext_len) {
        Ok(p) => p,
        Err(e) => return e,
    };
    if encrypted_out.is_null() {
        return IOTC_ERR_NULL_PTR;
    }
    string_result(encrypt(key, plaintext), encrypted_out)
}

/// Decrypt a hex frame into a heap buffer.
///
/// On success `*plaintext_out` receives the buffer (null for an empty
/// plaintext) and `*plaintext_len_out` its length. Nothing is written when
/// authentication fails.
///
/// # Safety
///
/// `key` and `encrypted` must be valid C strings; both out pointers must be
/// non-null.
#[no_mangle]
pub unsafe extern "C" fn iotc_decrypt(
    key: *const c_char,
    encrypted: *const c_char,
    plaintext_out: *mut *mut u8,
    plaintext_len_out: *mut size_t,
) -> i32 {
    let key = match cstr_to_str(key) {
        Ok(s) => s,
        Err(e) => return e,
    };
    let encrypted = match cstr_to_str(encrypted) {
        Ok(s) => s,
        Err(e) => return e,
    };
    if plaintext_out.is_null() || plaintext_len_out.is_null() {
        return IOTC_ERR_NULL_PTR;
    }
    match decrypt(key, encrypted) {
        Ok(plaintext) => {
            let len = plaintext.len();
            *plaintext_out = if len == 0 {
                std::ptr::null_mut()
            } else {
                Box::into_raw(plaintext.into_boxed_slice()) as *mut u8
            };
            *plaintext_len_out = len;
            IOTC_OK
        }
        Err(e) => map_error(&e),
    }
}

// ── Cleanup ───────────────────────────────────────────────────────────────────

/// Wipe and free a string allocated by this library. `NULL` is a no-op.
///
/// # Safety
///
/// `s` must be null or a pointer returned by an `iotc_*` function that has
/// not already been freed.
#[no_mangle]
pub unsafe extern "C" fn iotc_free_string(s: *mut c_char) {
    if !s.is_null() {
        let mut bytes = CString::from_raw(s).into_bytes();
        bytes.zeroize();
    }
}

/// Wipe and free a buffer written by [`iotc_decrypt`]. `NULL` is a no-op.
///
/// # Safety
///
/// `ptr`/`len` must be exactly the pair reported by [`iotc_decrypt`], not
/// already freed.
#[no_mangle]
pub unsafe extern "C" fn iotc_free_bytes(ptr: *mut u8, len: size_t) {
    if !ptr.is_null() {
        let mut buf: Box<[u8]> = Box::from_raw(std::ptr::slice_from_raw_parts_mut(ptr, len));
        buf.zeroize();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
