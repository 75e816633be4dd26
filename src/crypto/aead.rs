//! AES-256-GCM authenticated encryption.
//!
//! 256-bit key, 96-bit nonce, 128-bit tag appended to the ciphertext.
//! Decryption verifies the tag before releasing any plaintext; a failed open
//! never returns partial output.

use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use rand::{RngCore, rngs::OsRng};

use crate::core::{AEAD_NONCE_SIZE, AEAD_TAG_SIZE, CryptoError};

use super::secrets::MasterSecret;

/// Encrypt `plaintext`, appending the 16-byte tag.
///
/// Output length is `plaintext.len() + 16`.
pub fn seal(
    key: &MasterSecret,
    nonce: &[u8; AEAD_NONCE_SIZE],
    plaintext: &[u8],
    associated_data: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()));
    cipher
        .encrypt(
            Nonce::from_slice(nonce),
            Payload {
                msg: plaintext,
                aad: associated_data,
            },
        )
        .map_err(|_| CryptoError::EncryptionFailed)
}

/// Verify and decrypt `ciphertext` (which carries its tag).
///
/// Fails if the input is too short to contain a tag, or if the tag does not
/// verify. On success returns exactly `ciphertext.len() - 16` bytes.
pub fn open(
    key: &MasterSecret,
    nonce: &[u8; AEAD_NONCE_SIZE],
    ciphertext: &[u8],
    associated_data: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    if ciphertext.len() < AEAD_TAG_SIZE {
        return Err(CryptoError::DecryptionFailed);
    }

    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()));
    cipher
        .decrypt(
            Nonce::from_slice(nonce),
            Payload {
                msg: ciphertext,
                aad: associated_data,
            },
        )
        .map_err(|_| CryptoError::DecryptionFailed)
}

/// A fresh random nonce.
///
/// The nonce is caller-supplied by design: uniqueness per (key, direction)
/// is the caller's obligation. The handshake sends two AEAD messages per
/// master secret, so random nonces are safe here; a transport reusing the
/// key for many messages must switch to counter nonces instead.
pub fn random_nonce() -> [u8; AEAD_NONCE_SIZE] {
    let mut nonce = [0u8; AEAD_NONCE_SIZE];
    OsRng.fill_bytes(&mut nonce);
    nonce
}
