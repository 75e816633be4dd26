//! Anonymous public-key sealing.
//!
//! Sealed boxes encrypt to a recipient's X25519 public key without revealing
//! or requiring a sender identity: an observer can neither read the message
//! nor attribute it. The wire form is an ephemeral public key followed by
//! the box ciphertext, [`SEAL_OVERHEAD`](crate::core::SEAL_OVERHEAD) bytes of
//! overhead in total.

use rand::rngs::OsRng;

use crate::core::CryptoError;

pub use crypto_box::{PublicKey as SealingPublicKey, SecretKey as SealingSecretKey};

/// Seal `plaintext` to `recipient`.
pub fn seal_to(recipient: &SealingPublicKey, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    recipient
        .seal(&mut OsRng, plaintext)
        .map_err(|_| CryptoError::SealFailed)
}

/// Open a sealed message with the recipient's secret key.
///
/// Fails on any tampering or if the message was sealed for a different key.
pub fn open_with(secret: &SealingSecretKey, ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    secret
        .unseal(ciphertext)
        .map_err(|_| CryptoError::OpenFailed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SEAL_OVERHEAD;

    #[test]
    fn test_seal_roundtrip() {
        let secret = SealingSecretKey::generate(&mut OsRng);
        let sealed = seal_to(&secret.public_key(), b"signal").unwrap();

        assert_eq!(sealed.len(), b"signal".len() + SEAL_OVERHEAD);
        assert_eq!(open_with(&secret, &sealed).unwrap(), b"signal");
    }

    #[test]
    fn test_seal_is_randomized() {
        let secret = SealingSecretKey::generate(&mut OsRng);
        let a = seal_to(&secret.public_key(), b"signal").unwrap();
        let b = seal_to(&secret.public_key(), b"signal").unwrap();
        // Fresh ephemeral key per seal; identical plaintexts are unlinkable.
        assert_ne!(a, b);
    }

    #[test]
    fn test_open_with_wrong_key_fails() {
        let recipient = SealingSecretKey::generate(&mut OsRng);
        let other = SealingSecretKey::generate(&mut OsRng);

        let sealed = seal_to(&recipient.public_key(), b"signal").unwrap();
        assert!(matches!(
            open_with(&other, &sealed),
            Err(CryptoError::OpenFailed)
        ));
    }

    #[test]
    fn test_open_tampered_fails() {
        let secret = SealingSecretKey::generate(&mut OsRng);
        let mut sealed = seal_to(&secret.public_key(), b"signal").unwrap();
        let last = sealed.len() - 1;
        sealed[last] ^= 0x01;

        assert!(matches!(
            open_with(&secret, &sealed),
            Err(CryptoError::OpenFailed)
        ));
    }
}
