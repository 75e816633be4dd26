//! Asymmetric key management.
//!
//! Two key families meet here: the server's long-term Ed25519 identity key
//! (signatures) and the per-handshake X25519 ephemeral pairs (key agreement).
//! The identity key doubles as a sealing recipient after conversion to its
//! curve25519 form, the same algebraic key material reinterpreted for
//! Diffie-Hellman rather than signing.

use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use x25519_dalek::{PublicKey, StaticSecret};

use crate::core::{CryptoError, PUBLIC_KEY_SIZE, SIGNATURE_SIZE};

use super::sealed::{SealingPublicKey, SealingSecretKey};
use super::secrets::PreMasterSecret;

/// A single-use X25519 key-agreement pair, generated fresh per handshake.
///
/// The secret half never leaves this type and is zeroized when the pair is
/// dropped, whatever the handshake outcome.
pub struct EphemeralKeypair {
    secret: StaticSecret,
    public: PublicKey,
}

impl EphemeralKeypair {
    /// Generate a fresh keypair from the OS CSPRNG.
    pub fn generate() -> Self {
        let secret = StaticSecret::random_from_rng(OsRng);
        let public = PublicKey::from(&secret);
        Self { secret, public }
    }

    /// The public half, as wire bytes.
    pub fn public_bytes(&self) -> [u8; PUBLIC_KEY_SIZE] {
        self.public.to_bytes()
    }

    /// Open a message that was sealed for this keypair.
    pub fn open_sealed(&self, ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let secret = SealingSecretKey::from(self.secret.to_bytes());
        super::sealed::open_with(&secret, ciphertext)
    }

    /// Scalar-multiply our secret with the peer's ephemeral public key,
    /// consuming the pair.
    ///
    /// Fails if the peer supplied a degenerate public key (the shared point
    /// would be all zeroes).
    pub fn diffie_hellman(
        self,
        peer_public: &[u8; PUBLIC_KEY_SIZE],
    ) -> Result<PreMasterSecret, CryptoError> {
        let shared = self.secret.diffie_hellman(&PublicKey::from(*peer_public));
        if !shared.was_contributory() {
            return Err(CryptoError::InvalidKey);
        }
        Ok(PreMasterSecret::from_bytes(*shared.as_bytes()))
    }
}

/// The server's long-term signature verification key.
///
/// Provisioned out-of-band into the device and immutable for its lifetime;
/// it is configuration, not protocol state.
#[derive(Clone)]
pub struct ServerIdentityKey(VerifyingKey);

impl ServerIdentityKey {
    /// Parse the provisioned key bytes.
    pub fn from_bytes(bytes: &[u8; PUBLIC_KEY_SIZE]) -> Result<Self, CryptoError> {
        VerifyingKey::from_bytes(bytes)
            .map(Self)
            .map_err(|_| CryptoError::InvalidKey)
    }

    /// Verify a detached signature over `message`.
    pub fn verify(&self, message: &[u8], signature: &[u8; SIGNATURE_SIZE]) -> bool {
        let signature = Signature::from_bytes(signature);
        self.0.verify_strict(message, &signature).is_ok()
    }

    /// Reinterpret the Ed25519 key as an X25519 sealing recipient.
    pub fn to_agreement_key(&self) -> SealingPublicKey {
        SealingPublicKey::from(self.0.to_montgomery().to_bytes())
    }

    /// The raw key bytes.
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_SIZE] {
        self.0.as_bytes()
    }
}

/// The server's long-term Ed25519 signing key (server role and tests).
pub struct ServerSigningKey(SigningKey);

impl ServerSigningKey {
    /// Generate a new signing key.
    pub fn generate() -> Self {
        Self(SigningKey::generate(&mut OsRng))
    }

    /// Restore a signing key from its 32-byte seed.
    pub fn from_bytes(bytes: &[u8; 32]) -> Self {
        Self(SigningKey::from_bytes(bytes))
    }

    /// The verification key clients are provisioned with.
    pub fn identity_key(&self) -> ServerIdentityKey {
        ServerIdentityKey(self.0.verifying_key())
    }

    /// Produce a detached signature over `message`.
    pub fn sign(&self, message: &[u8]) -> [u8; SIGNATURE_SIZE] {
        self.0.sign(message).to_bytes()
    }

    /// The X25519 secret matching [`ServerIdentityKey::to_agreement_key`],
    /// used to open sealed client hellos.
    pub fn to_agreement_secret(&self) -> SealingSecretKey {
        SealingSecretKey::from(self.0.to_scalar_bytes())
    }
}
