//! Secret and random value types.
//!
//! Each value the handshake derives lives in its own scoped type with
//! guaranteed zeroing on drop. No secret is ever held in shared or static
//! storage; the state machine instance owns every copy.

use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::core::{AEAD_KEY_SIZE, RANDOM_SIZE};

/// 32 bytes of cryptographically secure randomness.
///
/// One is generated per handshake per side and never reused across sessions.
/// The value travels in the clear, so it is plain data rather than a secret.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HandshakeRandom([u8; RANDOM_SIZE]);

impl HandshakeRandom {
    /// Generate a fresh random from the OS CSPRNG.
    pub fn generate() -> Self {
        let mut bytes = [0u8; RANDOM_SIZE];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Wrap raw bytes received from the peer.
    pub fn from_bytes(bytes: [u8; RANDOM_SIZE]) -> Self {
        Self(bytes)
    }

    /// The raw bytes.
    pub fn as_bytes(&self) -> &[u8; RANDOM_SIZE] {
        &self.0
    }
}

/// Output of the ephemeral key agreement.
///
/// Exists only between the scalar multiplication and the master-secret
/// derivation, is never written to the wire, and is zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct PreMasterSecret([u8; 32]);

impl PreMasterSecret {
    pub(crate) fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl std::fmt::Debug for PreMasterSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PreMasterSecret(..)")
    }
}

/// The sole secret surviving a successful handshake.
///
/// `MasterSecret = SHA-256(pre_master ‖ client_random ‖ server_random)`.
/// Both sides compute it independently from the exchanged randoms and their
/// never-transmitted ephemeral secrets. It keys the AEAD fingerprint exchange
/// and whatever transport layer the caller stacks on top. Zeroized on drop,
/// including on every failure path.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct MasterSecret([u8; AEAD_KEY_SIZE]);

impl MasterSecret {
    /// Derive the master secret, consuming (and thereby zeroizing) the
    /// pre-master secret.
    pub fn derive(
        pre_master: PreMasterSecret,
        client_random: &HandshakeRandom,
        server_random: &HandshakeRandom,
    ) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(pre_master.as_bytes());
        hasher.update(client_random.as_bytes());
        hasher.update(server_random.as_bytes());

        let mut key = [0u8; AEAD_KEY_SIZE];
        key.copy_from_slice(&hasher.finalize());
        Self(key)
    }

    /// Restore a master secret from raw bytes (e.g. for a transport layer
    /// that persists sessions).
    pub fn from_bytes(bytes: [u8; AEAD_KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// The raw key bytes.
    ///
    /// Handle with care - this exposes sensitive key material.
    pub fn as_bytes(&self) -> &[u8; AEAD_KEY_SIZE] {
        &self.0
    }
}

impl std::fmt::Debug for MasterSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("MasterSecret(..)")
    }
}
