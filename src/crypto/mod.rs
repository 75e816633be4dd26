//! MTLSP crypto layer.
//!
//! The handshake chains four primitives, each living in its own module:
//!
//! - OS randomness and scoped secret types ([`secrets`], always zeroized)
//! - Ed25519 signature verification and X25519 key agreement ([`keys`])
//! - anonymous public-key sealing ([`sealed`])
//! - AES-256-GCM authenticated encryption ([`aead`])

pub mod aead;
mod keys;
pub mod sealed;
mod secrets;

pub use keys::{EphemeralKeypair, ServerIdentityKey, ServerSigningKey};
pub use secrets::{HandshakeRandom, MasterSecret, PreMasterSecret};
