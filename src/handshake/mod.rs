//! MTLSP handshake state machine.
//!
//! A single fixed-order exchange, not a negotiable one: each role walks a
//! strictly linear sequence of states and any failure is terminal. The wire
//! protocol (all integers big-endian):
//!
//! ```text
//! C -> S   client_random                                        32
//! S -> C   server_random                                        32
//! S -> C   server_ephemeral_public                              32
//! S -> C   sig(SHA-256(server_eph_pub || c_random || s_random)) 64
//! C -> S   sealed(client_eph_pub || c_random || s_random)       144
//! S -> C   sealed(OK/NOK)                                       49
//! C -> S   nonce                                                12
//! C -> S   length-prefixed AEAD(fingerprint)                    4 + n + 16
//! S -> C   nonce                                                12
//! S -> C   AEAD(OK/NOK)                                         17
//! ```
//!
//! Fixed-size fields travel raw; only the variable-length fingerprint
//! message is framed.
//!
//! Note: the signed digest binds only the ephemeral key and the two randoms.
//! It carries no protocol version or message-type tag, so it offers no
//! domain separation from other uses of the server identity key.

mod client;
mod server;

use sha2::{Digest, Sha256};

use crate::core::{HandshakeError, PUBLIC_KEY_SIZE};
use crate::crypto::HandshakeRandom;
use crate::transport::{Connection, framing};

pub use client::ClientHandshake;
pub use server::{FingerprintAcceptor, ServerHandshake, ServerSession};

/// The digest the server signs in its hello:
/// `SHA-256(server_ephemeral_public ‖ client_random ‖ server_random)`.
///
/// Byte order is load-bearing; both sides must hash in exactly this order
/// or verification fails.
pub fn hello_digest(
    server_ephemeral_public: &[u8; PUBLIC_KEY_SIZE],
    client_random: &HandshakeRandom,
    server_random: &HandshakeRandom,
) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(server_ephemeral_public);
    hasher.update(client_random.as_bytes());
    hasher.update(server_random.as_bytes());
    hasher.finalize().into()
}

/// Receive a fixed-size protocol field, naming it in the failure.
fn recv_field<C: Connection>(
    conn: &mut C,
    buf: &mut [u8],
    field: &'static str,
) -> Result<(), HandshakeError> {
    framing::read_exact(conn, buf).map_err(|source| HandshakeError::NotReceived { field, source })
}
