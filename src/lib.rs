//! # MTLSP Protocol
//!
//! **M**odeled-**TLS** **P**rotocol
//!
//! MTLSP is a purpose-built, reduced handshake modeled on TLS for
//! resource-constrained devices enrolling with a remote server over a plain
//! TCP byte stream. It provides:
//!
//! - **Authentication**: one signature-authenticated server, no certificate
//!   chains
//! - **Key agreement**: ephemeral X25519 per session, no cipher negotiation
//! - **Payload delivery**: one authenticated fingerprint upload and a signed
//!   acceptance decision
//! - **Simplicity**: a single fixed-order exchange; any failure aborts the
//!   session
//!
//! ## Modules
//!
//! - [`core`]: constants, error types, and collaborator traits
//! - [`transport`]: the [`Connection`] contract and length-prefixed framing
//! - [`crypto`]: AEAD, sealing, key agreement, and scoped secret types
//! - [`handshake`]: the client and server state machines
//!
//! ## Example Usage
//!
//! ```no_run
//! use mtlsp_protocol::prelude::*;
//! use std::net::TcpStream;
//!
//! fn enroll(provisioned_key: &[u8; 32], fingerprint: &[u8]) -> Result<(), HandshakeError> {
//!     let server_key = ServerIdentityKey::from_bytes(provisioned_key)
//!         .map_err(HandshakeError::Crypto)?;
//!     let mut conn = TcpStream::connect("192.0.2.1:4433")
//!         .map_err(|e| HandshakeError::Frame(e.into()))?;
//!
//!     let mut source = fingerprint;
//!     let master = ClientHandshake::new(server_key).run(&mut conn, &mut source)?;
//!
//!     // `master` now keys whatever transport layer comes next.
//!     let _ = master;
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod core;
pub mod crypto;
pub mod handshake;
pub mod transport;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::core::*;
    pub use crate::crypto::{HandshakeRandom, MasterSecret, ServerIdentityKey, ServerSigningKey};
    pub use crate::handshake::{
        ClientHandshake, FingerprintAcceptor, ServerHandshake, ServerSession,
    };
    pub use crate::transport::Connection;
}

// Re-export commonly used items at crate root
pub use crate::core::{CryptoError, FrameError, HandshakeError};
pub use crate::crypto::{MasterSecret, ServerIdentityKey, ServerSigningKey};
pub use crate::handshake::{ClientHandshake, ServerHandshake, ServerSession};
pub use crate::transport::Connection;
