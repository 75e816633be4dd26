//! Server role of the MTLSP handshake.
//!
//! The mirror of the client state machine, mainly exercised by tests and
//! reference deployments; a production enrollment service follows this
//! contract.

use tracing::{debug, warn};

use crate::core::{
    AEAD_NONCE_SIZE, DEFAULT_RECV_CAPACITY, HELLO_SIZE, HandshakeError, PUBLIC_KEY_SIZE,
    RANDOM_SIZE, SEALED_HELLO_SIZE, SIGNAL_NOK, SIGNAL_OK,
};
use crate::crypto::{EphemeralKeypair, HandshakeRandom, MasterSecret, ServerSigningKey};
use crate::crypto::{aead, sealed};
use crate::transport::{Connection, framing};

use super::{hello_digest, recv_field};

/// The registration decision for a delivered fingerprint.
pub trait FingerprintAcceptor {
    /// Whether the device presenting this fingerprint is registered.
    fn accept(&mut self, fingerprint: &[u8]) -> bool;
}

impl<F: FnMut(&[u8]) -> bool> FingerprintAcceptor for F {
    fn accept(&mut self, fingerprint: &[u8]) -> bool {
        self(fingerprint)
    }
}

/// Result of a successful server-side handshake.
pub struct ServerSession {
    /// The shared secret, identical to the client's.
    pub master_secret: MasterSecret,
    /// The authenticated fingerprint the device delivered.
    pub fingerprint: Vec<u8>,
}

/// The server side of the handshake.
pub struct ServerHandshake<A> {
    signing_key: ServerSigningKey,
    acceptor: A,
    recv_capacity: usize,
}

impl<A: FingerprintAcceptor> ServerHandshake<A> {
    /// Create a server from its long-term signing key and a registration
    /// decision.
    pub fn new(signing_key: ServerSigningKey, acceptor: A) -> Self {
        Self {
            signing_key,
            acceptor,
            recv_capacity: DEFAULT_RECV_CAPACITY,
        }
    }

    /// Override the receive capacity for framed messages.
    pub fn with_recv_capacity(mut self, capacity: usize) -> Self {
        self.recv_capacity = capacity;
        self
    }

    /// Serve one handshake over `conn`.
    ///
    /// Mirrors the client's linear state order. A rejected device yields
    /// `DeviceNotRegistered` after the NOK confirmation has been sent, so
    /// the peer learns the outcome before the error surfaces here.
    pub fn run<C: Connection>(&mut self, conn: &mut C) -> Result<ServerSession, HandshakeError> {
        if !conn.is_connected() {
            return Err(HandshakeError::Precondition("connection not established"));
        }

        // Client random
        let mut client_random = [0u8; RANDOM_SIZE];
        recv_field(conn, &mut client_random, "client_random")?;
        let client_random = HandshakeRandom::from_bytes(client_random);

        // Signed server hello
        let server_random = HandshakeRandom::generate();
        let ephemeral = EphemeralKeypair::generate();
        let eph_pub = ephemeral.public_bytes();
        let digest = hello_digest(&eph_pub, &client_random, &server_random);
        let signature = self.signing_key.sign(&digest);

        framing::write_all(conn, server_random.as_bytes())?;
        framing::write_all(conn, &eph_pub)?;
        framing::write_all(conn, &signature)?;
        debug!("server hello sent");

        // Sealed client hello
        let mut sealed_hello = [0u8; SEALED_HELLO_SIZE];
        recv_field(conn, &mut sealed_hello, "sealed client hello")?;
        let hello = sealed::open_with(&self.signing_key.to_agreement_secret(), &sealed_hello)?;
        if hello.len() != HELLO_SIZE {
            warn!("malformed client hello, closing connection");
            conn.close();
            return Err(HandshakeError::Denied);
        }

        let mut client_eph_pub = [0u8; PUBLIC_KEY_SIZE];
        client_eph_pub.copy_from_slice(&hello[..PUBLIC_KEY_SIZE]);
        let recipient = sealed::SealingPublicKey::from(client_eph_pub);

        // The echoed randoms bind the sealed hello to this session; a
        // mismatch means replay or splicing.
        let randoms_match = hello[PUBLIC_KEY_SIZE..PUBLIC_KEY_SIZE + RANDOM_SIZE]
            == *client_random.as_bytes()
            && hello[PUBLIC_KEY_SIZE + RANDOM_SIZE..] == *server_random.as_bytes();
        if !randoms_match {
            warn!("client hello randoms mismatch, denying");
            let sealed_nok = sealed::seal_to(&recipient, &[SIGNAL_NOK])?;
            framing::write_all(conn, &sealed_nok)?;
            conn.close();
            return Err(HandshakeError::Denied);
        }

        let sealed_ok = sealed::seal_to(&recipient, &[SIGNAL_OK])?;
        framing::write_all(conn, &sealed_ok)?;

        // Derive
        let pre_master = ephemeral.diffie_hellman(&client_eph_pub)?;
        let master = MasterSecret::derive(pre_master, &client_random, &server_random);
        debug!("master secret derived");

        // Fingerprint
        let mut nonce = [0u8; AEAD_NONCE_SIZE];
        recv_field(conn, &mut nonce, "fingerprint nonce")?;
        let ciphertext = framing::receive(conn, self.recv_capacity)?;
        let fingerprint = aead::open(&master, &nonce, &ciphertext, &[])?;
        debug!(len = fingerprint.len(), "fingerprint received");

        // Decision
        let accepted = self.acceptor.accept(&fingerprint);
        let signal = if accepted { SIGNAL_OK } else { SIGNAL_NOK };
        let reply_nonce = aead::random_nonce();
        let confirm = aead::seal(&master, &reply_nonce, &[signal], &[])?;
        framing::write_all(conn, &reply_nonce)?;
        framing::write_all(conn, &confirm)?;

        if !accepted {
            return Err(HandshakeError::DeviceNotRegistered);
        }

        debug!("handshake established");
        Ok(ServerSession {
            master_secret: master,
            fingerprint,
        })
    }
}
