//! Client role of the MTLSP handshake.

use tracing::{debug, warn};

use crate::core::{
    AEAD_NONCE_SIZE, CONFIRM_CIPHER_SIZE, FingerprintSource, HELLO_SIZE, HandshakeError,
    PUBLIC_KEY_SIZE, RANDOM_SIZE, SEALED_SIGNAL_SIZE, SIGNAL_OK, SIGNATURE_SIZE,
};
use crate::crypto::{EphemeralKeypair, HandshakeRandom, MasterSecret, ServerIdentityKey};
use crate::crypto::{aead, sealed};
use crate::transport::{Connection, framing};

use super::{hello_digest, recv_field};

/// The client side of the handshake.
///
/// Holds only immutable configuration; all per-session state lives on the
/// stack of [`run`](Self::run), so one instance may serve any number of
/// sequential handshakes (each with fresh randomness and ephemeral keys).
pub struct ClientHandshake {
    server_key: ServerIdentityKey,
}

impl ClientHandshake {
    /// Create a client configured with the provisioned server identity key.
    pub fn new(server_key: ServerIdentityKey) -> Self {
        Self { server_key }
    }

    /// Run one handshake over `conn`, delivering the fingerprint from
    /// `source` once the shared secret is established.
    ///
    /// Strictly linear; every failure is terminal for this session. On
    /// signature failure or explicit denial the connection is closed before
    /// returning. On success the caller owns the [`MasterSecret`] for any
    /// subsequent transport layer.
    pub fn run<C, S>(&self, conn: &mut C, source: &mut S) -> Result<MasterSecret, HandshakeError>
    where
        C: Connection,
        S: FingerprintSource,
    {
        // Init
        if !conn.is_connected() {
            return Err(HandshakeError::Precondition("connection not established"));
        }
        let client_random = HandshakeRandom::generate();
        framing::write_all(conn, client_random.as_bytes())?;
        debug!("client random sent");

        // AwaitServerHello
        let mut server_random = [0u8; RANDOM_SIZE];
        recv_field(conn, &mut server_random, "server_random")?;
        let mut server_eph_pub = [0u8; PUBLIC_KEY_SIZE];
        recv_field(conn, &mut server_eph_pub, "server_ephemeral_public")?;
        let mut signature = [0u8; SIGNATURE_SIZE];
        recv_field(conn, &mut signature, "signature")?;
        let server_random = HandshakeRandom::from_bytes(server_random);

        // VerifyServer
        let digest = hello_digest(&server_eph_pub, &client_random, &server_random);
        if !self.server_key.verify(&digest, &signature) {
            warn!("server hello signature rejected, closing connection");
            conn.close();
            return Err(HandshakeError::AuthenticationFailed);
        }
        debug!("server hello verified");

        // GenerateEphemeral
        let ephemeral = EphemeralKeypair::generate();
        let sealing_key = self.server_key.to_agreement_key();

        // SendSealedHello
        let mut hello = [0u8; HELLO_SIZE];
        hello[..PUBLIC_KEY_SIZE].copy_from_slice(&ephemeral.public_bytes());
        hello[PUBLIC_KEY_SIZE..PUBLIC_KEY_SIZE + RANDOM_SIZE]
            .copy_from_slice(client_random.as_bytes());
        hello[PUBLIC_KEY_SIZE + RANDOM_SIZE..].copy_from_slice(server_random.as_bytes());
        let sealed_hello = sealed::seal_to(&sealing_key, &hello)?;
        framing::write_all(conn, &sealed_hello)?;

        // AwaitConfirmation1
        let mut sealed_signal = [0u8; SEALED_SIGNAL_SIZE];
        recv_field(conn, &mut sealed_signal, "sealed confirmation")?;
        let signal = ephemeral.open_sealed(&sealed_signal)?;
        if signal != [SIGNAL_OK] {
            warn!("peer denied the session, closing connection");
            conn.close();
            return Err(HandshakeError::Denied);
        }

        // DeriveSecret
        let pre_master = ephemeral.diffie_hellman(&server_eph_pub)?;
        let master = MasterSecret::derive(pre_master, &client_random, &server_random);
        debug!("master secret derived");

        // SendFingerprint
        let fingerprint = source.fingerprint().map_err(HandshakeError::Source)?;
        let nonce = aead::random_nonce();
        let ciphertext = aead::seal(&master, &nonce, &fingerprint, &[])?;
        framing::write_all(conn, &nonce)?;
        framing::send(conn, &ciphertext)?;
        debug!(len = fingerprint.len(), "fingerprint sent");

        // AwaitConfirmation2
        let mut server_nonce = [0u8; AEAD_NONCE_SIZE];
        recv_field(conn, &mut server_nonce, "confirmation nonce")?;
        let mut confirm_cipher = [0u8; CONFIRM_CIPHER_SIZE];
        recv_field(conn, &mut confirm_cipher, "confirmation ciphertext")?;
        let confirm = aead::open(&master, &server_nonce, &confirm_cipher, &[])?;
        if confirm != [SIGNAL_OK] {
            return Err(HandshakeError::DeviceNotRegistered);
        }

        // Established
        debug!("handshake established");
        Ok(master)
    }
}
