//! Error types for the MTLSP protocol.
//!
//! Every failure is terminal for its handshake: nothing here is retried
//! internally. The caller may start a whole new handshake with fresh
//! randomness. `AuthenticationFailed` and `Denied` additionally force-close
//! the connection before the error is returned.

use thiserror::Error;

/// Errors in the framing layer.
#[derive(Debug, Error)]
pub enum FrameError {
    /// Underlying I/O failure.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Peer closed the connection mid-message.
    #[error("connection closed by peer")]
    Closed,

    /// Declared message length exceeds the receiver's capacity.
    ///
    /// Raised before any buffer is sized; this is the sole defense against a
    /// hostile peer forcing an unbounded allocation.
    #[error("declared length {declared} exceeds receive capacity {capacity}")]
    LengthTooLarge {
        /// Length announced by the peer.
        declared: usize,
        /// Receiver's declared capacity.
        capacity: usize,
    },
}

/// Errors in the crypto layer.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Key material failed validation or conversion.
    #[error("invalid key material")]
    InvalidKey,

    /// Anonymous sealing failed.
    #[error("sealing failed")]
    SealFailed,

    /// Opening a sealed message failed.
    #[error("sealed message could not be opened")]
    OpenFailed,

    /// AEAD encryption failed.
    #[error("AEAD encryption failed")]
    EncryptionFailed,

    /// AEAD decryption failed (truncated input, invalid tag, or corrupted
    /// ciphertext).
    #[error("AEAD decryption failed (invalid tag or corrupted)")]
    DecryptionFailed,
}

/// Terminal outcome of a failed handshake.
#[derive(Debug, Error)]
pub enum HandshakeError {
    /// A precondition was not met before the first byte was sent.
    #[error("precondition failed: {0}")]
    Precondition(&'static str),

    /// An expected protocol field never arrived.
    #[error("{field} not received: {source}")]
    NotReceived {
        /// Name of the missing protocol field.
        field: &'static str,
        /// The framing failure that interrupted the receive.
        source: FrameError,
    },

    /// Framing failure outside of a named field receive.
    #[error("framing error: {0}")]
    Frame(#[from] FrameError),

    /// Server signature verification failed. The connection is closed: the
    /// peer is either hostile or a man in the middle.
    #[error("server signature verification failed")]
    AuthenticationFailed,

    /// A cryptographic operation failed.
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    /// Peer explicitly rejected the session before the secret was put to use.
    /// The connection is closed.
    #[error("handshake denied by peer")]
    Denied,

    /// Peer rejected the device after the authenticated fingerprint was
    /// delivered.
    #[error("device not registered with peer")]
    DeviceNotRegistered,

    /// The fingerprint source failed to produce a payload.
    #[error("fingerprint source failed: {0}")]
    Source(std::io::Error),
}
