//! Protocol constants for MTLSP.
//!
//! These values are fixed by the wire protocol and MUST NOT be changed:
//! both ends size their reads from them.

// =============================================================================
// CRYPTOGRAPHIC CONSTANTS
// =============================================================================

/// Handshake random size (client_random, server_random).
pub const RANDOM_SIZE: usize = 32;

/// X25519 / Ed25519 public key size.
pub const PUBLIC_KEY_SIZE: usize = 32;

/// Ed25519 detached signature size.
pub const SIGNATURE_SIZE: usize = 64;

/// AES-256-GCM key size.
pub const AEAD_KEY_SIZE: usize = 32;

/// AES-256-GCM nonce size (96 bits).
pub const AEAD_NONCE_SIZE: usize = 12;

/// AES-256-GCM authentication tag size (128 bits).
pub const AEAD_TAG_SIZE: usize = 16;

/// Sealed-box overhead: ephemeral X25519 public key plus Poly1305 tag.
pub const SEAL_OVERHEAD: usize = 32 + 16;

// =============================================================================
// WIRE MESSAGE SIZES
// =============================================================================

/// Framing length prefix size (big-endian u32).
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// Hello body: ephemeral public key followed by both randoms.
pub const HELLO_SIZE: usize = PUBLIC_KEY_SIZE + 2 * RANDOM_SIZE;

/// Sealed client hello as sent on the wire.
pub const SEALED_HELLO_SIZE: usize = HELLO_SIZE + SEAL_OVERHEAD;

/// Sealed one-byte confirmation signal.
pub const SEALED_SIGNAL_SIZE: usize = 1 + SEAL_OVERHEAD;

/// AEAD ciphertext of the one-byte final confirmation.
pub const CONFIRM_CIPHER_SIZE: usize = 1 + AEAD_TAG_SIZE;

// =============================================================================
// CONFIRMATION SENTINELS
// =============================================================================

/// Peer accepted the exchange.
pub const SIGNAL_OK: u8 = 0b0101_0101;

/// Peer rejected the exchange.
pub const SIGNAL_NOK: u8 = 0b1010_1010;

// =============================================================================
// RESOURCE LIMITS
// =============================================================================

/// Default receive capacity for framed messages.
///
/// Bounds the allocation a length prefix can trigger. Sized for a JPEG
/// fingerprint frame from the sensor; callers with larger payloads raise it
/// explicitly.
pub const DEFAULT_RECV_CAPACITY: usize = 64 * 1024;
