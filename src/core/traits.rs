//! Collaborator traits for the MTLSP core.

/// A producer of the device-identifying fingerprint payload.
///
/// On the target device this is backed by the camera driver; the handshake
/// only needs the raw bytes and their length, so anything that can hand over
/// a byte buffer qualifies.
pub trait FingerprintSource {
    /// Produce the fingerprint payload.
    ///
    /// Called at most once per handshake, after the shared secret has been
    /// derived.
    fn fingerprint(&mut self) -> std::io::Result<Vec<u8>>;
}

impl FingerprintSource for &[u8] {
    fn fingerprint(&mut self) -> std::io::Result<Vec<u8>> {
        Ok(self.to_vec())
    }
}

impl FingerprintSource for Vec<u8> {
    fn fingerprint(&mut self) -> std::io::Result<Vec<u8>> {
        Ok(self.clone())
    }
}
