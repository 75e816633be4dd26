//! The byte-stream endpoint the handshake runs over.

use std::io::{Read, Write};
use std::net::{Shutdown, TcpStream};

/// An open, ordered, reliable byte-stream endpoint.
///
/// The caller owns the connection; a handshake borrows it exclusively for its
/// duration and may close it on authentication failure. Reads and writes
/// block until progress is made or the connection errors; cancellation and
/// timeouts are the implementation's concern (e.g. a socket read deadline),
/// and the handshake treats a timeout like any other I/O error.
pub trait Connection {
    /// Read up to `buf.len()` bytes. `Ok(0)` means the peer closed.
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize>;

    /// Write up to `buf.len()` bytes, returning how many were accepted.
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize>;

    /// Tear the connection down. Errors are ignored: close is terminal.
    fn close(&mut self);

    /// Whether the endpoint still considers itself connected.
    fn is_connected(&self) -> bool {
        true
    }
}

impl Connection for TcpStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        Read::read(self, buf)
    }

    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        Write::write(self, buf)
    }

    fn close(&mut self) {
        let _ = self.shutdown(Shutdown::Both);
    }

    fn is_connected(&self) -> bool {
        self.peer_addr().is_ok()
    }
}
