//! Length-prefixed message framing.
//!
//! Variable-length messages are framed with a 4-byte big-endian length
//! prefix. Fixed-size protocol fields skip the prefix (their size is a wire
//! constant known to both ends) and use the raw [`write_all`]/[`read_exact`]
//! helpers instead.
//!
//! The layer never hands a partial message to the caller: [`receive`] returns
//! exactly the declared number of bytes or an error.

use crate::core::{FrameError, LENGTH_PREFIX_SIZE};

use super::Connection;

/// Write all of `buf`, looping over short writes.
///
/// A zero-length write is treated as a closed connection.
pub fn write_all<C: Connection>(conn: &mut C, buf: &[u8]) -> Result<(), FrameError> {
    let mut written = 0;
    while written < buf.len() {
        match conn.write(&buf[written..]) {
            Ok(0) => return Err(FrameError::Closed),
            Ok(n) => written += n,
            Err(e) => return Err(FrameError::Io(e)),
        }
    }
    Ok(())
}

/// Fill `buf` exactly, looping over short reads.
///
/// A zero-length read is treated as a closed connection.
pub fn read_exact<C: Connection>(conn: &mut C, buf: &mut [u8]) -> Result<(), FrameError> {
    let mut filled = 0;
    while filled < buf.len() {
        match conn.read(&mut buf[filled..]) {
            Ok(0) => return Err(FrameError::Closed),
            Ok(n) => filled += n,
            Err(e) => return Err(FrameError::Io(e)),
        }
    }
    Ok(())
}

/// Send one framed message: 4-byte big-endian length prefix, then `payload`.
///
/// Returns the number of payload bytes written.
pub fn send<C: Connection>(conn: &mut C, payload: &[u8]) -> Result<usize, FrameError> {
    let prefix = (payload.len() as u32).to_be_bytes();
    write_all(conn, &prefix)?;
    write_all(conn, payload)?;
    Ok(payload.len())
}

/// Receive one framed message of at most `capacity` bytes.
///
/// Reads the 4-byte prefix, rejects a declared length above `capacity`
/// before sizing any buffer, then accumulates exactly that many bytes.
pub fn receive<C: Connection>(conn: &mut C, capacity: usize) -> Result<Vec<u8>, FrameError> {
    let mut prefix = [0u8; LENGTH_PREFIX_SIZE];
    read_exact(conn, &mut prefix)?;

    let declared = u32::from_be_bytes(prefix) as usize;
    if declared > capacity {
        return Err(FrameError::LengthTooLarge { declared, capacity });
    }

    let mut body = vec![0u8; declared];
    read_exact(conn, &mut body)?;
    Ok(body)
}
