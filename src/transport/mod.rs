//! MTLSP transport layer.
//!
//! Sits between the handshake state machine and the raw byte stream:
//!
//! - [`Connection`]: the blocking byte-stream endpoint contract, implemented
//!   for `std::net::TcpStream`
//! - [`framing`]: length-delimited message boundaries on top of it
//!
//! The transport stays agnostic to message contents; interpreting bytes is
//! the handshake's job.

mod connection;
pub mod framing;

pub use connection::Connection;
