//! Sending and receiving packets over a byte connection.
//!
//! One `send` carries one envelope and one `recv` is expected to return it
//! whole. No framing is added.

use std::io::{self, Read, Write};
use std::net::TcpStream;

use crate::codec::Envelope;
use crate::error::Result;
use crate::record::Packet;

/// Read size used when the caller has no better bound.
pub const DEFAULT_BUFFER_SIZE: usize = 512;

/// A bidirectional byte connection.
pub trait Connection {
    /// Send `data`, returning the number of bytes written.
    fn send(&mut self, data: &[u8]) -> io::Result<usize>;

    /// Read at most `max` bytes. An empty result means the peer closed the
    /// connection or nothing was available.
    fn recv(&mut self, max: usize) -> io::Result<Vec<u8>>;
}

impl Connection for TcpStream {
    fn send(&mut self, data: &[u8]) -> io::Result<usize> {
        self.write_all(data)?;
        self.flush()?;
        Ok(data.len())
    }

    fn recv(&mut self, max: usize) -> io::Result<Vec<u8>> {
        let mut buf = vec![0u8; max];
        let n = self.read(&mut buf)?;
        buf.truncate(n);
        Ok(buf)
    }
}

/// Encode `packet` with `envelope` and send it over `conn`.
///
/// Returns `Ok(None)` without encoding when there is no connection.
pub fn send_to<E, P, C>(envelope: &E, packet: &P, conn: Option<&mut C>) -> Result<Option<usize>>
where
    E: Envelope + ?Sized,
    P: Packet + ?Sized,
    C: Connection + ?Sized,
{
    let Some(conn) = conn else {
        return Ok(None);
    };
    let data = envelope.encode(packet)?;
    let sent = conn.send(&data)?;
    tracing::debug!(tag = packet.tag(), bytes = sent, "sent packet");
    Ok(Some(sent))
}

/// Read one payload from `conn` and decode it into `packet`.
///
/// Returns `Ok(false)` when there is no connection, nothing was read, or the
/// payload was malformed or did not match the packet. In the last case the
/// packet is left untouched. Configuration and I/O errors are returned.
pub fn receive_from<E, P, C>(
    envelope: &E,
    packet: &mut P,
    conn: Option<&mut C>,
    buffer_size: usize,
) -> Result<bool>
where
    E: Envelope + ?Sized,
    P: Packet + ?Sized,
    C: Connection + ?Sized,
{
    let Some(conn) = conn else {
        return Ok(false);
    };
    let data = conn.recv(buffer_size)?;
    if data.is_empty() {
        return Ok(false);
    }
    match envelope.decode(packet, &data) {
        Ok(()) => Ok(true),
        Err(e) if e.is_data_error() => {
            tracing::warn!(
                tag = packet.tag(),
                bytes = data.len(),
                error = %e,
                "discarding received payload"
            );
            Ok(false)
        }
        Err(e) => Err(e),
    }
}
