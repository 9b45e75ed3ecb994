//! Raw TCP binding: send one framed message, read one reply.

use std::io::{self, ErrorKind, Read, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::Duration;

use bytes::{Bytes, BytesMut};
use tracing::{debug, instrument};

use super::TransportError;

/// Largest reply read back from the switch.
pub const MAX_RESPONSE_LEN: usize = 4096;

/// Client for one switch endpoint.
#[derive(Debug, Clone)]
pub struct TcpClient {
    addr: String,
    timeout: Duration,
}

impl TcpClient {
    /// Target `host:port` with the given connect/read/write timeout.
    #[must_use]
    pub fn new(host: &str, port: u16, timeout: Duration) -> Self {
        Self {
            addr: format!("{host}:{port}"),
            timeout,
        }
    }

    /// Target address.
    #[must_use]
    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Send `message`, half-close the write side and read the reply
    /// (up to [`MAX_RESPONSE_LEN`] bytes, or until the switch closes).
    #[instrument(level = "debug", skip(self, message), fields(addr = %self.addr, len = message.len()))]
    pub fn send(&self, message: &[u8]) -> Result<Bytes, TransportError> {
        let mut stream = self.connect()?;
        stream.set_read_timeout(Some(self.timeout))?;
        stream.set_write_timeout(Some(self.timeout))?;

        stream.write_all(message)?;
        stream.flush()?;
        stream.shutdown(Shutdown::Write)?;

        let reply = read_reply(&mut stream)?;
        debug!(reply_len = reply.len(), "exchange complete");
        Ok(reply)
    }

    fn connect(&self) -> Result<TcpStream, TransportError> {
        let addrs = self
            .addr
            .to_socket_addrs()
            .map_err(|_| TransportError::InvalidAddress(self.addr.clone()))?;

        let mut last_err = None;
        for addr in addrs {
            match TcpStream::connect_timeout(&addr, self.timeout) {
                Ok(stream) => return Ok(stream),
                Err(err) => last_err = Some(err),
            }
        }

        match last_err {
            Some(source) => Err(TransportError::Connect {
                addr: self.addr.clone(),
                source,
            }),
            None => Err(TransportError::InvalidAddress(self.addr.clone())),
        }
    }
}

fn read_reply(stream: &mut impl Read) -> Result<Bytes, TransportError> {
    let mut reply = BytesMut::zeroed(MAX_RESPONSE_LEN);
    let mut filled = 0;

    while filled < MAX_RESPONSE_LEN {
        match stream.read(&mut reply[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => {}
            Err(err) if is_timeout(&err) => {
                if filled == 0 {
                    return Err(TransportError::Timeout);
                }
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }

    reply.truncate(filled);
    Ok(reply.freeze())
}

fn is_timeout(err: &io::Error) -> bool {
    matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    struct Stalled;

    impl Read for Stalled {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::from(ErrorKind::WouldBlock))
        }
    }

    #[test]
    fn test_reply_truncated_at_limit() {
        let mut source = Cursor::new(vec![b'7'; MAX_RESPONSE_LEN + 100]);
        let reply = read_reply(&mut source).unwrap();
        assert_eq!(reply.len(), MAX_RESPONSE_LEN);
    }

    #[test]
    fn test_short_reply() {
        let mut source = Cursor::new(b"0210".to_vec());
        assert_eq!(read_reply(&mut source).unwrap().as_ref(), b"0210");
    }

    #[test]
    fn test_silent_switch_times_out() {
        assert!(matches!(read_reply(&mut Stalled), Err(TransportError::Timeout)));
    }
}
