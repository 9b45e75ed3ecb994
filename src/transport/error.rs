//! Transport-level error types covering connection, socket and HTTP failures.

use core::fmt;
use std::io;

/// Unified error type for switch transports.
#[derive(Debug)]
pub enum TransportError {
    /// Address did not resolve to anything connectable.
    InvalidAddress(String),
    /// Every resolved address refused or timed out.
    Connect {
        /// Address as given by the caller.
        addr: String,
        /// Last connection failure.
        source: io::Error,
    },
    /// Socket failure after the connection was established.
    Io(io::Error),
    /// No reply arrived before the read timeout.
    Timeout,
    /// HTTP client failure.
    Http(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidAddress(addr) => write!(f, "invalid address: {addr}"),
            Self::Connect { addr, source } => write!(f, "cannot connect to {addr}: {source}"),
            Self::Io(err) => write!(f, "socket error: {err}"),
            Self::Timeout => write!(f, "timed out waiting for a reply"),
            Self::Http(err) => write!(f, "http error: {err}"),
        }
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Connect { source, .. } => Some(source),
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for TransportError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.to_string())
    }
}
