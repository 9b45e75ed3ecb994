//! Switch transports
//!
//! Single-exchange bindings that carry an encoded message to a switch: a raw
//! TCP send of the framed message and an HTTP POST of the unframed payload.
//! Neither retries; the caller sees failures as [`TransportError`].

mod error;
mod http;
mod tcp;

pub use error::TransportError;
pub use http::{HttpClient, HttpReply};
pub use tcp::{MAX_RESPONSE_LEN, TcpClient};
