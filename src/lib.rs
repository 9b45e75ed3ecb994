//! isosim - ISO 8583:1987 message builder for exercising payment switches
//!
//! This library builds `0200` financial request messages from a sparse
//! selection of the 64 primary-bitmap fields, renders the bitmap, LLVAR
//! prefixes and optional transport framing as ASCII text, and produces a
//! field-by-field breakdown for inspection.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use isosim::{FieldSelection, Framing, Registry, build, validate};
//!
//! let registry = Registry::standard();
//! let mut selection = FieldSelection::new();
//! selection.insert(2, "4000001234567899")?;
//!
//! assert!(validate(&selection, registry).is_valid());
//! let message = build(&selection, registry, Framing::none().with_tpdu())?;
//! assert_eq!(message.bitmap_hex(), "4000000000000000");
//! println!("{}", message.framed());
//! # Ok::<(), isosim::Error>(())
//! ```
//!
//! # Features
//!
//! - **Field registry** - labels, defaults, widths, data classes and PCI flags
//! - **Bitmap** - primary bitmap, with the secondary bitmap as an extension point
//! - **Framing** - TPDU header and 2-byte length header
//! - **Transports** - raw TCP and HTTP single exchanges
//!
//! Incoming messages are never parsed; replies are shown as text.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod audit;
pub mod config;
pub mod protocol;
pub mod template;
pub mod transport;

pub use audit::AuditLog;
pub use config::SimulatorConfig;
pub use protocol::{
    Bitmap, BreakdownEntry, EncodedMessage, Error, FieldDefinition, FieldSelection, Framing,
    MTI, Registry, Result, TPDU, TypeClass, ValidationReport, build, encode_field, randomize,
    redact, validate,
};
pub use template::Template;
pub use transport::{HttpClient, TcpClient, TransportError};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default switch port for TCP sends
pub const DEFAULT_PORT: u16 = 5000;

/// Default endpoint for HTTP posts
pub const DEFAULT_HTTP_URL: &str = "http://localhost:8080/api/iso8583";
