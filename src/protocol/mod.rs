//! ISO 8583:1987 message core
//!
//! This module provides the field registry, bitmap, validation and the text
//! codec that turns a field selection into a wire message.

mod bitmap;
mod codec;
mod error;
mod random;
mod redact;
mod registry;
mod selection;
mod types;
mod validate;

pub use bitmap::Bitmap;
pub use codec::{BreakdownEntry, EncodedField, EncodedMessage, build, encode_field};
pub use error::{Error, Result};
pub use random::randomize;
pub use redact::{mask_value, redact};
pub use registry::{DefaultValue, FieldDefinition, Registry};
pub use selection::{FieldEntry, FieldSelection};
pub use types::{Framing, TypeClass};
pub use validate::{ValidationReport, Violation, ViolationKind, validate};

/// Message type indicator emitted by this profile (financial request)
pub const MTI: &str = "0200";

/// TPDU header prepended when framing asks for it
pub const TPDU: &str = "6000000000";

/// Width of one rendered bitmap in hex characters
pub const BITMAP_HEX_LEN: usize = 16;

/// Largest value length an LLVAR prefix can express
pub const LLVAR_MAX: usize = 99;

/// Highest field number the registry defines
pub const MAX_FIELD: u8 = 64;

/// Highest field number a bitmap can address (primary + secondary)
pub const MAX_BITMAP_FIELD: u8 = 128;

/// Largest byte count a 4-hex-digit length header can carry
pub const MAX_FRAME_BYTES: usize = u16::MAX as usize;
